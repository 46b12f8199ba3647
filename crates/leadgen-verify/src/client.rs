//! HTTP client for the postal address verification API.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::VerifyError;
use crate::types::{AddressCandidate, VerificationResult, VerificationStatus};

const DEFAULT_BASE_URL: &str = "https://us-street.api.smartystreets.com/";

/// Deliverability verifier backed by the street-address endpoint.
///
/// `verify` is total: every failure mode collapses into a
/// [`VerificationResult`] with `status = error` so batch callers never
/// have to unwind. Cloning shares the underlying connection pool.
#[derive(Clone)]
pub struct AddressVerifier {
    client: Client,
    auth_id: String,
    auth_token: String,
    base_url: Url,
}

impl AddressVerifier {
    /// Creates a verifier pointed at the production endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        auth_id: &str,
        auth_token: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, VerifyError> {
        Self::with_base_url(auth_id, auth_token, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a verifier with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`VerifyError::InvalidBaseUrl`] if
    /// `base_url` is not a valid URL.
    pub fn with_base_url(
        auth_id: &str,
        auth_token: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, VerifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| VerifyError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            auth_id: auth_id.to_owned(),
            auth_token: auth_token.to_owned(),
            base_url,
        })
    }

    /// Verifies a single address. Never fails: transport and decoding
    /// problems come back as `status = error` with the message attached.
    pub async fn verify(
        &self,
        street: &str,
        city: &str,
        state: &str,
        zip_code: &str,
    ) -> VerificationResult {
        match self.fetch_candidates(street, city, state, zip_code).await {
            Ok(candidates) => Self::interpret(candidates),
            Err(e) => {
                tracing::error!(street, city, error = %e, "address verification failed");
                VerificationResult::error(format!("API error: {e}"))
            }
        }
    }

    async fn fetch_candidates(
        &self,
        street: &str,
        city: &str,
        state: &str,
        zip_code: &str,
    ) -> Result<Vec<AddressCandidate>, VerifyError> {
        let url = self.build_url(street, city, state, zip_code)?;
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(VerifyError::UnexpectedStatus {
                status: status.as_u16(),
                url: redacted(&url),
            });
        }
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| VerifyError::Deserialize {
            context: "street-address".to_string(),
            source: e,
        })
    }

    fn build_url(
        &self,
        street: &str,
        city: &str,
        state: &str,
        zip_code: &str,
    ) -> Result<Url, VerifyError> {
        let mut url = self
            .base_url
            .join("street-address")
            .map_err(|e| VerifyError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        url.query_pairs_mut()
            .append_pair("auth-id", &self.auth_id)
            .append_pair("auth-token", &self.auth_token)
            .append_pair("street", street)
            .append_pair("city", city)
            .append_pair("state", state)
            .append_pair("zipcode", zip_code);
        Ok(url)
    }

    /// Maps the candidate list onto the normalized result. The first
    /// candidate decides; the endpoint orders candidates by match
    /// quality.
    fn interpret(candidates: Vec<AddressCandidate>) -> VerificationResult {
        let Some(first) = candidates.into_iter().next() else {
            return VerificationResult::invalid("no results returned");
        };

        if !first.analysis.is_deliverable() {
            let reason = first
                .analysis
                .dpv_footnotes
                .unwrap_or_else(|| "address not deliverable".to_string());
            return VerificationResult::invalid(reason);
        }

        VerificationResult {
            verified: true,
            status: VerificationStatus::Verified,
            confidence: first.analysis.confidence(),
            verified_street: first.delivery_line_1,
            verified_city: first.components.city_name,
            verified_state: first.components.state_abbreviation,
            verified_zip: first.components.zipcode,
            error: None,
        }
    }
}

/// Strips credentials from a URL before it lands in an error message.
fn redacted(url: &Url) -> String {
    let mut clean = url.clone();
    clean.set_query(None);
    clean.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(json: serde_json::Value) -> AddressCandidate {
        serde_json::from_value(json).expect("parse candidate")
    }

    #[test]
    fn empty_candidate_list_is_invalid() {
        let result = AddressVerifier::interpret(Vec::new());
        assert!(!result.verified);
        assert_eq!(result.status, VerificationStatus::Invalid);
        assert!(result.confidence.abs() < 1e-9);
    }

    #[test]
    fn deliverable_candidate_carries_standardized_fields() {
        let result = AddressVerifier::interpret(vec![candidate(serde_json::json!({
            "delivery_line_1": "800 N Point St",
            "components": {
                "city_name": "San Francisco",
                "state_abbreviation": "CA",
                "zipcode": "94109"
            },
            "analysis": { "dpv_match_code": "Y", "dpv_vacant": "N", "dpv_cmra": "N" }
        }))]);

        assert!(result.verified);
        assert_eq!(result.status, VerificationStatus::Verified);
        assert!((result.confidence - 1.0).abs() < 1e-9);
        assert_eq!(result.verified_street.as_deref(), Some("800 N Point St"));
        assert_eq!(result.verified_zip.as_deref(), Some("94109"));
    }

    #[test]
    fn undeliverable_candidate_reports_footnotes() {
        let result = AddressVerifier::interpret(vec![candidate(serde_json::json!({
            "analysis": { "dpv_match_code": "N", "dpv_footnotes": "AAM1" }
        }))]);

        assert!(!result.verified);
        assert_eq!(result.status, VerificationStatus::Invalid);
        assert_eq!(result.error.as_deref(), Some("AAM1"));
    }

    #[test]
    fn redacted_url_drops_query() {
        let url = Url::parse("https://verify.example.com/street-address?auth-id=s3cret").expect("url");
        assert_eq!(redacted(&url), "https://verify.example.com/street-address");
    }
}
