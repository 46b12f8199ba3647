//! HTTP client for the mapping-service API's search and detail endpoints.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::PlacesError;
use crate::types::{PlaceCandidate, PlaceDetailResponse, PlaceRecord, PlaceSearchResponse};

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/";

/// Detail fields requested from the provider, kept to exactly what
/// reconciliation consumes.
const DETAIL_FIELDS: &str =
    "name,formatted_address,formatted_phone_number,business_status,rating,user_ratings_total";

/// Raw client for the mapping-service API. Stateless; memoization lives
/// in [`crate::CrossReferenceClient`]. Cloning shares the underlying
/// connection pool, so per-run wrappers can be built cheaply.
#[derive(Clone)]
pub struct PlacesClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl PlacesClient {
    /// Creates a new client pointed at the production mapping API.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, PlacesError> {
        Self::with_base_url(api_key, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`PlacesError::InvalidBaseUrl`] if
    /// `base_url` is not a valid URL.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, PlacesError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| PlacesError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }

    /// Free-text place search for `"{name} {address}"`, returning the
    /// provider's candidate list.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Http`] / [`PlacesError::UnexpectedStatus`] on
    ///   transport failure.
    /// - [`PlacesError::ApiError`] when the envelope status is neither
    ///   `OK` nor `ZERO_RESULTS`.
    /// - [`PlacesError::Deserialize`] on an unexpected body shape.
    pub async fn search_place(
        &self,
        name: &str,
        address: &str,
    ) -> Result<Vec<PlaceCandidate>, PlacesError> {
        let query = format!("{name} {address}");
        let url = self.build_url("place/textsearch/json", &[("query", query.as_str())])?;
        let body = self.request_json(&url).await?;

        let response: PlaceSearchResponse =
            serde_json::from_value(body).map_err(|e| PlacesError::Deserialize {
                context: format!("textsearch(query={query})"),
                source: e,
            })?;

        Self::check_envelope_status(response.status.as_deref())?;
        Ok(response.results)
    }

    /// Detail fetch by opaque place identifier.
    ///
    /// Returns `None` when the provider knows the id but has no detail
    /// record for it.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`Self::search_place`].
    pub async fn place_detail(&self, place_id: &str) -> Result<Option<PlaceRecord>, PlacesError> {
        let url = self.build_url(
            "place/details/json",
            &[("place_id", place_id), ("fields", DETAIL_FIELDS)],
        )?;
        let body = self.request_json(&url).await?;

        let response: PlaceDetailResponse =
            serde_json::from_value(body).map_err(|e| PlacesError::Deserialize {
                context: format!("details(place_id={place_id})"),
                source: e,
            })?;

        Self::check_envelope_status(response.status.as_deref())?;
        Ok(response.result)
    }

    fn build_url(&self, endpoint: &str, extra: &[(&str, &str)]) -> Result<Url, PlacesError> {
        let mut url = self
            .base_url
            .join(endpoint)
            .map_err(|e| PlacesError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in extra {
                pairs.append_pair(k, v);
            }
            pairs.append_pair("key", &self.api_key);
        }
        Ok(url)
    }

    async fn request_json(&self, url: &Url) -> Result<serde_json::Value, PlacesError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PlacesError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| PlacesError::Deserialize {
            context: url.path().to_string(),
            source: e,
        })
    }

    /// The provider signals request-level failures inside a 200 body.
    /// `ZERO_RESULTS` is a successful empty answer, not an error.
    fn check_envelope_status(status: Option<&str>) -> Result<(), PlacesError> {
        match status {
            None | Some("OK" | "ZERO_RESULTS") => Ok(()),
            Some(other) => Err(PlacesError::ApiError(other.to_string())),
        }
    }
}
