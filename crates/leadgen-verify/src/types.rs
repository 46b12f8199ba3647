//! Postal verification API response types and the normalized
//! verification result consumed by reconciliation.

use serde::{Deserialize, Deserializer, Serialize};

/// Outcome category for a verification attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    /// The carrier confirms the address as deliverable.
    Verified,
    /// The carrier knows the address and says it is not deliverable,
    /// or returned no candidate at all.
    Invalid,
    /// The attempt itself failed (transport, bad response).
    Error,
    /// Verification was not attempted, e.g. the listing is missing
    /// address fields or no credentials are configured.
    Pending,
}

impl VerificationStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Verified => "verified",
            Self::Invalid => "invalid",
            Self::Error => "error",
            Self::Pending => "pending",
        }
    }
}

/// Normalized verification outcome. Always well-formed: failed
/// attempts carry `status = Error` and a message rather than an `Err`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationResult {
    pub verified: bool,
    pub status: VerificationStatus,
    /// Deliverability confidence in `[0.0, 1.0]`.
    pub confidence: f64,
    pub verified_street: Option<String>,
    pub verified_city: Option<String>,
    pub verified_state: Option<String>,
    pub verified_zip: Option<String>,
    pub error: Option<String>,
}

impl VerificationResult {
    #[must_use]
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::terminal(VerificationStatus::Invalid, Some(reason.into()))
    }

    #[must_use]
    pub fn error(reason: impl Into<String>) -> Self {
        Self::terminal(VerificationStatus::Error, Some(reason.into()))
    }

    /// Result for a listing that was never submitted for verification.
    #[must_use]
    pub fn pending() -> Self {
        Self::terminal(VerificationStatus::Pending, None)
    }

    fn terminal(status: VerificationStatus, error: Option<String>) -> Self {
        Self {
            verified: false,
            status,
            confidence: 0.0,
            verified_street: None,
            verified_city: None,
            verified_state: None,
            verified_zip: None,
            error,
        }
    }
}

/// A single candidate from the street-address endpoint. The endpoint
/// returns a bare JSON array of these.
#[derive(Debug, Deserialize)]
pub struct AddressCandidate {
    #[serde(default)]
    pub delivery_line_1: Option<String>,
    #[serde(default)]
    pub components: AddressComponents,
    #[serde(default)]
    pub analysis: DeliverabilityAnalysis,
}

#[derive(Debug, Default, Deserialize)]
pub struct AddressComponents {
    #[serde(default)]
    pub city_name: Option<String>,
    #[serde(default)]
    pub state_abbreviation: Option<String>,
    #[serde(default)]
    pub zipcode: Option<String>,
}

/// DPV analysis block. The provider encodes boolean flags as `"Y"`/`"N"`
/// strings; older payloads use actual booleans.
#[derive(Debug, Default, Deserialize)]
pub struct DeliverabilityAnalysis {
    #[serde(default)]
    pub dpv_match_code: Option<String>,
    #[serde(default)]
    pub dpv_footnotes: Option<String>,
    #[serde(default, deserialize_with = "dpv_flag")]
    pub dpv_vacant: bool,
    #[serde(default, deserialize_with = "dpv_flag")]
    pub dpv_cmra: bool,
}

/// Match codes the carrier treats as deliverable: exact, deliverable
/// with a secondary-unit caveat, and deliverable by dropping the
/// secondary unit.
pub(crate) const DELIVERABLE_MATCH_CODES: [&str; 3] = ["Y", "S", "D"];

impl DeliverabilityAnalysis {
    #[must_use]
    pub fn is_deliverable(&self) -> bool {
        self.dpv_match_code
            .as_deref()
            .is_some_and(|code| DELIVERABLE_MATCH_CODES.contains(&code))
    }

    /// Confidence score for a deliverable candidate: the match-code
    /// base, discounted for vacant addresses and commercial
    /// mail-receiving agencies.
    #[must_use]
    pub fn confidence(&self) -> f64 {
        let base: f64 = match self.dpv_match_code.as_deref() {
            Some("Y") => 1.0,
            Some("S") => 0.9,
            Some("D") => 0.8,
            _ => 0.0,
        };
        let mut score = base;
        if self.dpv_vacant {
            score *= 0.7;
        }
        if self.dpv_cmra {
            score *= 0.9;
        }
        score.clamp(0.0, 1.0)
    }
}

fn dpv_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    match Option::<Flag>::deserialize(deserializer)? {
        Some(Flag::Bool(b)) => Ok(b),
        Some(Flag::Text(s)) => Ok(s.eq_ignore_ascii_case("y") || s.eq_ignore_ascii_case("true")),
        None => Ok(false),
    }
}
