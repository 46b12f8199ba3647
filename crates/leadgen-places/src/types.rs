//! Mapping-service API response types for the two-step lookup:
//! a free-text place search returning candidates, then a detail fetch
//! by candidate identifier.

use serde::Deserialize;

/// Operational status string the provider uses for a permanently
/// closed business.
pub const STATUS_CLOSED_PERMANENTLY: &str = "CLOSED_PERMANENTLY";

/// Top-level response from the free-text place search.
#[derive(Debug, Deserialize)]
pub struct PlaceSearchResponse {
    #[serde(default)]
    pub results: Vec<PlaceCandidate>,
    #[serde(default)]
    pub status: Option<String>,
}

/// A single candidate from the search step. Only the identifier is
/// needed to drive the detail fetch.
#[derive(Debug, Deserialize)]
pub struct PlaceCandidate {
    pub place_id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Top-level response from the detail fetch.
#[derive(Debug, Deserialize)]
pub struct PlaceDetailResponse {
    #[serde(default)]
    pub result: Option<PlaceRecord>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Canonical cross-reference record for a business. Fields the detail
/// endpoint may omit are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub formatted_phone_number: Option<String>,
    /// Operational status, e.g. `"OPERATIONAL"` or `"CLOSED_PERMANENTLY"`.
    #[serde(default)]
    pub business_status: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub user_ratings_total: Option<i64>,
}

impl PlaceRecord {
    /// True when the provider explicitly marks the business as
    /// permanently closed.
    #[must_use]
    pub fn is_permanently_closed(&self) -> bool {
        self.business_status.as_deref() == Some(STATUS_CLOSED_PERMANENTLY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_permanent_closure() {
        let record: PlaceRecord = serde_json::from_value(serde_json::json!({
            "name": "Shuttered Cafe",
            "business_status": "CLOSED_PERMANENTLY"
        }))
        .expect("parse record");
        assert!(record.is_permanently_closed());
    }

    #[test]
    fn operational_business_is_not_closed() {
        let record: PlaceRecord = serde_json::from_value(serde_json::json!({
            "business_status": "OPERATIONAL"
        }))
        .expect("parse record");
        assert!(!record.is_permanently_closed());
    }

    #[test]
    fn missing_status_is_not_closed() {
        let record: PlaceRecord =
            serde_json::from_value(serde_json::json!({ "name": "Unknown" })).expect("parse");
        assert!(!record.is_permanently_closed());
    }
}
