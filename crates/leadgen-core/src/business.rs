//! The pipeline's output unit and its coarse trust labels.

use serde::{Deserialize, Serialize};

/// Three-tier trust label attached to a verified record.
///
/// Upgraded to `High` only when the cross-reference positively confirms
/// or contradicts the primary source; `Medium` is the default when no
/// corroborating signal is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

impl ConfidenceLevel {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ConfidenceLevel::Low => "low",
            ConfidenceLevel::Medium => "medium",
            ConfidenceLevel::High => "high",
        }
    }
}

impl std::fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operational status of a business as far as the pipeline can tell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BusinessStatus {
    Unknown,
    Open,
    Closed,
}

impl BusinessStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            BusinessStatus::Unknown => "unknown",
            BusinessStatus::Open => "open",
            BusinessStatus::Closed => "closed",
        }
    }
}

impl std::fmt::Display for BusinessStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reconciled business record. Created once per raw listing during
/// reconciliation, immutable afterwards, consumed by the result sink.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifiedBusiness {
    /// External identifier from the directory API. Sink-side dedup key.
    pub external_id: String,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub phone: String,
    /// Origin tag, e.g. `"directory+crossref_medium"`.
    pub source: String,
    pub confidence: ConfidenceLevel,
    pub status: BusinessStatus,
    /// Human-readable note when the cross-reference contradicted the
    /// primary source (e.g. an explicit closure signal).
    pub discrepancy_note: Option<String>,
    pub rating: Option<f64>,
    pub review_count: Option<i64>,
}
