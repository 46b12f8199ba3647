//! Directory API response types for the business search endpoint.
//!
//! Every field that the provider may omit or null out is modeled as
//! `Option` or carries `#[serde(default)]`, so malformed upstream
//! payloads fail loudly at the boundary instead of surfacing as
//! missing-key lookups deep in the pipeline.

use serde::Deserialize;

/// Top-level response from `GET /businesses/search`.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub businesses: Vec<Listing>,
    /// Total matches known to the provider, not the page size.
    #[serde(default)]
    pub total: Option<i64>,
}

/// A single raw listing from the directory API. Read-only once fetched.
#[derive(Debug, Clone, Deserialize)]
pub struct Listing {
    /// Opaque external identifier. Dedup key downstream.
    pub id: String,

    /// Display name.
    pub name: String,

    #[serde(default)]
    pub location: ListingLocation,

    /// E.164-ish phone string; empty string when the provider has none.
    #[serde(default)]
    pub phone: Option<String>,

    #[serde(default)]
    pub rating: Option<f64>,

    #[serde(default)]
    pub review_count: Option<i64>,

    /// Price tier string such as `"$$"`.
    #[serde(default)]
    pub price: Option<String>,

    /// Listing page URL on the provider's site.
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub categories: Vec<ListingCategory>,

    /// Provider's own closed flag. Defaults to open when absent.
    #[serde(default)]
    pub is_closed: bool,
}

/// Address components of a listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingLocation {
    #[serde(default)]
    pub address1: Option<String>,
    #[serde(default)]
    pub address2: Option<String>,
    #[serde(default)]
    pub address3: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip_code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListingCategory {
    pub alias: String,
    #[serde(default)]
    pub title: Option<String>,
}

impl Listing {
    /// Street address built from the non-empty address lines, joined
    /// with `", "`.
    #[must_use]
    pub fn street_address(&self) -> String {
        [
            self.location.address1.as_deref(),
            self.location.address2.as_deref(),
            self.location.address3.as_deref(),
        ]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }

    /// Alias of the first category, or `"other"` when uncategorized.
    #[must_use]
    pub fn primary_category(&self) -> &str {
        self.categories
            .first()
            .map_or("other", |c| c.alias.as_str())
    }

    /// Phone with empty-string normalization applied.
    #[must_use]
    pub fn phone_or_empty(&self) -> &str {
        self.phone.as_deref().unwrap_or("")
    }
}
