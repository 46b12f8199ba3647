//! HTTP client for the business directory search API.
//!
//! Wraps `reqwest` with bearer authentication, typed response
//! deserialization, and the offset-pagination loop. Pagination stops
//! when the requested number of results is reached, a page comes back
//! empty, or a page comes back short of the page-size cap.

use std::time::Duration;

use reqwest::{Client, Url};

use leadgen_core::{miles_to_meters, SearchCriteria};

use crate::error::DirectoryError;
use crate::types::{Listing, SearchResponse};

const DEFAULT_BASE_URL: &str = "https://api.yelp.com/v3/";

/// Provider maximum page size per search request.
pub const PAGE_SIZE: usize = 50;

/// Result of a (possibly multi-page) directory search.
///
/// A transport failure mid-pagination does not fail the search: the
/// listings accumulated so far are returned and the error is recorded
/// here so callers can tell truncated results from a genuinely empty
/// result set.
#[derive(Debug)]
pub struct SearchOutcome {
    pub listings: Vec<Listing>,
    pub pages_fetched: usize,
    /// Human-readable description of the failure that stopped
    /// pagination early, if any.
    pub error: Option<String>,
}

impl SearchOutcome {
    /// True when the search ended early because of an upstream failure.
    #[must_use]
    pub fn truncated_by_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Client for the business directory search API.
///
/// Use [`DirectoryClient::new`] for production or
/// [`DirectoryClient::with_base_url`] to point at a mock server in tests.
pub struct DirectoryClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl DirectoryClient {
    /// Creates a new client pointed at the production directory API.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Http`] if the underlying
    /// `reqwest::Client` cannot be constructed.
    pub fn new(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, DirectoryError> {
        Self::with_base_url(api_key, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`DirectoryError::InvalidBaseUrl`] if
    /// `base_url` is not a valid URL.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, DirectoryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Normalise: ensure the base URL ends with exactly one slash so
        // that join() appends the endpoint path rather than replacing the
        // last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url =
            Url::parse(&normalised).map_err(|e| DirectoryError::InvalidBaseUrl {
                base_url: base_url.to_owned(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }

    /// Searches the directory, paginating until `criteria.max_results`
    /// listings are accumulated or the provider runs out of data.
    ///
    /// Offsets advance by the number of listings each page actually
    /// returned. A short page (fewer than [`PAGE_SIZE`]) signals the end
    /// of the provider's data. A transport or decode failure on any page
    /// stops pagination and returns the partial accumulation with the
    /// error recorded on the outcome — it is never retried and never
    /// fails the overall search.
    pub async fn search(&self, criteria: &SearchCriteria) -> SearchOutcome {
        let mut listings: Vec<Listing> = Vec::new();
        let mut offset = 0usize;
        let mut pages_fetched = 0usize;
        let limit = PAGE_SIZE.min(criteria.max_results);

        let error = loop {
            if listings.len() >= criteria.max_results {
                break None;
            }

            match self.search_page(criteria, limit, offset).await {
                Ok(page) => {
                    pages_fetched += 1;
                    let count = page.businesses.len();
                    if count == 0 {
                        break None;
                    }
                    offset += count;
                    listings.extend(page.businesses);
                    // A short page means the provider has no more data.
                    if count < limit {
                        break None;
                    }
                }
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        offset,
                        pages_fetched,
                        "directory search page failed, returning partial results"
                    );
                    break Some(e.to_string());
                }
            }
        };

        listings.truncate(criteria.max_results);
        tracing::info!(
            found = listings.len(),
            pages_fetched,
            truncated_by_error = error.is_some(),
            "directory search finished"
        );

        SearchOutcome {
            listings,
            pages_fetched,
            error,
        }
    }

    /// Fetches a single page of search results.
    ///
    /// # Errors
    ///
    /// - [`DirectoryError::Http`] on network failure.
    /// - [`DirectoryError::UnexpectedStatus`] on a non-2xx response.
    /// - [`DirectoryError::Deserialize`] if the body does not match the
    ///   expected shape.
    pub async fn search_page(
        &self,
        criteria: &SearchCriteria,
        limit: usize,
        offset: usize,
    ) -> Result<SearchResponse, DirectoryError> {
        let url = self.search_url(criteria, limit, offset)?;

        let response = self
            .client
            .get(url.clone())
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DirectoryError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| DirectoryError::Deserialize {
            context: format!("search page at offset {offset}"),
            source: e,
        })
    }

    /// Builds the search URL with percent-encoded query parameters.
    fn search_url(
        &self,
        criteria: &SearchCriteria,
        limit: usize,
        offset: usize,
    ) -> Result<Url, DirectoryError> {
        let mut url =
            self.base_url
                .join("businesses/search")
                .map_err(|e| DirectoryError::InvalidBaseUrl {
                    base_url: self.base_url.to_string(),
                    reason: e.to_string(),
                })?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("term", &criteria.category_query);
            pairs.append_pair("location", &criteria.location_query);
            pairs.append_pair(
                "radius",
                &miles_to_meters(criteria.radius_miles).to_string(),
            );
            pairs.append_pair("limit", &limit.to_string());
            pairs.append_pair("offset", &offset.to_string());
            pairs.append_pair("sort_by", "rating");
        }
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: &str) -> DirectoryClient {
        DirectoryClient::with_base_url("test-key", 30, "leadgen-test/0.1", base_url)
            .expect("client construction should not fail")
    }

    fn criteria() -> SearchCriteria {
        SearchCriteria::new("Nashville, TN", "restaurants", 5.0, 3)
            .expect("criteria should validate")
    }

    #[test]
    fn search_url_carries_all_parameters() {
        let client = test_client("https://api.directory.example");
        let url = client.search_url(&criteria(), 3, 0).expect("url");
        let rendered = url.as_str();
        assert!(rendered.starts_with("https://api.directory.example/businesses/search?"));
        assert!(rendered.contains("term=restaurants"));
        assert!(rendered.contains("radius=8047"), "5 miles -> 8047 m: {rendered}");
        assert!(rendered.contains("limit=3"));
        assert!(rendered.contains("offset=0"));
        assert!(rendered.contains("sort_by=rating"));
    }

    #[test]
    fn search_url_percent_encodes_location() {
        let client = test_client("https://api.directory.example");
        let url = client.search_url(&criteria(), 3, 0).expect("url");
        assert!(
            url.as_str().contains("location=Nashville%2C+TN")
                || url.as_str().contains("location=Nashville%2C%20TN"),
            "location should be encoded: {url}"
        );
    }

    #[test]
    fn base_url_trailing_slash_is_normalised() {
        let with_slash = test_client("https://api.directory.example/v3/");
        let without_slash = test_client("https://api.directory.example/v3");
        let a = with_slash.search_url(&criteria(), 3, 0).expect("url");
        let b = without_slash.search_url(&criteria(), 3, 0).expect("url");
        assert_eq!(a.as_str(), b.as_str());
    }
}
