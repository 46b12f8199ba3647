//! Memoized cross-reference lookup: search-then-detail with negative
//! caching and swallow-and-log failure semantics.

use crate::cache::{CacheStats, CrossReferenceCache};
use crate::client::PlacesClient;
use crate::types::PlaceRecord;

/// Cross-reference lookup client.
///
/// Wraps the raw [`PlacesClient`] with a [`CrossReferenceCache`]. A
/// cache hit (positive or negative) costs zero upstream calls; a miss
/// costs one search call plus one detail call when a candidate is
/// found. Lookup never fails: errors are logged, cached as negative
/// results, and surfaced to the caller as "no cross-reference".
pub struct CrossReferenceClient {
    client: PlacesClient,
    cache: CrossReferenceCache,
}

impl CrossReferenceClient {
    #[must_use]
    pub fn new(client: PlacesClient) -> Self {
        Self {
            client,
            cache: CrossReferenceCache::new(),
        }
    }

    /// Resolves the canonical record for a business name and address,
    /// or `None` when the mapping service has no match (or the lookup
    /// failed).
    pub async fn lookup(&self, name: &str, address: &str) -> Option<PlaceRecord> {
        let key = CrossReferenceCache::key(name, address);

        if let Some(cached) = self.cache.get(&key) {
            return cached;
        }

        let resolved = match self.resolve(name, address).await {
            Ok(record) => record,
            Err(e) => {
                // Cache the failure as a negative result so the same key
                // never costs repeated upstream failures within a run.
                tracing::error!(business = %name, error = %e, "cross-reference lookup failed");
                None
            }
        };

        self.cache.insert(key, resolved.clone());
        resolved
    }

    async fn resolve(
        &self,
        name: &str,
        address: &str,
    ) -> Result<Option<PlaceRecord>, crate::error::PlacesError> {
        self.cache.record_api_calls(1);
        let candidates = self.client.search_place(name, address).await?;

        let Some(first) = candidates.first() else {
            return Ok(None);
        };

        self.cache.record_api_calls(1);
        let detail = self.client.place_detail(&first.place_id).await?;
        Ok(detail)
    }

    /// Statistics for the current run, for summaries and exports.
    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Clears the cache and its counters between batch runs.
    pub fn reset_cache(&self) {
        self.cache.reset();
    }
}
