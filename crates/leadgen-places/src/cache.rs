//! Process-lifetime memoization for cross-reference lookups.
//!
//! The cache is an explicit object owned by whoever drives a pipeline
//! run, not ambient state, so concurrent runs each get their own map
//! and statistics. Negative results ("no match", and failed lookups)
//! are cached too, so a key that failed once never costs another
//! upstream call.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use serde::Serialize;

use crate::types::PlaceRecord;

/// Snapshot of cache activity, reported in run summaries and exports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Upstream API calls issued (two per cache miss).
    pub api_calls: u64,
    pub hits: u64,
    pub misses: u64,
    /// Cached keys, positive and negative combined.
    pub entries: u64,
    /// Cached keys holding a negative ("no match") result.
    pub negative_entries: u64,
}

/// Shared lookup cache keyed by the normalized `"{name}_{address}"`
/// string.
///
/// Concurrent misses on the same key may both reach upstream; both
/// writes converge on the same value, so the race wastes calls but
/// never corrupts the cache.
#[derive(Default)]
pub struct CrossReferenceCache {
    entries: Mutex<HashMap<String, Option<PlaceRecord>>>,
    api_calls: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl CrossReferenceCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lowercase-normalized cache key for a name/address pair.
    #[must_use]
    pub fn key(name: &str, address: &str) -> String {
        format!("{}_{}", name.to_lowercase(), address.to_lowercase())
    }

    /// Returns the cached value for `key` if present. The outer `Option`
    /// is the hit/miss distinction; the inner one is the cached
    /// positive/negative result.
    pub fn get(&self, key: &str) -> Option<Option<PlaceRecord>> {
        let entries = self.entries.lock().expect("cache mutex poisoned");
        match entries.get(key) {
            Some(cached) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(cached.clone())
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Stores a lookup result, positive or negative.
    pub fn insert(&self, key: String, value: Option<PlaceRecord>) {
        let mut entries = self.entries.lock().expect("cache mutex poisoned");
        entries.insert(key, value);
    }

    /// Records upstream API calls attributable to this cache's misses.
    pub fn record_api_calls(&self, count: u64) {
        self.api_calls.fetch_add(count, Ordering::Relaxed);
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        let entries = self.entries.lock().expect("cache mutex poisoned");
        let negative_entries = entries.values().filter(|v| v.is_none()).count() as u64;
        CacheStats {
            api_calls: self.api_calls.load(Ordering::Relaxed),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: entries.len() as u64,
            negative_entries,
        }
    }

    /// Drops all entries and zeroes the counters, for reuse between
    /// batch runs.
    pub fn reset(&self) {
        self.entries.lock().expect("cache mutex poisoned").clear();
        self.api_calls.store(0, Ordering::Relaxed);
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }
}
