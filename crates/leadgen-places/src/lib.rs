//! Cross-reference client for the mapping-service API, with
//! process-lifetime memoization and cached negative results.

mod cache;
mod client;
mod error;
mod lookup;
mod types;

pub use cache::{CacheStats, CrossReferenceCache};
pub use client::PlacesClient;
pub use error::PlacesError;
pub use lookup::CrossReferenceClient;
pub use types::{
    PlaceCandidate, PlaceDetailResponse, PlaceRecord, PlaceSearchResponse,
    STATUS_CLOSED_PERMANENTLY,
};
