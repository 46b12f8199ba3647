//! Paginated search client for the business directory API.

mod client;
mod error;
mod types;

pub use client::{DirectoryClient, SearchOutcome, PAGE_SIZE};
pub use error::DirectoryError;
pub use types::{Listing, ListingCategory, ListingLocation, SearchResponse};
