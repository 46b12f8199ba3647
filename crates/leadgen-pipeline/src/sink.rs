//! Terminal stage: in-memory dedup followed by a batch insert.

use std::collections::HashSet;

use leadgen_core::VerifiedBusiness;
use serde::Serialize;
use sqlx::PgPool;

use crate::error::PipelineError;

/// Accounting for one ingest call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    /// Records handed to the sink.
    pub received: usize,
    /// Records dropped by in-memory dedup within this batch.
    pub deduped: usize,
    /// Rows actually written.
    pub inserted: u64,
    /// Unique records skipped because the store already had their
    /// external id (first write wins).
    pub skipped: u64,
}

/// Collapses duplicate external ids within a batch, keeping the first
/// occurrence. Returns the surviving records and the number dropped.
#[must_use]
pub fn dedup_by_external_id(businesses: Vec<VerifiedBusiness>) -> (Vec<VerifiedBusiness>, usize) {
    let total = businesses.len();
    let mut seen = HashSet::with_capacity(total);
    let unique: Vec<VerifiedBusiness> = businesses
        .into_iter()
        .filter(|b| seen.insert(b.external_id.clone()))
        .collect();
    let dropped = total - unique.len();
    (unique, dropped)
}

/// Persists a batch of verified businesses.
///
/// Idempotent: records whose external id already exists are skipped,
/// never overwritten, both inside the batch and against the store.
///
/// # Errors
///
/// Database failures propagate; they are the one stage failure the
/// pipeline does not absorb.
pub async fn ingest(
    pool: &PgPool,
    businesses: Vec<VerifiedBusiness>,
) -> Result<IngestReport, PipelineError> {
    let received = businesses.len();
    let (unique, deduped) = dedup_by_external_id(businesses);

    let inserted = leadgen_db::insert_businesses(pool, &unique).await?;
    let skipped = unique.len() as u64 - inserted;

    tracing::info!(received, deduped, inserted, skipped, "ingest complete");

    Ok(IngestReport {
        received,
        deduped,
        inserted,
        skipped,
    })
}
