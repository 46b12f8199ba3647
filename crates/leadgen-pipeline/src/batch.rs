//! Bounded parallel fan-out of listings through the reconciliation
//! engine.

use futures::stream::{self, StreamExt};
use leadgen_core::VerifiedBusiness;
use leadgen_directory::Listing;

use crate::error::PipelineError;
use crate::reconcile::ReconciliationEngine;

/// Default fan-out width for reconciliation workers.
pub const DEFAULT_MAX_CONCURRENT: usize = 10;

/// What to do when a single listing fails reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Log the failure and drop the item; the batch continues.
    SkipAndLog,
    /// Abort the whole batch on the first per-item failure.
    Escalate,
}

/// Reconciles every listing with at most `max_concurrent` lookups in
/// flight. Output order is completion order, not input order.
///
/// # Errors
///
/// Under [`FailurePolicy::Escalate`], the first per-item failure aborts
/// the batch. Under [`FailurePolicy::SkipAndLog`] this never fails.
pub async fn process_all(
    engine: &ReconciliationEngine,
    listings: &[Listing],
    max_concurrent: usize,
    policy: FailurePolicy,
) -> Result<Vec<VerifiedBusiness>, PipelineError> {
    // Named async fn instead of a closure + async block: works around
    // rustc's "implementation of `FnOnce` is not general enough" error
    // (rust-lang/rust#102211) when this stream is awaited in a handler.
    async fn reconcile_one<'a>(
        engine: &'a ReconciliationEngine,
        listing: &'a Listing,
    ) -> (&'a Listing, Result<VerifiedBusiness, crate::reconcile::ReconcileError>) {
        (listing, engine.reconcile(listing).await)
    }

    let futures: Vec<_> = listings
        .iter()
        .map(|listing| reconcile_one(engine, listing))
        .collect();
    let results: Vec<(&Listing, _)> = stream::iter(futures)
        .buffer_unordered(max_concurrent.max(1))
        .collect()
        .await;

    let mut verified = Vec::with_capacity(results.len());
    let mut dropped: usize = 0;

    for (listing, outcome) in results {
        match outcome {
            Ok(business) => verified.push(business),
            Err(e) => match policy {
                FailurePolicy::SkipAndLog => {
                    dropped += 1;
                    tracing::warn!(business = %listing.name, error = %e, "dropping listing");
                }
                FailurePolicy::Escalate => {
                    return Err(PipelineError::Reconcile {
                        name: listing.name.clone(),
                        source: e,
                    });
                }
            },
        }
    }

    if dropped > 0 {
        tracing::info!(dropped, kept = verified.len(), "batch finished with drops");
    }

    Ok(verified)
}
