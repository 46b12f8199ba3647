//! End-to-end run orchestration: search, parallel reconciliation,
//! sink, optional spreadsheet export.

use std::path::PathBuf;
use std::time::Instant;

use chrono::Utc;
use leadgen_core::SearchCriteria;
use leadgen_directory::DirectoryClient;
use leadgen_places::CacheStats;
use serde::Serialize;
use sqlx::PgPool;

use crate::batch::{self, FailurePolicy, DEFAULT_MAX_CONCURRENT};
use crate::error::PipelineError;
use crate::export::{self, ExportSummary};
use crate::reconcile::ReconciliationEngine;
use crate::sink::{self, IngestReport};

/// Knobs for one pipeline run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub max_concurrent: usize,
    pub failure_policy: FailurePolicy,
    /// Directory to write the workbook into; `None` skips the export
    /// stage entirely.
    pub export_dir: Option<PathBuf>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            failure_policy: FailurePolicy::SkipAndLog,
            export_dir: None,
        }
    }
}

/// Outcome of one end-to-end run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub listings_found: usize,
    pub pages_fetched: usize,
    /// Set when the search phase ended early on an upstream failure.
    /// Distinguishes "the directory had nothing" from "the directory
    /// was unreachable".
    pub search_error: Option<String>,
    pub verified: usize,
    pub ingest: IngestReport,
    pub cache: CacheStats,
    pub elapsed_ms: u64,
    pub export_file: Option<String>,
}

/// Runs the full pipeline for one set of criteria.
///
/// Sequential search, bounded-parallel reconciliation, sequential
/// sink, then the optional export. The cross-reference cache is reset
/// first so every run starts cold and its statistics are per-run.
///
/// # Errors
///
/// Database and export failures propagate, as does a reconciliation
/// failure under [`FailurePolicy::Escalate`]. Upstream search failures
/// do not: they surface in the report instead.
pub async fn run_search(
    directory: &DirectoryClient,
    engine: &ReconciliationEngine,
    pool: &PgPool,
    criteria: &SearchCriteria,
    options: &RunOptions,
) -> Result<RunReport, PipelineError> {
    let started = Instant::now();
    engine.reset_cache();

    tracing::info!(
        location = %criteria.location_query,
        category = %criteria.category_query,
        "starting pipeline run"
    );

    let outcome = directory.search(criteria).await;
    let listings_found = outcome.listings.len();

    if listings_found == 0 {
        tracing::warn!(
            search_error = outcome.error.as_deref().unwrap_or("none"),
            "search produced no listings, skipping downstream stages"
        );
        return Ok(RunReport {
            listings_found: 0,
            pages_fetched: outcome.pages_fetched,
            search_error: outcome.error,
            verified: 0,
            ingest: IngestReport::default(),
            cache: engine.cache_stats(),
            elapsed_ms: elapsed_ms(started),
            export_file: None,
        });
    }

    let verified = batch::process_all(
        engine,
        &outcome.listings,
        options.max_concurrent,
        options.failure_policy,
    )
    .await?;

    let export_file = match &options.export_dir {
        Some(dir) if !verified.is_empty() => {
            let filename = export::default_filename(criteria, Utc::now());
            let path = dir.join(&filename);
            let summary = ExportSummary {
                criteria: Some(criteria.clone()),
                cache_stats: engine.cache_stats(),
                exported_at: Utc::now(),
            };
            export::write_workbook(&path, &verified, &summary)?;
            leadgen_db::record_export(
                pool,
                &filename,
                &path.to_string_lossy(),
                verified.len() as i64,
            )
            .await?;
            Some(filename)
        }
        _ => None,
    };

    let verified_count = verified.len();
    let ingest = sink::ingest(pool, verified).await?;

    let report = RunReport {
        listings_found,
        pages_fetched: outcome.pages_fetched,
        search_error: outcome.error,
        verified: verified_count,
        ingest,
        cache: engine.cache_stats(),
        elapsed_ms: elapsed_ms(started),
        export_file,
    };

    tracing::info!(
        listings = report.listings_found,
        verified = report.verified,
        inserted = report.ingest.inserted,
        elapsed_ms = report.elapsed_ms,
        "pipeline run finished"
    );

    Ok(report)
}

#[allow(clippy::cast_possible_truncation)]
fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}
