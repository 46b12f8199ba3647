//! Business resolution and verification pipeline: search, bounded
//! parallel reconciliation, dedup/persist, spreadsheet export.

mod batch;
mod error;
pub mod export;
mod reconcile;
mod run;
mod sink;

pub use batch::{process_all, FailurePolicy, DEFAULT_MAX_CONCURRENT};
pub use error::PipelineError;
pub use export::{
    default_filename, export_all_filename, write_workbook, ExportError, ExportSummary,
};
pub use reconcile::{ReconcileError, ReconciliationEngine};
pub use run::{run_search, RunOptions, RunReport};
pub use sink::{dedup_by_external_id, ingest, IngestReport};
