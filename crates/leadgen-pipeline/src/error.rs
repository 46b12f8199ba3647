use thiserror::Error;

use crate::export::ExportError;
use crate::reconcile::ReconcileError;

/// Failures that abort a pipeline run. Per-item reconciliation errors
/// only appear here under [`crate::FailurePolicy::Escalate`]; the sink
/// and export stages always propagate.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("reconciliation failed for \"{name}\": {source}")]
    Reconcile {
        name: String,
        #[source]
        source: ReconcileError,
    },

    #[error(transparent)]
    Db(#[from] leadgen_db::DbError),

    #[error(transparent)]
    Export(#[from] ExportError),
}
