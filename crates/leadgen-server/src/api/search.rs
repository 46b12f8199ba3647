//! POST /api/v1/search — trigger a full pipeline run.

use axum::{extract::State, Extension, Json};
use leadgen_core::{resolve_category_alias, SearchCriteria};
use leadgen_pipeline::{ReconciliationEngine, RunOptions, RunReport};
use leadgen_places::CrossReferenceClient;
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(in crate::api) struct SearchRequest {
    pub location: String,
    pub category: String,
    #[serde(default = "default_radius")]
    pub radius_miles: f64,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    /// Write a workbook into the configured export directory as part
    /// of the run.
    #[serde(default)]
    pub export: bool,
}

fn default_radius() -> f64 {
    5.0
}

fn default_max_results() -> usize {
    25
}

pub(in crate::api) async fn run_search(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<SearchRequest>,
) -> Result<Json<ApiResponse<RunReport>>, ApiError> {
    let category = resolve_category_alias(&body.category);
    let criteria =
        SearchCriteria::new(body.location, category, body.radius_miles, body.max_results)
            .map_err(|e| ApiError::new(req_id.0.clone(), "validation_error", e.to_string()))?;

    let options = RunOptions {
        max_concurrent: state.config.max_concurrent_reconciliations,
        export_dir: body.export.then(|| state.config.export_dir.clone()),
        ..RunOptions::default()
    };

    if let Some(dir) = &options.export_dir {
        if let Err(e) = std::fs::create_dir_all(dir) {
            tracing::error!(error = %e, dir = %dir.display(), "cannot create export directory");
            return Err(ApiError::new(
                req_id.0,
                "internal_error",
                "export directory unavailable",
            ));
        }
    }

    // One engine per request: the cross-reference cache and its
    // statistics belong to this run alone. Only the transport clients
    // are shared.
    let engine = ReconciliationEngine::new(
        CrossReferenceClient::new(state.places.clone()),
        state.verifier.clone(),
    );

    let report = leadgen_pipeline::run_search(
        &state.directory,
        &engine,
        &state.pool,
        &criteria,
        &options,
    )
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "pipeline run failed");
        ApiError::new(req_id.0.clone(), "internal_error", "pipeline run failed")
    })?;

    Ok(Json(ApiResponse {
        data: report,
        meta: ResponseMeta::new(req_id.0),
    }))
}
