//! /api/v1/exports — workbook export records, plus export-all.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::Utc;
use leadgen_db::ExportRow;
use leadgen_pipeline::{export_all_filename, write_workbook, ExportSummary};
use leadgen_places::CacheStats;

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

pub(in crate::api) async fn list_exports(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<ExportRow>>>, ApiError> {
    let rows = leadgen_db::list_exports(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(in crate::api) async fn get_export(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<ExportRow>>, ApiError> {
    let row = leadgen_db::get_export(&state.pool, id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?
        .ok_or_else(|| ApiError::new(req_id.0.clone(), "not_found", "export not found"))?;

    Ok(Json(ApiResponse {
        data: row,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// POST /api/v1/exports — write every stored business to a workbook in
/// the configured export directory and record it.
pub(in crate::api) async fn export_all(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<ExportRow>>, ApiError> {
    let rows = leadgen_db::all_businesses(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    if rows.is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "not_found",
            "no businesses stored",
        ));
    }

    let businesses: Vec<_> = rows.iter().map(leadgen_db::BusinessRow::to_verified).collect();

    let export_dir = &state.config.export_dir;
    if let Err(e) = std::fs::create_dir_all(export_dir) {
        tracing::error!(error = %e, dir = %export_dir.display(), "cannot create export directory");
        return Err(ApiError::new(
            req_id.0,
            "internal_error",
            "export directory unavailable",
        ));
    }

    let filename = export_all_filename(Utc::now());
    let path = export_dir.join(&filename);
    let summary = ExportSummary {
        criteria: None,
        cache_stats: CacheStats::default(),
        exported_at: Utc::now(),
    };

    if let Err(e) = write_workbook(&path, &businesses, &summary) {
        tracing::error!(error = %e, "workbook write failed");
        return Err(ApiError::new(
            req_id.0,
            "internal_error",
            "workbook write failed",
        ));
    }

    let record = leadgen_db::record_export(
        &state.pool,
        &filename,
        &path.to_string_lossy(),
        businesses.len() as i64,
    )
    .await
    .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: record,
        meta: ResponseMeta::new(req_id.0),
    }))
}
