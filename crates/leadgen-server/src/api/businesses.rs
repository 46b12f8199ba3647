//! GET/DELETE /api/v1/businesses — stored business records.

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use leadgen_db::BusinessRow;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_db_error, normalize_limit, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(in crate::api) struct ListParams {
    limit: Option<i64>,
    offset: Option<i64>,
}

#[derive(Debug, Serialize)]
pub(in crate::api) struct BusinessListData {
    items: Vec<BusinessRow>,
    total: i64,
}

pub(in crate::api) async fn list_businesses(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<ListParams>,
) -> Result<Json<ApiResponse<BusinessListData>>, ApiError> {
    let limit = normalize_limit(params.limit);
    let offset = params.offset.unwrap_or(0).max(0);

    let items = leadgen_db::list_businesses(&state.pool, limit, offset)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
    let total = leadgen_db::count_businesses(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: BusinessListData { items, total },
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(in crate::api) async fn get_business(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<BusinessRow>>, ApiError> {
    let row = leadgen_db::get_business(&state.pool, id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?
        .ok_or_else(|| ApiError::new(req_id.0.clone(), "not_found", "business not found"))?;

    Ok(Json(ApiResponse {
        data: row,
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[derive(Debug, Serialize)]
pub(in crate::api) struct DeletedData {
    deleted: bool,
}

pub(in crate::api) async fn delete_business(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<DeletedData>>, ApiError> {
    let deleted = leadgen_db::delete_business(&state.pool, id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    if !deleted {
        return Err(ApiError::new(req_id.0, "not_found", "business not found"));
    }

    Ok(Json(ApiResponse {
        data: DeletedData { deleted },
        meta: ResponseMeta::new(req_id.0),
    }))
}
