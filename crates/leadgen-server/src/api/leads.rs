//! /api/v1/leads — follow-up state attached to stored businesses.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use leadgen_db::LeadRow;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

pub(in crate::api) async fn list_leads(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<LeadRow>>>, ApiError> {
    let rows = leadgen_db::list_leads(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows,
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[derive(Debug, Deserialize)]
pub(in crate::api) struct CreateLeadRequest {
    business_id: i64,
    #[serde(default = "default_lead_status")]
    status: String,
    #[serde(default)]
    notes: Option<String>,
}

fn default_lead_status() -> String {
    "new".to_string()
}

pub(in crate::api) async fn create_lead(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<CreateLeadRequest>,
) -> Result<Json<ApiResponse<LeadRow>>, ApiError> {
    // Reject unknown businesses with a 400 instead of bubbling the
    // foreign key violation up as a 500.
    let business = leadgen_db::get_business(&state.pool, body.business_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
    if business.is_none() {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "unknown business_id",
        ));
    }

    let row = leadgen_db::create_lead(
        &state.pool,
        body.business_id,
        &body.status,
        body.notes.as_deref(),
    )
    .await
    .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: row,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(in crate::api) async fn get_lead(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<LeadRow>>, ApiError> {
    let row = leadgen_db::get_lead(&state.pool, id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?
        .ok_or_else(|| ApiError::new(req_id.0.clone(), "not_found", "lead not found"))?;

    Ok(Json(ApiResponse {
        data: row,
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[derive(Debug, Deserialize)]
pub(in crate::api) struct UpdateLeadRequest {
    status: Option<String>,
    /// `null` clears the notes; omitting the key preserves them.
    #[serde(default, with = "double_option")]
    notes: Option<Option<String>>,
}

/// Distinguishes an absent JSON key (`None`) from an explicit `null`
/// (`Some(None)`).
mod double_option {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(de: D) -> Result<Option<Option<String>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(de).map(Some)
    }
}

pub(in crate::api) async fn update_lead(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateLeadRequest>,
) -> Result<Json<ApiResponse<LeadRow>>, ApiError> {
    let notes = body.notes.as_ref().map(|n| n.as_deref());

    let row = leadgen_db::update_lead(&state.pool, id, body.status.as_deref(), notes)
        .await
        .map_err(|e| match e {
            leadgen_db::DbError::NotFound => {
                ApiError::new(req_id.0.clone(), "not_found", "lead not found")
            }
            other => map_db_error(req_id.0.clone(), &other),
        })?;

    Ok(Json(ApiResponse {
        data: row,
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[derive(Debug, Serialize)]
pub(in crate::api) struct DeletedData {
    deleted: bool,
}

pub(in crate::api) async fn delete_lead(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<DeletedData>>, ApiError> {
    let deleted = leadgen_db::delete_lead(&state.pool, id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    if !deleted {
        return Err(ApiError::new(req_id.0, "not_found", "lead not found"));
    }

    Ok(Json(ApiResponse {
        data: DeletedData { deleted },
        meta: ResponseMeta::new(req_id.0),
    }))
}
