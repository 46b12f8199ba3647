//! Database operations for the `leads` table. A lead is follow-up
//! state (status + notes) attached to a stored business.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use crate::DbError;

/// A row from the `leads` table.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct LeadRow {
    pub id: i64,
    pub business_id: i64,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

const LEAD_COLUMNS: &str = "id, business_id, status, notes, created_at, updated_at";

/// Creates a lead against a stored business and returns the inserted row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails (including a foreign
/// key violation for an unknown business id).
pub async fn create_lead(
    pool: &PgPool,
    business_id: i64,
    status: &str,
    notes: Option<&str>,
) -> Result<LeadRow, DbError> {
    let row = sqlx::query_as::<_, LeadRow>(&format!(
        "INSERT INTO leads (business_id, status, notes) \
         VALUES ($1, $2, $3) \
         RETURNING {LEAD_COLUMNS}"
    ))
    .bind(business_id)
    .bind(status)
    .bind(notes)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// Returns all leads, most recently updated first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_leads(pool: &PgPool) -> Result<Vec<LeadRow>, DbError> {
    let rows = sqlx::query_as::<_, LeadRow>(&format!(
        "SELECT {LEAD_COLUMNS} FROM leads ORDER BY updated_at DESC, id DESC"
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Returns a single lead by id, or `None` if not found.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_lead(pool: &PgPool, id: i64) -> Result<Option<LeadRow>, DbError> {
    let row = sqlx::query_as::<_, LeadRow>(&format!(
        "SELECT {LEAD_COLUMNS} FROM leads WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Updates a lead's status and/or notes.
///
/// `Some(v)` sets the field, `None` preserves it; for `notes`,
/// `Some(None)` clears the column. Returns [`DbError::NotFound`] when
/// the id does not exist.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn update_lead(
    pool: &PgPool,
    id: i64,
    status: Option<&str>,
    notes: Option<Option<&str>>,
) -> Result<LeadRow, DbError> {
    let notes_supplied = notes.is_some();
    let notes_val = notes.flatten();

    let row = sqlx::query_as::<_, LeadRow>(&format!(
        "UPDATE leads \
         SET status     = COALESCE($2, status), \
             notes      = CASE WHEN $3::BOOL THEN $4 ELSE notes END, \
             updated_at = NOW() \
         WHERE id = $1 \
         RETURNING {LEAD_COLUMNS}"
    ))
    .bind(id)
    .bind(status)
    .bind(notes_supplied)
    .bind(notes_val)
    .fetch_optional(pool)
    .await?;

    row.ok_or(DbError::NotFound)
}

/// Deletes a lead. Returns whether a row was actually removed.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn delete_lead(pool: &PgPool, id: i64) -> Result<bool, DbError> {
    let result = sqlx::query("DELETE FROM leads WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
