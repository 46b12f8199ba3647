//! Database operations for the `exports` table, which records every
//! workbook written to disk.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use crate::DbError;

/// A row from the `exports` table.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ExportRow {
    pub id: i64,
    pub filename: String,
    pub filepath: String,
    pub record_count: i64,
    pub created_at: DateTime<Utc>,
}

const EXPORT_COLUMNS: &str = "id, filename, filepath, record_count, created_at";

/// Records a written workbook and returns the inserted row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn record_export(
    pool: &PgPool,
    filename: &str,
    filepath: &str,
    record_count: i64,
) -> Result<ExportRow, DbError> {
    let row = sqlx::query_as::<_, ExportRow>(&format!(
        "INSERT INTO exports (filename, filepath, record_count) \
         VALUES ($1, $2, $3) \
         RETURNING {EXPORT_COLUMNS}"
    ))
    .bind(filename)
    .bind(filepath)
    .bind(record_count)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// Returns all recorded exports, most recent first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_exports(pool: &PgPool) -> Result<Vec<ExportRow>, DbError> {
    let rows = sqlx::query_as::<_, ExportRow>(&format!(
        "SELECT {EXPORT_COLUMNS} FROM exports ORDER BY created_at DESC, id DESC"
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Returns a single export record by id, or `None` if not found.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_export(pool: &PgPool, id: i64) -> Result<Option<ExportRow>, DbError> {
    let row = sqlx::query_as::<_, ExportRow>(&format!(
        "SELECT {EXPORT_COLUMNS} FROM exports WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}
