//! Database operations for the `businesses` table.

use chrono::{DateTime, Utc};
use leadgen_core::{BusinessStatus, ConfidenceLevel, VerifiedBusiness};
use serde::Serialize;
use sqlx::PgPool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `businesses` table.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct BusinessRow {
    pub id: i64,
    pub external_id: String,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub phone: String,
    pub source: String,
    pub confidence: String,
    pub status: String,
    pub discrepancy_note: Option<String>,
    pub rating: Option<f64>,
    pub review_count: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl BusinessRow {
    /// Maps the stored row back onto the pipeline's domain type.
    /// Unrecognized labels fall back to the pipeline defaults.
    #[must_use]
    pub fn to_verified(&self) -> VerifiedBusiness {
        VerifiedBusiness {
            external_id: self.external_id.clone(),
            name: self.name.clone(),
            address: self.address.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            zip_code: self.zip_code.clone(),
            phone: self.phone.clone(),
            source: self.source.clone(),
            confidence: parse_confidence(&self.confidence),
            status: parse_status(&self.status),
            discrepancy_note: self.discrepancy_note.clone(),
            rating: self.rating,
            review_count: self.review_count,
        }
    }
}

fn parse_confidence(label: &str) -> ConfidenceLevel {
    match label {
        "low" => ConfidenceLevel::Low,
        "high" => ConfidenceLevel::High,
        _ => ConfidenceLevel::Medium,
    }
}

fn parse_status(label: &str) -> BusinessStatus {
    match label {
        "open" => BusinessStatus::Open,
        "closed" => BusinessStatus::Closed,
        _ => BusinessStatus::Unknown,
    }
}

const BUSINESS_COLUMNS: &str = "id, external_id, name, address, city, state, zip_code, phone, \
                                source, confidence, status, discrepancy_note, rating, \
                                review_count, created_at";

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Inserts a batch of verified businesses in one round-trip.
///
/// Uses a single `INSERT … SELECT * FROM UNNEST(…)` with
/// `ON CONFLICT (external_id) DO NOTHING`, so a record whose external id
/// is already stored is skipped, never overwritten (first write wins).
/// Returns the number of rows actually written.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn insert_businesses(
    pool: &PgPool,
    businesses: &[VerifiedBusiness],
) -> Result<u64, DbError> {
    if businesses.is_empty() {
        return Ok(0);
    }

    // Collect each column into a parallel Vec for UNNEST binding.
    let mut external_ids: Vec<String> = Vec::with_capacity(businesses.len());
    let mut names: Vec<String> = Vec::with_capacity(businesses.len());
    let mut addresses: Vec<String> = Vec::with_capacity(businesses.len());
    let mut cities: Vec<String> = Vec::with_capacity(businesses.len());
    let mut states: Vec<String> = Vec::with_capacity(businesses.len());
    let mut zip_codes: Vec<String> = Vec::with_capacity(businesses.len());
    let mut phones: Vec<String> = Vec::with_capacity(businesses.len());
    let mut sources: Vec<String> = Vec::with_capacity(businesses.len());
    let mut confidences: Vec<String> = Vec::with_capacity(businesses.len());
    let mut statuses: Vec<String> = Vec::with_capacity(businesses.len());
    let mut notes: Vec<Option<String>> = Vec::with_capacity(businesses.len());
    let mut ratings: Vec<Option<f64>> = Vec::with_capacity(businesses.len());
    let mut review_counts: Vec<Option<i64>> = Vec::with_capacity(businesses.len());

    for business in businesses {
        external_ids.push(business.external_id.clone());
        names.push(business.name.clone());
        addresses.push(business.address.clone());
        cities.push(business.city.clone());
        states.push(business.state.clone());
        zip_codes.push(business.zip_code.clone());
        phones.push(business.phone.clone());
        sources.push(business.source.clone());
        confidences.push(business.confidence.as_str().to_string());
        statuses.push(business.status.as_str().to_string());
        notes.push(business.discrepancy_note.clone());
        ratings.push(business.rating);
        review_counts.push(business.review_count);
    }

    let result = sqlx::query(
        "INSERT INTO businesses \
             (external_id, name, address, city, state, zip_code, phone, source, \
              confidence, status, discrepancy_note, rating, review_count) \
         SELECT * FROM UNNEST(\
              $1::text[], $2::text[], $3::text[], $4::text[], $5::text[], $6::text[], \
              $7::text[], $8::text[], $9::text[], $10::text[], $11::text[], \
              $12::float8[], $13::int8[]) \
         ON CONFLICT (external_id) DO NOTHING",
    )
    .bind(&external_ids)
    .bind(&names)
    .bind(&addresses)
    .bind(&cities)
    .bind(&states)
    .bind(&zip_codes)
    .bind(&phones)
    .bind(&sources)
    .bind(&confidences)
    .bind(&statuses)
    .bind(&notes)
    .bind(&ratings)
    .bind(&review_counts)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Returns a page of stored businesses, most recent first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_businesses(
    pool: &PgPool,
    limit: i64,
    offset: i64,
) -> Result<Vec<BusinessRow>, DbError> {
    let rows = sqlx::query_as::<_, BusinessRow>(&format!(
        "SELECT {BUSINESS_COLUMNS} FROM businesses \
         ORDER BY created_at DESC, id DESC \
         LIMIT $1 OFFSET $2"
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns every stored business ordered by name, for full exports.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn all_businesses(pool: &PgPool) -> Result<Vec<BusinessRow>, DbError> {
    let rows = sqlx::query_as::<_, BusinessRow>(&format!(
        "SELECT {BUSINESS_COLUMNS} FROM businesses ORDER BY name"
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns a single business by id, or `None` if not found.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_business(pool: &PgPool, id: i64) -> Result<Option<BusinessRow>, DbError> {
    let row = sqlx::query_as::<_, BusinessRow>(&format!(
        "SELECT {BUSINESS_COLUMNS} FROM businesses WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Total number of stored businesses.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_businesses(pool: &PgPool) -> Result<i64, DbError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM businesses")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Deletes a business (and its leads, via cascade). Returns whether a
/// row was actually removed.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn delete_business(pool: &PgPool, id: i64) -> Result<bool, DbError> {
    let result = sqlx::query("DELETE FROM businesses WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(confidence: &str, status: &str) -> BusinessRow {
        BusinessRow {
            id: 1,
            external_id: "cafe-roze".to_string(),
            name: "Cafe Roze".to_string(),
            address: "1115 Porter Rd".to_string(),
            city: "Nashville".to_string(),
            state: "TN".to_string(),
            zip_code: "37206".to_string(),
            phone: String::new(),
            source: "directory+crossref_medium".to_string(),
            confidence: confidence.to_string(),
            status: status.to_string(),
            discrepancy_note: None,
            rating: Some(4.5),
            review_count: Some(812),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn row_maps_back_to_domain_type() {
        let verified = row("high", "closed").to_verified();
        assert_eq!(verified.confidence, ConfidenceLevel::High);
        assert_eq!(verified.status, BusinessStatus::Closed);
        assert_eq!(verified.external_id, "cafe-roze");
    }

    #[test]
    fn unknown_labels_fall_back_to_defaults() {
        let verified = row("certain", "demolished").to_verified();
        assert_eq!(verified.confidence, ConfidenceLevel::Medium);
        assert_eq!(verified.status, BusinessStatus::Unknown);
    }
}
