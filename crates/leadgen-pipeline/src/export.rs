//! Spreadsheet export: one data sheet of verified businesses plus a
//! summary sheet of run statistics.

use std::path::Path;

use chrono::{DateTime, Utc};
use leadgen_core::{ConfidenceLevel, SearchCriteria, VerifiedBusiness};
use leadgen_places::CacheStats;
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("spreadsheet error: {0}")]
    Xlsx(#[from] XlsxError),
}

/// Run statistics written to the summary sheet. `criteria` is `None`
/// for exports of the whole store, which have no originating search.
#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub criteria: Option<SearchCriteria>,
    pub cache_stats: CacheStats,
    pub exported_at: DateTime<Utc>,
}

const LEADS_HEADERS: [&str; 12] = [
    "Business Name",
    "Address",
    "City",
    "State",
    "Zip Code",
    "Phone Number",
    "Source",
    "Confidence Level",
    "Business Status",
    "Rating",
    "Review Count",
    "Discrepancy Note",
];

/// Default workbook filename:
/// `businesses_{category}_{location}_{timestamp}.xlsx`, with spaces
/// replaced and commas stripped so the name survives every filesystem.
#[must_use]
pub fn default_filename(criteria: &SearchCriteria, now: DateTime<Utc>) -> String {
    let category = sanitize(&criteria.category_query);
    let location = sanitize(&criteria.location_query);
    let timestamp = now.format("%Y%m%d_%H%M%S");
    format!("businesses_{category}_{location}_{timestamp}.xlsx")
}

/// Filename for a full-store export, which has no search criteria to
/// name it after.
#[must_use]
pub fn export_all_filename(now: DateTime<Utc>) -> String {
    format!("businesses_all_{}.xlsx", now.format("%Y%m%d_%H%M%S"))
}

fn sanitize(part: &str) -> String {
    part.replace(' ', "_").replace(',', "")
}

/// Writes the workbook to `path`.
///
/// # Errors
///
/// [`ExportError::Xlsx`] on any worksheet or save failure.
pub fn write_workbook(
    path: &Path,
    businesses: &[VerifiedBusiness],
    summary: &ExportSummary,
) -> Result<(), ExportError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    write_leads_sheet(workbook.add_worksheet(), businesses, &bold)?;
    write_summary_sheet(workbook.add_worksheet(), businesses, summary, &bold)?;

    workbook.save(path)?;
    tracing::info!(path = %path.display(), rows = businesses.len(), "workbook written");
    Ok(())
}

fn write_leads_sheet(
    sheet: &mut Worksheet,
    businesses: &[VerifiedBusiness],
    bold: &Format,
) -> Result<(), ExportError> {
    sheet.set_name("Business Leads")?;

    for (col, header) in (0u16..).zip(LEADS_HEADERS) {
        sheet.write_string_with_format(0, col, header, bold)?;
    }

    let mut row: u32 = 1;
    for business in businesses {
        sheet.write_string(row, 0, &business.name)?;
        sheet.write_string(row, 1, &business.address)?;
        sheet.write_string(row, 2, &business.city)?;
        sheet.write_string(row, 3, &business.state)?;
        sheet.write_string(row, 4, &business.zip_code)?;
        sheet.write_string(row, 5, &business.phone)?;
        sheet.write_string(row, 6, &business.source)?;
        sheet.write_string(row, 7, business.confidence.as_str())?;
        sheet.write_string(row, 8, business.status.as_str())?;
        match business.rating {
            Some(rating) => sheet.write_number(row, 9, rating)?,
            None => sheet.write_string(row, 9, "N/A")?,
        };
        match business.review_count {
            #[allow(clippy::cast_precision_loss)]
            Some(count) => sheet.write_number(row, 10, count as f64)?,
            None => sheet.write_string(row, 10, "N/A")?,
        };
        sheet.write_string(row, 11, business.discrepancy_note.as_deref().unwrap_or(""))?;
        row += 1;
    }

    Ok(())
}

#[allow(clippy::cast_precision_loss)]
fn write_summary_sheet(
    sheet: &mut Worksheet,
    businesses: &[VerifiedBusiness],
    summary: &ExportSummary,
    bold: &Format,
) -> Result<(), ExportError> {
    sheet.set_name("Summary")?;

    sheet.write_string_with_format(0, 0, "Metric", bold)?;
    sheet.write_string_with_format(0, 1, "Value", bold)?;

    let confidence_count = |level: ConfidenceLevel| {
        businesses.iter().filter(|b| b.confidence == level).count() as f64
    };
    let status_count = |status: leadgen_core::BusinessStatus| {
        businesses.iter().filter(|b| b.status == status).count() as f64
    };

    let stats = &summary.cache_stats;
    let mut rows: Vec<(&str, SummaryValue)> = vec![(
        "Total Businesses",
        SummaryValue::Num(businesses.len() as f64),
    )];
    if let Some(criteria) = &summary.criteria {
        rows.extend([
            ("Search Location", SummaryValue::Text(criteria.location_query.clone())),
            ("Category", SummaryValue::Text(criteria.category_query.clone())),
            ("Search Radius (miles)", SummaryValue::Num(criteria.radius_miles)),
            ("Max Results Requested", SummaryValue::Num(criteria.max_results as f64)),
        ]);
    }
    rows.extend([
        ("Confidence: high", SummaryValue::Num(confidence_count(ConfidenceLevel::High))),
        ("Confidence: medium", SummaryValue::Num(confidence_count(ConfidenceLevel::Medium))),
        ("Confidence: low", SummaryValue::Num(confidence_count(ConfidenceLevel::Low))),
        ("Status: open", SummaryValue::Num(status_count(leadgen_core::BusinessStatus::Open))),
        ("Status: closed", SummaryValue::Num(status_count(leadgen_core::BusinessStatus::Closed))),
        ("Status: unknown", SummaryValue::Num(status_count(leadgen_core::BusinessStatus::Unknown))),
        ("Cross-Reference API Calls", SummaryValue::Num(stats.api_calls as f64)),
        ("Cache Hits", SummaryValue::Num(stats.hits as f64)),
        ("Cache Misses", SummaryValue::Num(stats.misses as f64)),
        ("Cached Negative Results", SummaryValue::Num(stats.negative_entries as f64)),
        (
            "Export Date",
            SummaryValue::Text(summary.exported_at.format("%Y-%m-%d %H:%M:%S").to_string()),
        ),
    ]);

    let mut row: u32 = 1;
    for (metric, value) in rows {
        sheet.write_string(row, 0, metric)?;
        match value {
            SummaryValue::Num(n) => sheet.write_number(row, 1, n)?,
            SummaryValue::Text(s) => sheet.write_string(row, 1, &s)?,
        };
        row += 1;
    }

    Ok(())
}

enum SummaryValue {
    Num(f64),
    Text(String),
}
