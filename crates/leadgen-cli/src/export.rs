use chrono::Utc;
use leadgen_core::AppConfig;
use leadgen_pipeline::{export_all_filename, write_workbook, ExportSummary};
use leadgen_places::CacheStats;

/// Export every stored business to an .xlsx workbook in the configured
/// export directory and record the export.
///
/// # Errors
///
/// Returns an error when the database query, the directory creation,
/// or the workbook write fails.
pub(crate) async fn run_export(pool: &sqlx::PgPool, config: &AppConfig) -> anyhow::Result<()> {
    let rows = leadgen_db::all_businesses(pool).await?;
    if rows.is_empty() {
        println!("no businesses stored; run `search` first");
        return Ok(());
    }

    let businesses: Vec<_> = rows.iter().map(leadgen_db::BusinessRow::to_verified).collect();

    std::fs::create_dir_all(&config.export_dir)?;
    let filename = export_all_filename(Utc::now());
    let path = config.export_dir.join(&filename);
    let summary = ExportSummary {
        criteria: None,
        cache_stats: CacheStats::default(),
        exported_at: Utc::now(),
    };
    write_workbook(&path, &businesses, &summary)?;

    let record = leadgen_db::record_export(
        pool,
        &filename,
        &path.to_string_lossy(),
        businesses.len() as i64,
    )
    .await?;

    println!(
        "exported {} business(es) to {} (export id {})",
        businesses.len(),
        path.display(),
        record.id
    );
    Ok(())
}
