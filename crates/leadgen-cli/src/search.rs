use leadgen_core::{resolve_category_alias, AppConfig, SearchCriteria};
use leadgen_directory::DirectoryClient;
use leadgen_pipeline::{ReconciliationEngine, RunOptions};
use leadgen_places::{CrossReferenceClient, PlacesClient};
use leadgen_verify::AddressVerifier;

/// Run the full search pipeline for one location/category pair and
/// print a run summary.
///
/// # Errors
///
/// Returns an error when the criteria are invalid, a client cannot be
/// built, or the database or export stage fails. Upstream search
/// failures are reported in the summary instead.
pub(crate) async fn run_search(
    pool: &sqlx::PgPool,
    config: &AppConfig,
    location: &str,
    category: &str,
    radius_miles: f64,
    max_results: usize,
    export: bool,
) -> anyhow::Result<()> {
    let category = resolve_category_alias(category);
    let criteria = SearchCriteria::new(location, category, radius_miles, max_results)?;

    let directory = DirectoryClient::new(
        &config.directory_api_key,
        config.http_timeout_secs,
        &config.http_user_agent,
    )?;
    let places = PlacesClient::new(
        &config.places_api_key,
        config.http_timeout_secs,
        &config.http_user_agent,
    )?;
    let verifier = match &config.verify_credentials {
        Some(creds) => Some(AddressVerifier::new(
            &creds.auth_id,
            &creds.auth_token,
            config.http_timeout_secs,
            &config.http_user_agent,
        )?),
        None => {
            tracing::warn!("verification credentials absent, address verification disabled");
            None
        }
    };
    let engine = ReconciliationEngine::new(CrossReferenceClient::new(places), verifier);

    let options = RunOptions {
        max_concurrent: config.max_concurrent_reconciliations,
        export_dir: export.then(|| {
            std::fs::create_dir_all(&config.export_dir).ok();
            config.export_dir.clone()
        }),
        ..RunOptions::default()
    };

    let report = leadgen_pipeline::run_search(&directory, &engine, pool, &criteria, &options).await?;

    println!(
        "search: {} listings across {} page(s)",
        report.listings_found, report.pages_fetched
    );
    if let Some(error) = &report.search_error {
        println!("search ended early: {error}");
    }
    println!("verified: {} business(es)", report.verified);
    println!(
        "stored: {} inserted, {} duplicate(s) dropped, {} already present",
        report.ingest.inserted, report.ingest.deduped, report.ingest.skipped
    );
    println!(
        "cross-reference: {} API call(s), {} cache hit(s), {} miss(es)",
        report.cache.api_calls, report.cache.hits, report.cache.misses
    );
    if let Some(file) = &report.export_file {
        println!("workbook written: {file}");
    }
    println!("elapsed: {} ms", report.elapsed_ms);

    Ok(())
}
