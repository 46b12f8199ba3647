use leadgen_core::AppConfig;
use leadgen_verify::AddressVerifier;

/// Verify a single postal address and print the outcome.
///
/// # Errors
///
/// Returns an error when verification credentials are missing or the
/// client cannot be built. Upstream verification failures are printed,
/// not propagated.
pub(crate) async fn run_verify_address(
    config: &AppConfig,
    street: &str,
    city: &str,
    state: &str,
    zip: &str,
) -> anyhow::Result<()> {
    let creds = config.verify_credentials.as_ref().ok_or_else(|| {
        anyhow::anyhow!(
            "LEADGEN_VERIFY_AUTH_ID/LEADGEN_VERIFY_AUTH_TOKEN are not set; cannot verify addresses"
        )
    })?;

    let verifier = AddressVerifier::new(
        &creds.auth_id,
        &creds.auth_token,
        config.http_timeout_secs,
        &config.http_user_agent,
    )?;

    let result = verifier.verify(street, city, state, zip).await;

    println!("status:     {}", result.status.as_str());
    println!("confidence: {:.2}", result.confidence);
    if result.verified {
        println!(
            "canonical:  {}, {}, {} {}",
            result.verified_street.as_deref().unwrap_or(street),
            result.verified_city.as_deref().unwrap_or(city),
            result.verified_state.as_deref().unwrap_or(state),
            result.verified_zip.as_deref().unwrap_or(zip),
        );
    }
    if let Some(error) = &result.error {
        println!("detail:     {error}");
    }

    Ok(())
}
