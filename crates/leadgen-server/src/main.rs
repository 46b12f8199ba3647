mod api;
mod middleware;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(leadgen_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = leadgen_db::PoolConfig::from_app_config(&config);
    let pool = leadgen_db::connect_pool(&config.database_url, pool_config).await?;
    leadgen_db::run_migrations(&pool).await?;

    let directory = Arc::new(leadgen_directory::DirectoryClient::new(
        &config.directory_api_key,
        config.http_timeout_secs,
        &config.http_user_agent,
    )?);
    let places = leadgen_places::PlacesClient::new(
        &config.places_api_key,
        config.http_timeout_secs,
        &config.http_user_agent,
    )?;
    let verifier = match &config.verify_credentials {
        Some(creds) => Some(leadgen_verify::AddressVerifier::new(
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

    let app = build_app(AppState {
        pool,
        config: Arc::clone(&config),
        directory,
        places,
        verifier,
    });

    tracing::info!(addr = %config.bind_addr, env = %config.env, "starting server");
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
