mod export;
mod search;
mod verify;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "leadgen-cli")]
#[command(about = "Business lead generation command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search a directory, cross-reference and verify the results, and
    /// store them
    Search {
        /// Location to search (e.g., "Nashville, TN")
        #[arg(long)]
        location: String,
        /// Business category (aliases like "retail" are resolved)
        #[arg(long)]
        category: String,
        /// Search radius in miles
        #[arg(long, default_value = "5.0")]
        radius: f64,
        /// Maximum number of listings to fetch
        #[arg(long, default_value = "25")]
        max_results: usize,
        /// Write an .xlsx workbook into the configured export directory
        #[arg(long)]
        export: bool,
    },
    /// Export every stored business to an .xlsx workbook
    Export,
    /// Verify a single postal address and print the outcome
    VerifyAddress {
        #[arg(long)]
        street: String,
        #[arg(long)]
        city: String,
        #[arg(long)]
        state: String,
        #[arg(long)]
        zip: String,
    },
    /// Apply pending database migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = leadgen_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Search {
            location,
            category,
            radius,
            max_results,
            export,
        } => {
            let pool = connect(&config).await?;
            search::run_search(&pool, &config, &location, &category, radius, max_results, export)
                .await
        }
        Commands::Export => {
            let pool = connect(&config).await?;
            export::run_export(&pool, &config).await
        }
        Commands::VerifyAddress {
            street,
            city,
            state,
            zip,
        } => verify::run_verify_address(&config, &street, &city, &state, &zip).await,
        Commands::Migrate => {
            let pool = connect(&config).await?;
            let applied = leadgen_db::run_migrations(&pool).await?;
            println!("applied {applied} migration(s)");
            Ok(())
        }
    }
}

async fn connect(config: &leadgen_core::AppConfig) -> anyhow::Result<sqlx::PgPool> {
    let pool_config = leadgen_db::PoolConfig::from_app_config(config);
    let pool = leadgen_db::connect_pool(&config.database_url, pool_config).await?;
    leadgen_db::run_migrations(&pool).await?;
    Ok(pool)
}
