//! Shared domain types and configuration for the leadgen workspace.

pub mod app_config;
pub mod business;
pub mod categories;
pub mod config;
pub mod criteria;

pub use app_config::{AppConfig, Environment};
pub use business::{BusinessStatus, ConfidenceLevel, VerifiedBusiness};
pub use categories::resolve_category_alias;
pub use config::{load_app_config, load_app_config_from_env};
pub use criteria::{miles_to_meters, SearchCriteria};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Errors from constructing core domain values.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid search radius {0} miles (must be > 0 and <= 100)")]
    InvalidRadius(f64),

    #[error("max_results must be greater than zero")]
    InvalidMaxResults,

    #[error("search {0} must not be empty")]
    EmptyField(&'static str),
}
