pub mod app_config;
pub mod config;
pub mod number;
pub mod products;

use thiserror::Error;

pub use app_config::{AppConfig, Environment, CATALOG_URL_VAR};
pub use config::{load_app_config, load_app_config_from_env};
pub use number::parse_tolerant_number;
pub use products::{variant_label, Product, Variant, UNNAMED_ITEM};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
