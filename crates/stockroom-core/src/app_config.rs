use std::num::NonZeroUsize;
use std::path::PathBuf;

use crate::ConfigError;

/// Environment variable naming the catalog endpoint.
pub const CATALOG_URL_VAR: &str = "STOCKROOM_CATALOG_URL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Runtime configuration for the catalog client and cart store.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Spreadsheet-backed endpoint returning the flat row array. Only
    /// commands that fetch the catalog need it.
    pub catalog_url: Option<String>,
    pub env: Environment,
    pub log_level: String,
    /// Number of products per feed batch.
    pub page_size: NonZeroUsize,
    /// Directory holding the persisted cart file.
    pub cart_dir: PathBuf,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Additional attempts after the first failure on transient errors.
    /// `0` matches the single-shot fetch of the storefront page.
    pub max_retries: u32,
    pub retry_backoff_base_secs: u64,
}

impl AppConfig {
    /// Returns the catalog endpoint for commands that fetch rows.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] when `STOCKROOM_CATALOG_URL`
    /// is unset or blank.
    pub fn require_catalog_url(&self) -> Result<&str, ConfigError> {
        self.catalog_url
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar(CATALOG_URL_VAR.to_string()))
    }
}
