use std::num::NonZeroUsize;
use std::path::PathBuf;

use crate::app_config::{AppConfig, Environment, CATALOG_URL_VAR};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function,
/// so tests can drive it from a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_page_size = |var: &str, default: &str| -> Result<NonZeroUsize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<NonZeroUsize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let catalog_url = optional(CATALOG_URL_VAR);
    if let Some(url) = &catalog_url {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidEnvVar {
                var: CATALOG_URL_VAR.to_string(),
                reason: format!("\"{url}\" is not an http(s) URL"),
            });
        }
    }

    let env = parse_environment(&or_default("STOCKROOM_ENV", "development"))?;
    let log_level = or_default("STOCKROOM_LOG_LEVEL", "info");
    let page_size = parse_page_size("STOCKROOM_PAGE_SIZE", "20")?;
    let cart_dir = PathBuf::from(or_default("STOCKROOM_CART_DIR", "./.stockroom"));

    let request_timeout_secs = parse_u64("STOCKROOM_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("STOCKROOM_USER_AGENT", "stockroom/0.1 (catalog-client)");
    let max_retries = parse_u32("STOCKROOM_MAX_RETRIES", "0")?;
    let retry_backoff_base_secs = parse_u64("STOCKROOM_RETRY_BACKOFF_BASE_SECS", "2")?;

    Ok(AppConfig {
        catalog_url,
        env,
        log_level,
        page_size,
        cart_dir,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_secs,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "STOCKROOM_ENV".to_string(),
            reason: format!("expected development, test, or production; got \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
