use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

/// Returns a map with all required env vars populated with valid defaults.
fn full_env<'a>() -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert("STOCKROOM_CATALOG_URL", "https://script.example.com/exec");
    m
}

#[test]
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_test() {
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "STOCKROOM_ENV"));
}

#[test]
fn build_app_config_allows_missing_catalog_url() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.catalog_url.is_none());
    let err = cfg.require_catalog_url().unwrap_err();
    assert!(
        matches!(err, ConfigError::MissingEnvVar(ref v) if v == "STOCKROOM_CATALOG_URL"),
        "expected MissingEnvVar(STOCKROOM_CATALOG_URL), got: {err:?}"
    );
}

#[test]
fn build_app_config_treats_blank_catalog_url_as_missing() {
    let mut map = HashMap::new();
    map.insert("STOCKROOM_CATALOG_URL", "   ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.catalog_url.is_none());
}

#[test]
fn build_app_config_rejects_non_http_catalog_url() {
    let mut map = HashMap::new();
    map.insert("STOCKROOM_CATALOG_URL", "ftp://example.com/rows");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "STOCKROOM_CATALOG_URL"),
        "expected InvalidEnvVar(STOCKROOM_CATALOG_URL), got: {result:?}"
    );
}

#[test]
fn build_app_config_succeeds_with_all_required_vars() {
    let map = full_env();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(
        cfg.require_catalog_url().unwrap(),
        "https://script.example.com/exec"
    );
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.page_size.get(), 20);
    assert_eq!(cfg.cart_dir, std::path::PathBuf::from("./.stockroom"));
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.user_agent, "stockroom/0.1 (catalog-client)");
    assert_eq!(cfg.max_retries, 0);
    assert_eq!(cfg.retry_backoff_base_secs, 2);
}

#[test]
fn page_size_override() {
    let mut map = full_env();
    map.insert("STOCKROOM_PAGE_SIZE", "50");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.page_size.get(), 50);
}

#[test]
fn page_size_zero_is_rejected() {
    let mut map = full_env();
    map.insert("STOCKROOM_PAGE_SIZE", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "STOCKROOM_PAGE_SIZE"),
        "expected InvalidEnvVar(STOCKROOM_PAGE_SIZE), got: {result:?}"
    );
}

#[test]
fn page_size_invalid() {
    let mut map = full_env();
    map.insert("STOCKROOM_PAGE_SIZE", "twenty");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "STOCKROOM_PAGE_SIZE"),
        "expected InvalidEnvVar(STOCKROOM_PAGE_SIZE), got: {result:?}"
    );
}

#[test]
fn cart_dir_override() {
    let mut map = full_env();
    map.insert("STOCKROOM_CART_DIR", "/var/lib/stockroom");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.cart_dir, std::path::PathBuf::from("/var/lib/stockroom"));
}

#[test]
fn request_timeout_secs_override() {
    let mut map = full_env();
    map.insert("STOCKROOM_REQUEST_TIMEOUT_SECS", "60");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.request_timeout_secs, 60);
}

#[test]
fn request_timeout_secs_invalid() {
    let mut map = full_env();
    map.insert("STOCKROOM_REQUEST_TIMEOUT_SECS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "STOCKROOM_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(STOCKROOM_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn user_agent_override() {
    let mut map = full_env();
    map.insert("STOCKROOM_USER_AGENT", "custom-agent/2.0");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.user_agent, "custom-agent/2.0");
}

#[test]
fn max_retries_override() {
    let mut map = full_env();
    map.insert("STOCKROOM_MAX_RETRIES", "3");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.max_retries, 3);
}

#[test]
fn max_retries_invalid() {
    let mut map = full_env();
    map.insert("STOCKROOM_MAX_RETRIES", "-1");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "STOCKROOM_MAX_RETRIES"),
        "expected InvalidEnvVar(STOCKROOM_MAX_RETRIES), got: {result:?}"
    );
}

#[test]
fn retry_backoff_base_secs_override() {
    let mut map = full_env();
    map.insert("STOCKROOM_RETRY_BACKOFF_BASE_SECS", "10");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.retry_backoff_base_secs, 10);
}

#[test]
fn environment_override_production() {
    let mut map = full_env();
    map.insert("STOCKROOM_ENV", "production");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Production);
    assert_eq!(cfg.env.to_string(), "production");
}
