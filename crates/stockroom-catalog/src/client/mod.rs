//! HTTP client for the spreadsheet-backed catalog endpoint.

mod origin;

use std::time::Duration;

use reqwest::Client;
use stockroom_core::{AppConfig, Product};

use crate::catalog::build_catalog;
use crate::error::CatalogError;
use crate::rate_limit::retry_with_backoff;
use crate::types::{decode_rows, Row};

/// Fetches the flat row array from the catalog endpoint.
///
/// Non-2xx responses map to typed errors ([`CatalogError::RateLimited`],
/// [`CatalogError::NotFound`], [`CatalogError::UnexpectedStatus`]). Transient
/// failures are retried with exponential backoff up to `max_retries`
/// additional attempts.
pub struct CatalogClient {
    client: Client,
    /// Maximum number of retry attempts after the first failure.
    max_retries: u32,
    /// Base delay in seconds for exponential backoff: `backoff_base_secs * 2^attempt`.
    backoff_base_secs: u64,
}

impl CatalogClient {
    /// Creates a `CatalogClient` with the given timeout, `User-Agent`, and
    /// retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            max_retries,
            backoff_base_secs,
        })
    }

    /// Creates a client from the `STOCKROOM_*` settings.
    ///
    /// # Errors
    ///
    /// See [`CatalogClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, CatalogError> {
        Self::new(
            config.request_timeout_secs,
            &config.user_agent,
            config.max_retries,
            config.retry_backoff_base_secs,
        )
    }

    /// Fetches and decodes the row array at `url`.
    ///
    /// An empty array, or a JSON body that is not an array, yields an empty
    /// list rather than an error.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::InvalidUrl`]: `url` is not an absolute `http(s)` URL.
    /// - [`CatalogError::RateLimited`]: HTTP 429 after all retries.
    /// - [`CatalogError::NotFound`]: HTTP 404 (not retried).
    /// - [`CatalogError::UnexpectedStatus`]: any other non-2xx status.
    /// - [`CatalogError::Http`]: network or TLS failure after all retries.
    /// - [`CatalogError::Deserialize`]: body is not JSON (not retried).
    /// - [`CatalogError::Upstream`]: body is an `{"error": ...}` object.
    pub async fn fetch_rows(&self, url: &str) -> Result<Vec<Row>, CatalogError> {
        let url = validate_url(url)?;

        let rows = retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.clone();
            async move {
                let response = self
                    .client
                    .get(&url)
                    .header(reqwest::header::ACCEPT, "application/json")
                    .header(reqwest::header::CACHE_CONTROL, "no-cache")
                    .send()
                    .await?;
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(60);
                    return Err(CatalogError::RateLimited {
                        domain: origin::extract_domain(&url),
                        retry_after_secs,
                    });
                }

                if status == reqwest::StatusCode::NOT_FOUND {
                    return Err(CatalogError::NotFound { url });
                }

                if !status.is_success() {
                    return Err(CatalogError::UnexpectedStatus {
                        status: status.as_u16(),
                        url,
                    });
                }

                let body = response.text().await?;
                decode_rows(&body, &format!("catalog rows from {url}"))
            }
        })
        .await?;

        tracing::info!(rows = rows.len(), "fetched catalog rows");
        Ok(rows)
    }

    /// Fetches rows from `url` and groups them into products.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Self::fetch_rows`].
    pub async fn fetch_catalog(&self, url: &str) -> Result<Vec<Product>, CatalogError> {
        let rows = self.fetch_rows(url).await?;
        Ok(build_catalog(rows))
    }
}

/// Checks that `url` is an absolute `http(s)` URL and returns it normalized.
fn validate_url(url: &str) -> Result<String, CatalogError> {
    let parsed = reqwest::Url::parse(url).map_err(|e| CatalogError::InvalidUrl {
        url: url.to_owned(),
        reason: e.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(CatalogError::InvalidUrl {
            url: url.to_owned(),
            reason: format!("unsupported scheme \"{}\"", parsed.scheme()),
        });
    }
    Ok(parsed.to_string())
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
