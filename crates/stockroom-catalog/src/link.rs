//! Links from a catalog listing to the per-product detail view.

use crate::error::CatalogError;

/// Returns `page_url` with its `id` query parameter set to `product_id`.
///
/// Other query parameters are kept in order; an existing `id` is replaced.
///
/// # Errors
///
/// Returns [`CatalogError::InvalidUrl`] if `page_url` is not an absolute URL.
pub fn product_detail_url(page_url: &str, product_id: &str) -> Result<String, CatalogError> {
    let mut url = reqwest::Url::parse(page_url).map_err(|e| CatalogError::InvalidUrl {
        url: page_url.to_owned(),
        reason: e.to_string(),
    })?;

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != "id")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    url.query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair("id", product_id.trim());

    Ok(url.to_string())
}
