//! Row types for the spreadsheet-backed catalog endpoint.
//!
//! ## Observed shape
//!
//! The endpoint serializes one sheet row per JSON object and returns them as a
//! top-level array. Cell types follow whatever the sheet holds:
//!
//! - `id` is usually a number (`1`) but hand-edited sheets produce strings
//!   (`"1"`, `" 1 "`) or empty cells. Rows with no usable id are dropped.
//! - Prices (`unitSale`, `discountPrice`) arrive as numbers, formatted strings
//!   (`"$9.99"`), empty strings, or `null`.
//! - Stock is `currentOnHand` on the listing sheet. The product-detail sheet
//!   names the same column `Stock`; both are accepted.
//! - `variant1` / `variant2` are free text (colour, size) and usually empty.
//!
//! On failure the script returns a JSON object `{ "error": "..." }` with a 200
//! status instead of an array.

use rust_decimal::Decimal;
use serde::Deserialize;
use stockroom_core::parse_tolerant_number;

use crate::error::CatalogError;

/// A single untyped spreadsheet cell.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Number(serde_json::Number),
    Bool(bool),
    /// Arrays or objects; never meaningful, kept so the row still parses.
    Other(serde_json::Value),
}

impl Cell {
    /// Trimmed textual content, or `None` when blank or not scalar text/number.
    #[must_use]
    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Text(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Cell::Number(n) => Some(n.to_string()),
            Cell::Bool(_) | Cell::Other(_) => None,
        }
    }

    /// Numeric content; see [`parse_tolerant_number`] for text cells.
    #[must_use]
    pub fn as_number(&self) -> Decimal {
        match self {
            Cell::Text(s) => parse_tolerant_number(s),
            Cell::Number(n) => {
                let raw = n.to_string();
                raw.parse::<Decimal>()
                    .or_else(|_| Decimal::from_scientific(&raw))
                    .unwrap_or(Decimal::ZERO)
            }
            Cell::Bool(_) | Cell::Other(_) => Decimal::ZERO,
        }
    }
}

/// One flat record from the endpoint: a single variant of a single product.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    #[serde(default)]
    pub id: Option<Cell>,
    #[serde(default)]
    pub item_name: Option<Cell>,
    #[serde(default)]
    pub description: Option<Cell>,
    #[serde(default)]
    pub image: Option<Cell>,
    #[serde(default)]
    pub unit_sale: Option<Cell>,
    #[serde(default)]
    pub discount_price: Option<Cell>,
    #[serde(default)]
    pub current_on_hand: Option<Cell>,
    /// Stock column as named on the product-detail sheet.
    #[serde(default, rename = "Stock")]
    pub stock_column: Option<Cell>,
    /// Lower-case spelling of the same column; read after `Stock`.
    #[serde(default, rename = "stock")]
    pub stock_lower: Option<Cell>,
    #[serde(default)]
    pub variant1: Option<Cell>,
    #[serde(default)]
    pub variant2: Option<Cell>,
}

impl Row {
    /// Grouping key, or `None` when the row must be discarded.
    #[must_use]
    pub fn product_id(&self) -> Option<String> {
        self.id.as_ref().and_then(Cell::as_text)
    }

    /// Stock on hand for this row; `currentOnHand` wins over `Stock`, which
    /// wins over `stock`.
    #[must_use]
    pub fn stock(&self) -> Decimal {
        self.current_on_hand
            .as_ref()
            .or(self.stock_column.as_ref())
            .or(self.stock_lower.as_ref())
            .map_or(Decimal::ZERO, Cell::as_number)
    }

    /// The `(variant1, variant2)` pair with blank components normalized to `None`.
    #[must_use]
    pub fn variant_pair(&self) -> (Option<String>, Option<String>) {
        (
            self.variant1.as_ref().and_then(Cell::as_text),
            self.variant2.as_ref().and_then(Cell::as_text),
        )
    }
}

/// Decodes an endpoint response body into rows.
///
/// - A JSON array yields one [`Row`] per object element; elements that are
///   not objects are skipped.
/// - An object with a string `error` field yields [`CatalogError::Upstream`].
/// - Any other JSON value yields an empty list: the endpoint answered but
///   has nothing to show.
///
/// # Errors
///
/// Returns [`CatalogError::Deserialize`] if `body` is not JSON at all, or
/// [`CatalogError::Upstream`] for an error object.
pub fn decode_rows(body: &str, context: &str) -> Result<Vec<Row>, CatalogError> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| CatalogError::Deserialize {
            context: context.to_owned(),
            source: e,
        })?;

    match value {
        serde_json::Value::Array(items) => {
            let total = items.len();
            let rows: Vec<Row> = items
                .into_iter()
                .enumerate()
                .filter_map(|(idx, item)| match serde_json::from_value::<Row>(item) {
                    Ok(row) => Some(row),
                    Err(e) => {
                        tracing::debug!(index = idx, error = %e, "skipping malformed row");
                        None
                    }
                })
                .collect();
            if rows.len() < total {
                tracing::warn!(
                    context,
                    skipped = total - rows.len(),
                    total,
                    "skipped rows that are not JSON objects"
                );
            }
            Ok(rows)
        }
        serde_json::Value::Object(map) => {
            if let Some(message) = map.get("error").and_then(serde_json::Value::as_str) {
                return Err(CatalogError::Upstream {
                    message: message.to_owned(),
                });
            }
            tracing::warn!(context, "catalog response is an object, not a row array");
            Ok(Vec::new())
        }
        _ => {
            tracing::warn!(context, "catalog response is not a row array");
            Ok(Vec::new())
        }
    }
}
