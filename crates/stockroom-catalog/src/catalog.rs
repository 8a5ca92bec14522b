//! Grouping of flat endpoint rows into [`Product`]s with nested variants.
//!
//! Rows are processed in input order and products keep first-seen order.
//! Malformed cells degrade to defaults (empty string, zero) and stock sums
//! saturate at the `Decimal` bounds; nothing in this module fails, so one
//! dirty row never hides the rest of the catalog.

use std::collections::HashMap;

use rust_decimal::Decimal;
use stockroom_core::{Product, Variant, UNNAMED_ITEM};

use crate::types::{Cell, Row};

/// Builds the catalog from rows, one [`Product`] per distinct id.
///
/// Rows without a usable id are skipped. Every remaining row adds its stock
/// to its product's `total_stock` and, when it carries at least one variant
/// component, to the matching entry of `variants` (created on first sight).
#[must_use]
pub fn build_catalog(rows: impl IntoIterator<Item = Row>) -> Vec<Product> {
    let mut products: Vec<Product> = Vec::new();
    let mut index_by_id: HashMap<String, usize> = HashMap::new();
    let mut skipped = 0usize;

    for row in rows {
        let Some(id) = row.product_id() else {
            skipped += 1;
            continue;
        };

        let idx = *index_by_id.entry(id).or_insert_with_key(|id| {
            products.push(seed_product(id.clone(), &row));
            products.len() - 1
        });
        let product = &mut products[idx];

        let stock = row.stock();
        product.total_stock = product.total_stock.saturating_add(stock);

        let (variant1, variant2) = row.variant_pair();
        if variant1.is_none() && variant2.is_none() {
            continue;
        }
        match product
            .variants
            .iter_mut()
            .find(|v| v.matches(variant1.as_deref(), variant2.as_deref()))
        {
            Some(existing) => existing.stock = existing.stock.saturating_add(stock),
            None => product.variants.push(Variant {
                variant1,
                variant2,
                stock,
            }),
        }
    }

    if skipped > 0 {
        tracing::debug!(skipped, "dropped rows without a product id");
    }
    tracing::debug!(products = products.len(), "catalog built");

    products
}

/// Looks up a product by id, trimming the requested id the same way row ids
/// are trimmed.
#[must_use]
pub fn find_product<'a>(catalog: &'a [Product], id: &str) -> Option<&'a Product> {
    let id = id.trim();
    catalog.iter().find(|p| p.id == id)
}

/// Creates the product entry from the first row seen for `id`.
fn seed_product(id: String, row: &Row) -> Product {
    Product {
        id,
        item_name: text_or(row.item_name.as_ref(), UNNAMED_ITEM),
        description: text_or(row.description.as_ref(), ""),
        image: normalize_image(row.image.as_ref()),
        base_price: non_negative(row.unit_sale.as_ref()),
        discount_price: non_negative(row.discount_price.as_ref()),
        total_stock: Decimal::ZERO,
        variants: Vec::new(),
    }
}

fn text_or(cell: Option<&Cell>, default: &str) -> String {
    cell.and_then(Cell::as_text)
        .unwrap_or_else(|| default.to_string())
}

fn non_negative(cell: Option<&Cell>) -> Decimal {
    cell.map_or(Decimal::ZERO, Cell::as_number)
        .max(Decimal::ZERO)
}

/// Keeps the image only when it is an absolute `http`/`https` URL.
fn normalize_image(cell: Option<&Cell>) -> String {
    let Some(raw) = cell.and_then(Cell::as_text) else {
        return String::new();
    };
    match reqwest::Url::parse(&raw) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => raw,
        _ => String::new(),
    }
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
