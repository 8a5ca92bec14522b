use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Display name used when a row carries no usable item name.
pub const UNNAMED_ITEM: &str = "Unnamed Item";

/// A product grouped from every upstream row sharing the same identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Trimmed identifier; unique within a built catalog.
    pub id: String,
    pub item_name: String,
    pub description: String,
    /// Absolute `http(s)` image URL, or empty when the cell held anything else.
    pub image: String,
    /// Regular unit price, never negative.
    pub base_price: Decimal,
    /// Sale price, never negative. Only meaningful when [`Product::is_discounted`].
    pub discount_price: Decimal,
    /// Sum of stock across all contributing rows.
    pub total_stock: Decimal,
    /// Distinct `(variant1, variant2)` pairs in first-seen order.
    pub variants: Vec<Variant>,
}

impl Product {
    /// A discount applies only when it is positive and strictly below the
    /// base price.
    #[must_use]
    pub fn is_discounted(&self) -> bool {
        self.discount_price > Decimal::ZERO && self.discount_price < self.base_price
    }

    /// Price a shopper pays: the discount when active, otherwise the base price.
    #[must_use]
    pub fn effective_price(&self) -> Decimal {
        if self.is_discounted() {
            self.discount_price
        } else {
            self.base_price
        }
    }

    #[must_use]
    pub fn is_in_stock(&self) -> bool {
        self.total_stock > Decimal::ZERO
    }

    /// Stock carried by rows without a variant pair: `total_stock` minus the
    /// stock of every listed variant, never negative.
    #[must_use]
    pub fn unlisted_stock(&self) -> Decimal {
        self.variants
            .iter()
            .fold(self.total_stock, |rest, v| rest.saturating_sub(v.stock))
            .max(Decimal::ZERO)
    }

    /// Returns the variant matching the given pair, if this product has it.
    #[must_use]
    pub fn find_variant(&self, variant1: Option<&str>, variant2: Option<&str>) -> Option<&Variant> {
        self.variants.iter().find(|v| v.matches(variant1, variant2))
    }

    /// Distinct first components, sorted alphabetically for selectors.
    #[must_use]
    pub fn variant1_options(&self) -> Vec<&str> {
        sorted_distinct(self.variants.iter().filter_map(|v| v.variant1.as_deref()))
    }

    /// Distinct second components, sorted alphabetically for selectors.
    #[must_use]
    pub fn variant2_options(&self) -> Vec<&str> {
        sorted_distinct(self.variants.iter().filter_map(|v| v.variant2.as_deref()))
    }
}

fn sorted_distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    values.collect::<BTreeSet<_>>().into_iter().collect()
}

/// One attribute combination of a [`Product`], e.g. colour and size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    pub variant1: Option<String>,
    pub variant2: Option<String>,
    /// Stock summed over the rows carrying exactly this pair.
    pub stock: Decimal,
}

impl Variant {
    /// Pair equality; stock is not compared.
    #[must_use]
    pub fn matches(&self, variant1: Option<&str>, variant2: Option<&str>) -> bool {
        self.variant1.as_deref() == variant1 && self.variant2.as_deref() == variant2
    }

    #[must_use]
    pub fn label(&self) -> String {
        variant_label(self.variant1.as_deref(), self.variant2.as_deref())
    }
}

/// Human-readable label for a variant pair such as `"Red / Large"`, or
/// `"Default"` when neither component is set.
#[must_use]
pub fn variant_label(variant1: Option<&str>, variant2: Option<&str>) -> String {
    let parts: Vec<&str> = [variant1, variant2].into_iter().flatten().collect();
    if parts.is_empty() {
        "Default".to_string()
    } else {
        parts.join(" / ")
    }
}
