use std::borrow::Cow;
use std::fmt;

use chrono::{DateTime, Utc};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stockroom_core::variant_label;

/// Characters escaped inside a key component: the separator, the escape
/// character itself, and the absent-component placeholder.
const KEY_COMPONENT: &AsciiSet = &CONTROLS.add(b'|').add(b'%').add(b'-');

/// Stands in for a missing variant component.
const ABSENT_COMPONENT: &str = "-";

/// Composite identity of a cart line: product id plus variant pair.
///
/// Rendered as `id|variant1|variant2` with each component percent-encoded and
/// absent components written as `-`, so distinct triples never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CartKey(String);

impl CartKey {
    #[must_use]
    pub fn new(product_id: &str, variant1: Option<&str>, variant2: Option<&str>) -> Self {
        let id = utf8_percent_encode(product_id.trim(), KEY_COMPONENT);
        Self(format!(
            "{id}|{}|{}",
            encode_component(normalize_component(variant1)),
            encode_component(normalize_component(variant2)),
        ))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CartKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn encode_component(value: Option<&str>) -> Cow<'_, str> {
    match value {
        Some(v) => utf8_percent_encode(v, KEY_COMPONENT).into(),
        None => Cow::Borrowed(ABSENT_COMPONENT),
    }
}

/// Trims a variant component; blank becomes `None`.
pub(crate) fn normalize_component(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// One chosen product variant in the cart.
///
/// Display fields are copied at add time so the cart renders without the
/// catalog. Missing fields default on load, which keeps carts written as bare
/// `{productId, variant1, variant2, quantity}` entries readable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: String,
    #[serde(default)]
    pub variant1: Option<String>,
    #[serde(default)]
    pub variant2: Option<String>,
    #[serde(default)]
    pub item_name: String,
    #[serde(default)]
    pub unit_price: Decimal,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub added_at: Option<DateTime<Utc>>,
}

fn default_quantity() -> u32 {
    1
}

impl CartLine {
    #[must_use]
    pub fn key(&self) -> CartKey {
        CartKey::new(
            &self.product_id,
            self.variant1.as_deref(),
            self.variant2.as_deref(),
        )
    }

    /// `unit_price * quantity`, saturating at the `Decimal` bounds.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.unit_price.saturating_mul(Decimal::from(self.quantity))
    }

    #[must_use]
    pub fn variant_label(&self) -> String {
        variant_label(self.variant1.as_deref(), self.variant2.as_deref())
    }

    /// Trims identity fields and drops blank variant components so that the
    /// line's key matches lines added through [`crate::CartStore::add`].
    pub(crate) fn normalize(&mut self) {
        self.product_id = self.product_id.trim().to_string();
        self.variant1 = normalize_component(self.variant1.as_deref()).map(str::to_string);
        self.variant2 = normalize_component(self.variant2.as_deref()).map(str::to_string);
    }
}
