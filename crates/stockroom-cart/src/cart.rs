//! Shopping cart persisted through a [`KeyValueStore`].
//!
//! Every mutation writes the full line array back under [`CART_STORAGE_KEY`].
//! Storage problems never reach the caller: an unreadable or corrupt cart
//! loads as empty, and a failed write leaves the in-memory cart usable.

use chrono::Utc;
use rust_decimal::Decimal;
use stockroom_core::{Product, Variant};

use crate::line::{normalize_component, CartKey, CartLine};
use crate::store::KeyValueStore;

/// Storage key holding the serialized cart.
pub const CART_STORAGE_KEY: &str = "cart";

pub struct CartStore<S> {
    store: S,
    lines: Vec<CartLine>,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Reads the persisted cart from `store`.
    ///
    /// Entries are decoded one by one; undecodable entries and zero
    /// quantities are dropped, and entries sharing a key are merged by
    /// summing their quantities.
    pub fn load(store: S) -> Self {
        let lines = match store.get(CART_STORAGE_KEY) {
            Ok(Some(bytes)) => decode_lines(&bytes),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "cart storage unreadable, starting with an empty cart");
                Vec::new()
            }
        };
        tracing::debug!(lines = lines.len(), "cart loaded");
        Self { store, lines }
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn get(&self, key: &CartKey) -> Option<&CartLine> {
        self.lines.iter().find(|line| &line.key() == key)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Adds one unit of the given product variant.
    ///
    /// A new key creates a line with quantity 1 and captures `unit_price` and
    /// `item_name`; an existing key only has its quantity incremented.
    /// Returns `None` and changes nothing when `product_id` is blank.
    pub fn add(
        &mut self,
        product_id: &str,
        variant1: Option<&str>,
        variant2: Option<&str>,
        unit_price: Decimal,
        item_name: &str,
    ) -> Option<&CartLine> {
        if product_id.trim().is_empty() {
            tracing::warn!("ignoring cart add without a product id");
            return None;
        }

        let key = CartKey::new(product_id, variant1, variant2);
        let idx = if let Some(idx) = self.lines.iter().position(|line| line.key() == key) {
            let line = &mut self.lines[idx];
            line.quantity = line.quantity.saturating_add(1);
            idx
        } else {
            self.lines.push(CartLine {
                product_id: product_id.trim().to_string(),
                variant1: normalize_component(variant1).map(str::to_string),
                variant2: normalize_component(variant2).map(str::to_string),
                item_name: item_name.to_string(),
                unit_price,
                quantity: 1,
                added_at: Some(Utc::now()),
            });
            self.lines.len() - 1
        };

        tracing::debug!(key = %key, quantity = self.lines[idx].quantity, "cart line added");
        self.persist();
        self.lines.get(idx)
    }

    /// Adds one unit of `product`, optionally for a specific variant, at the
    /// product's effective price.
    pub fn add_product(
        &mut self,
        product: &Product,
        variant: Option<&Variant>,
    ) -> Option<&CartLine> {
        self.add(
            &product.id,
            variant.and_then(|v| v.variant1.as_deref()),
            variant.and_then(|v| v.variant2.as_deref()),
            product.effective_price(),
            &product.item_name,
        )
    }

    /// Removes the line with `key`. Returns `false` (and changes nothing
    /// in memory) when no such line exists.
    pub fn remove(&mut self, key: &CartKey) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| &line.key() != key);
        let removed = self.lines.len() != before;
        if removed {
            tracing::debug!(key = %key, "cart line removed");
        }
        self.persist();
        removed
    }

    /// Empties the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.persist();
    }

    /// Sum of `unit_price * quantity` over all lines, to two decimal places.
    /// Saturates at the `Decimal` bounds instead of overflowing.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines
            .iter()
            .map(CartLine::subtotal)
            .fold(Decimal::ZERO, Decimal::saturating_add)
            .round_dp(2)
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Consumes the cart and returns the backing store.
    pub fn into_store(self) -> S {
        self.store
    }

    fn persist(&mut self) {
        let bytes = match serde_json::to_vec(&self.lines) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize cart");
                return;
            }
        };
        if let Err(e) = self.store.set(CART_STORAGE_KEY, &bytes) {
            tracing::warn!(error = %e, "failed to persist cart, keeping in-memory state");
        }
    }
}

fn decode_lines(bytes: &[u8]) -> Vec<CartLine> {
    let entries: Vec<serde_json::Value> = match serde_json::from_slice(bytes) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(error = %e, "stored cart is corrupt, starting with an empty cart");
            return Vec::new();
        }
    };

    let mut lines: Vec<CartLine> = Vec::with_capacity(entries.len());
    for entry in entries {
        let mut line = match serde_json::from_value::<CartLine>(entry) {
            Ok(line) => line,
            Err(e) => {
                tracing::debug!(error = %e, "skipping undecodable cart entry");
                continue;
            }
        };
        line.normalize();
        if line.quantity == 0 || line.product_id.is_empty() {
            continue;
        }
        let key = line.key();
        match lines.iter_mut().find(|existing| existing.key() == key) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(line.quantity),
            None => lines.push(line),
        }
    }
    lines
}

#[cfg(test)]
#[path = "cart_test.rs"]
mod tests;
