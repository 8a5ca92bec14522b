use std::collections::HashMap;

use super::*;
use crate::error::StoreError;
use crate::store::{FileStore, MemoryStore};

/// Store whose reads and/or writes always fail.
#[derive(Default)]
struct BrokenStore {
    fail_reads: bool,
    fail_writes: bool,
    inner: HashMap<String, Vec<u8>>,
}

impl KeyValueStore for BrokenStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        if self.fail_reads {
            return Err(StoreError::Unavailable("reads disabled".to_owned()));
        }
        Ok(self.inner.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::Unavailable("writes disabled".to_owned()));
        }
        self.inner.insert(key.to_owned(), value.to_vec());
        Ok(())
    }
}

fn store_with(json: &str) -> MemoryStore {
    let mut store = MemoryStore::new();
    store.set(CART_STORAGE_KEY, json.as_bytes()).unwrap();
    store
}

fn price(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

// -----------------------------------------------------------------------
// add / total
// -----------------------------------------------------------------------

#[test]
fn adding_same_variant_twice_increments_quantity() {
    let mut cart = CartStore::load(MemoryStore::new());
    cart.add("1", Some("Red"), None, price(999), "Mug");
    let line = cart
        .add("1", Some("Red"), None, price(999), "Mug")
        .expect("expected a cart line");
    assert_eq!(line.quantity, 2);

    assert_eq!(cart.lines().len(), 1);
    assert_eq!(cart.total(), price(1998));
    assert_eq!(format!("{:.2}", cart.total()), "19.98");
}

#[test]
fn different_variants_get_separate_lines() {
    let mut cart = CartStore::load(MemoryStore::new());
    cart.add("1", Some("Red"), None, price(999), "Mug");
    cart.add("1", Some("Blue"), None, price(999), "Mug");
    cart.add("1", Some("Red"), Some("Large"), price(1299), "Mug");
    assert_eq!(cart.lines().len(), 3);
    assert_eq!(cart.item_count(), 3);
    assert_eq!(cart.total(), price(3297));
}

#[test]
fn blank_variant_components_share_a_line_with_absent_ones() {
    let mut cart = CartStore::load(MemoryStore::new());
    cart.add("1", Some(""), Some("  "), price(100), "Cup");
    cart.add(" 1 ", None, None, price(100), "Cup");
    assert_eq!(cart.lines().len(), 1);
    assert_eq!(cart.lines()[0].quantity, 2);
    assert_eq!(cart.lines()[0].product_id, "1");
    assert!(cart.lines()[0].variant1.is_none());
}

#[test]
fn repeat_add_keeps_price_captured_on_first_add() {
    let mut cart = CartStore::load(MemoryStore::new());
    cart.add("1", None, None, price(999), "Mug");
    cart.add("1", None, None, price(1999), "Mug (renamed)");
    let line = &cart.lines()[0];
    assert_eq!(line.unit_price, price(999));
    assert_eq!(line.item_name, "Mug");
    assert!(line.added_at.is_some());
}

#[test]
fn empty_cart_total_is_zero() {
    let cart = CartStore::load(MemoryStore::new());
    assert!(cart.is_empty());
    assert_eq!(cart.total(), Decimal::ZERO);
    assert_eq!(format!("{:.2}", cart.total()), "0.00");
}

#[test]
fn add_product_uses_effective_price_and_variant() {
    let product = Product {
        id: "1".to_string(),
        item_name: "Mug".to_string(),
        description: String::new(),
        image: String::new(),
        base_price: price(1299),
        discount_price: price(999),
        total_stock: Decimal::from(8),
        variants: vec![Variant {
            variant1: Some("Red".to_string()),
            variant2: None,
            stock: Decimal::from(5),
        }],
    };
    let mut cart = CartStore::load(MemoryStore::new());
    let line = cart
        .add_product(&product, product.variants.first())
        .expect("expected a cart line");
    assert_eq!(line.unit_price, price(999));
    assert_eq!(line.key(), CartKey::new("1", Some("Red"), None));

    let plain = cart
        .add_product(&product, None)
        .expect("expected a cart line");
    assert_eq!(plain.key(), CartKey::new("1", None, None));
    assert_eq!(plain.item_name, "Mug");
}

#[test]
fn blank_product_id_is_rejected_and_not_persisted() {
    let mut cart = CartStore::load(MemoryStore::new());
    assert!(cart.add("  ", None, None, price(100), "X").is_none());
    assert!(cart.add("", Some("Red"), None, price(100), "X").is_none());
    assert!(cart.is_empty());

    cart.add("1", None, None, price(100), "Cup");
    let reloaded = CartStore::load(cart.into_store());
    assert_eq!(reloaded.lines().len(), 1);
    assert_eq!(reloaded.lines()[0].product_id, "1");
}

#[test]
fn total_saturates_on_huge_prices() {
    let mut cart = CartStore::load(MemoryStore::new());
    cart.add("1", None, None, Decimal::MAX, "Big");
    cart.add("1", None, None, Decimal::MAX, "Big");
    cart.add("2", None, None, Decimal::MAX, "Bigger");
    assert_eq!(cart.total(), Decimal::MAX);
}

#[test]
fn huge_price_from_storage_does_not_break_total() {
    let cart = CartStore::load(store_with(
        r#"[{"productId":"1","unitPrice":"79228162514264337593543950335","quantity":3}]"#,
    ));
    assert_eq!(cart.lines().len(), 1);
    assert_eq!(cart.total(), Decimal::MAX);
}

// -----------------------------------------------------------------------
// remove / clear
// -----------------------------------------------------------------------

#[test]
fn remove_deletes_matching_line() {
    let mut cart = CartStore::load(MemoryStore::new());
    cart.add("1", Some("Red"), None, price(999), "Mug");
    cart.add("2", None, None, price(400), "Cup");

    assert!(cart.remove(&CartKey::new("1", Some("Red"), None)));
    assert_eq!(cart.lines().len(), 1);
    assert_eq!(cart.lines()[0].product_id, "2");
    assert_eq!(cart.total(), price(400));
}

#[test]
fn remove_absent_key_is_a_no_op() {
    let mut cart = CartStore::load(MemoryStore::new());
    cart.add("1", Some("Red"), None, price(999), "Mug");
    assert!(!cart.remove(&CartKey::new("1", Some("Blue"), None)));
    assert_eq!(cart.lines().len(), 1);
}

#[test]
fn clear_empties_and_persists() {
    let mut cart = CartStore::load(MemoryStore::new());
    cart.add("1", None, None, price(999), "Mug");
    cart.clear();
    assert!(cart.is_empty());

    let reloaded = CartStore::load(cart.into_store());
    assert!(reloaded.is_empty());
}

// -----------------------------------------------------------------------
// persistence
// -----------------------------------------------------------------------

#[test]
fn add_then_load_round_trips_lines() {
    let mut cart = CartStore::load(MemoryStore::new());
    cart.add("1", Some("Red"), None, price(999), "Mug");
    cart.add("1", Some("Red"), None, price(999), "Mug");
    cart.add("2", None, Some("Large"), price(400), "Cup");
    let expected = cart.lines().to_vec();

    let reloaded = CartStore::load(cart.into_store());
    assert_eq!(reloaded.lines(), expected.as_slice());
    assert_eq!(reloaded.total(), price(2398));
}

#[test]
fn persisted_format_is_a_json_array_of_lines() {
    let mut cart = CartStore::load(MemoryStore::new());
    cart.add("1", Some("Red"), None, price(999), "Mug");
    let store = cart.into_store();

    let bytes = store.get(CART_STORAGE_KEY).unwrap().expect("cart should be persisted");
    let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    let entries = value.as_array().expect("expected a JSON array");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["productId"], "1");
    assert_eq!(entries[0]["variant1"], "Red");
    assert!(entries[0]["variant2"].is_null());
    assert_eq!(entries[0]["quantity"], 1);
    assert_eq!(entries[0]["unitPrice"], "9.99");
}

#[test]
fn missing_storage_loads_empty() {
    let cart = CartStore::load(MemoryStore::new());
    assert!(cart.is_empty());
}

#[test]
fn corrupt_storage_loads_empty() {
    for corrupt in ["not json", "{\"lines\":[]}", "", "[1, 2"] {
        let cart = CartStore::load(store_with(corrupt));
        assert!(cart.is_empty(), "expected empty cart for {corrupt:?}");
    }
}

#[test]
fn undecodable_entries_are_skipped() {
    let cart = CartStore::load(store_with(
        r#"[{"productId":"1","quantity":2}, "junk", {"quantity":3}, {"productId":"2","quantity":0}]"#,
    ));
    assert_eq!(cart.lines().len(), 1);
    assert_eq!(cart.lines()[0].quantity, 2);
}

#[test]
fn legacy_duplicate_entries_merge_on_load() {
    let cart = CartStore::load(store_with(
        r#"[
            {"productId":"1","variant1":"Red","variant2":null,"quantity":1},
            {"productId":"1","variant1":"Red","variant2":null,"quantity":1},
            {"productId":"1","variant1":null,"variant2":null,"quantity":1}
        ]"#,
    ));
    assert_eq!(cart.lines().len(), 2);
    let red = cart
        .get(&CartKey::new("1", Some("Red"), None))
        .expect("expected merged Red line");
    assert_eq!(red.quantity, 2);
    assert_eq!(cart.item_count(), 3);
}

#[test]
fn unreadable_storage_loads_empty() {
    let store = BrokenStore {
        fail_reads: true,
        ..BrokenStore::default()
    };
    let cart = CartStore::load(store);
    assert!(cart.is_empty());
}

#[test]
fn write_failure_keeps_in_memory_cart() {
    let store = BrokenStore {
        fail_writes: true,
        ..BrokenStore::default()
    };
    let mut cart = CartStore::load(store);
    cart.add("1", None, None, price(999), "Mug");
    cart.add("1", None, None, price(999), "Mug");
    assert_eq!(cart.lines()[0].quantity, 2);
    assert_eq!(cart.total(), price(1998));
    assert!(cart.into_store().inner.is_empty());
}

#[test]
fn file_store_cart_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();

    let mut cart = CartStore::load(FileStore::new(dir.path()));
    cart.add("1", Some("Red"), None, price(999), "Mug");
    cart.add("1", Some("Red"), None, price(999), "Mug");
    drop(cart);

    let reopened = CartStore::load(FileStore::new(dir.path()));
    assert_eq!(reopened.lines().len(), 1);
    assert_eq!(reopened.lines()[0].quantity, 2);
    assert_eq!(reopened.total(), price(1998));
}
