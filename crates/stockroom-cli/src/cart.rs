//! `stockroom cart ...` handlers.
//!
//! The cart lives in `<STOCKROOM_CART_DIR>/cart.json`. Only `add` needs the
//! catalog; the other subcommands work offline from the stored lines.

use std::fmt::Write as _;

use anyhow::Context;
use clap::Subcommand;
use rust_decimal::Decimal;
use stockroom_cart::{CartKey, CartLine, CartStore, FileStore};
use stockroom_catalog::find_product;
use stockroom_core::{variant_label, AppConfig, Product, Variant};

use crate::catalog::fetch_catalog;

#[derive(Debug, Subcommand)]
pub enum CartCommands {
    /// Show cart lines and the total
    Show {
        /// Print the lines as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add one unit of a product variant
    Add {
        /// Product id as it appears in the sheet
        id: String,

        /// First variant component (e.g. colour)
        #[arg(long)]
        variant1: Option<String>,

        /// Second variant component (e.g. size)
        #[arg(long)]
        variant2: Option<String>,
    },
    /// Remove a product variant from the cart
    Remove {
        /// Product id as it appears in the sheet
        id: String,

        #[arg(long)]
        variant1: Option<String>,

        #[arg(long)]
        variant2: Option<String>,
    },
    /// Remove every line from the cart
    Clear,
}

pub(crate) async fn run(config: &AppConfig, command: CartCommands) -> anyhow::Result<()> {
    let mut cart = CartStore::load(FileStore::new(&config.cart_dir));

    match command {
        CartCommands::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(cart.lines())?);
            } else {
                print!("{}", render_cart(cart.lines(), cart.total()));
            }
        }
        CartCommands::Add {
            id,
            variant1,
            variant2,
        } => {
            let catalog = fetch_catalog(config).await?;
            let product = find_product(&catalog, &id)
                .with_context(|| format!("product '{id}' not found"))?;
            let variant = select_variant(product, variant1.as_deref(), variant2.as_deref())?;
            if !product.is_in_stock() {
                tracing::warn!(product_id = %product.id, "adding a product with no stock on hand");
            }

            let line = cart
                .add_product(product, variant)
                .with_context(|| format!("product '{id}' has no usable id"))?;
            println!(
                "Added {} ({}), quantity {}.",
                line.item_name,
                line.variant_label(),
                line.quantity
            );
            println!("Cart total: ${:.2}", cart.total());
        }
        CartCommands::Remove {
            id,
            variant1,
            variant2,
        } => {
            let key = CartKey::new(&id, variant1.as_deref(), variant2.as_deref());
            if cart.remove(&key) {
                println!("Removed {key}.");
            } else {
                println!("Nothing in the cart matches {key}.");
            }
            println!("Cart total: ${:.2}", cart.total());
        }
        CartCommands::Clear => {
            cart.clear();
            println!("Cart cleared.");
        }
    }
    Ok(())
}

/// Resolves the requested variant against the product's known variants.
///
/// A product without variants takes no selection. A product with variants
/// requires one that exists, except that an empty selection picks the
/// variant-less rows when they carry stock of their own.
fn select_variant<'a>(
    product: &'a Product,
    variant1: Option<&str>,
    variant2: Option<&str>,
) -> anyhow::Result<Option<&'a Variant>> {
    let variant1 = non_blank(variant1);
    let variant2 = non_blank(variant2);

    if product.variants.is_empty() {
        if variant1.is_some() || variant2.is_some() {
            anyhow::bail!("product '{}' has no variants", product.id);
        }
        return Ok(None);
    }

    if let Some(variant) = product.find_variant(variant1, variant2) {
        return Ok(Some(variant));
    }

    let has_default = product.unlisted_stock() > Decimal::ZERO;
    if has_default && variant1.is_none() && variant2.is_none() {
        return Ok(None);
    }

    let mut options: Vec<String> = product.variants.iter().map(Variant::label).collect();
    if has_default {
        options.push(variant_label(None, None));
    }
    anyhow::bail!(
        "choose a variant of '{}' with --variant1/--variant2; available: {}",
        product.id,
        options.join(", ")
    )
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn render_cart(lines: &[CartLine], total: Decimal) -> String {
    if lines.is_empty() {
        return "Your cart is empty.\n".to_string();
    }
    let mut out = String::new();
    for line in lines {
        let _ = writeln!(
            out,
            "{} x{}  {} ({})  ${:.2}",
            line.key(),
            line.quantity,
            line.item_name,
            line.variant_label(),
            line.subtotal()
        );
    }
    let _ = writeln!(out, "Total: ${total:.2}");
    out
}
