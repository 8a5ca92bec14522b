//! `stockroom catalog ...` handlers.
//!
//! Each invocation performs exactly one fetch. An empty catalog prints
//! "No products found." and succeeds; fetch failures propagate as errors.

use std::fmt::Write as _;

use anyhow::Context;
use clap::Subcommand;
use rust_decimal::Decimal;
use stockroom_catalog::{find_product, product_detail_url, Batch, CatalogClient, CatalogFeed};
use stockroom_core::{AppConfig, Product};

#[derive(Debug, Subcommand)]
pub enum CatalogCommands {
    /// List one page of products
    List {
        /// Page to show, starting at 1
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,

        /// Print the page as JSON instead of text cards
        #[arg(long)]
        json: bool,
    },
    /// Show one product and its variants
    Show {
        /// Product id as it appears in the sheet
        id: String,

        /// Print the product as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the detail-view link for a product
    Link {
        /// Product id as it appears in the sheet
        id: String,

        /// Absolute URL of the product detail page
        #[arg(long)]
        page_url: String,
    },
}

pub(crate) async fn run(config: &AppConfig, command: CatalogCommands) -> anyhow::Result<()> {
    match command {
        CatalogCommands::List { page, json } => {
            let catalog = fetch_catalog(config).await?;
            if catalog.is_empty() {
                println!("No products found.");
                return Ok(());
            }

            let mut feed = CatalogFeed::new(catalog, config.page_size);
            let page_count = feed.page_count();
            let page_index = usize::try_from(page - 1)?;
            feed.seek_page(page_index);
            let batch = feed.next_batch();

            if json {
                println!("{}", serde_json::to_string_pretty(batch.items)?);
            } else {
                print!("{}", render_page(&batch, page_index + 1, page_count));
            }
        }
        CatalogCommands::Show { id, json } => {
            let catalog = fetch_catalog(config).await?;
            let product = find_product(&catalog, &id)
                .with_context(|| format!("product '{id}' not found"))?;
            if json {
                println!("{}", serde_json::to_string_pretty(product)?);
            } else {
                print!("{}", render_card(product));
            }
        }
        CatalogCommands::Link { id, page_url } => {
            println!("{}", product_detail_url(&page_url, &id)?);
        }
    }
    Ok(())
}

/// Fetches and builds the catalog from the configured endpoint.
pub(crate) async fn fetch_catalog(config: &AppConfig) -> anyhow::Result<Vec<Product>> {
    let url = config.require_catalog_url()?;
    let client = CatalogClient::from_config(config)
        .map_err(|e| anyhow::anyhow!("failed to build catalog client: {e}"))?;
    let catalog = client
        .fetch_catalog(url)
        .await
        .context("error loading products")?;
    tracing::info!(products = catalog.len(), "catalog ready");
    Ok(catalog)
}

fn render_page(batch: &Batch<'_>, page: usize, page_count: usize) -> String {
    let mut out = String::new();
    if batch.items.is_empty() {
        let _ = writeln!(out, "Page {page} is past the end ({page_count} pages).");
        return out;
    }
    for product in batch.items {
        out.push_str(&render_card(product));
        out.push('\n');
    }
    let _ = writeln!(out, "Page {page} of {page_count}");
    out
}

fn render_card(product: &Product) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "[{}] {}  {}",
        product.id,
        product.item_name,
        render_price(product)
    );
    if !product.description.is_empty() {
        let _ = writeln!(out, "    {}", product.description);
    }
    if !product.image.is_empty() {
        let _ = writeln!(out, "    Image: {}", product.image);
    }
    if !product.variants.is_empty() {
        let variants: Vec<String> = product
            .variants
            .iter()
            .map(|v| format!("{} ({})", v.label(), render_stock(v.stock)))
            .collect();
        let _ = writeln!(out, "    Variants: {}", variants.join(", "));
    }
    let stock_note = if product.is_in_stock() {
        ""
    } else {
        " (out of stock)"
    };
    let _ = writeln!(
        out,
        "    Stock: {}{stock_note}",
        render_stock(product.total_stock)
    );
    out
}

fn render_price(product: &Product) -> String {
    if product.is_discounted() {
        format!(
            "${:.2} -> ${:.2} (SALE)",
            product.base_price, product.discount_price
        )
    } else {
        format!("${:.2}", product.base_price)
    }
}

fn render_stock(stock: Decimal) -> String {
    stock.normalize().to_string()
}
