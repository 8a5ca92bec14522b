pub mod catalog;
pub mod client;
pub mod error;
pub mod feed;
pub mod link;
mod rate_limit;
pub mod types;

pub use catalog::{build_catalog, find_product};
pub use client::CatalogClient;
pub use error::CatalogError;
pub use feed::{next_batch, Batch, CatalogFeed, DEFAULT_PAGE_SIZE};
pub use link::product_detail_url;
pub use types::{decode_rows, Cell, Row};
