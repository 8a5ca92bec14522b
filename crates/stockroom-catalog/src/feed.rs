//! Offset-based batching of a built catalog for incremental rendering.
//!
//! [`next_batch`] is the pure slicing step. [`CatalogFeed`] owns a catalog
//! together with its cursor; `&mut self` on [`CatalogFeed::next_batch`]
//! serializes cursor updates.

use std::num::NonZeroUsize;

use stockroom_core::Product;

/// Default number of products per batch.
pub const DEFAULT_PAGE_SIZE: NonZeroUsize = match NonZeroUsize::new(20) {
    Some(n) => n,
    None => unreachable!(),
};

/// One slice of the catalog plus the cursor for the following call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Batch<'a> {
    pub items: &'a [Product],
    pub next_offset: usize,
    /// `true` once `next_offset` has reached the end of the catalog.
    pub exhausted: bool,
}

/// Returns `catalog[offset..offset + page_size]`, clipped to the catalog.
///
/// Past the end the batch is empty and `exhausted` stays `true`; the cursor
/// never wraps.
#[must_use]
pub fn next_batch(catalog: &[Product], offset: usize, page_size: NonZeroUsize) -> Batch<'_> {
    let len = catalog.len();
    let start = offset.min(len);
    let end = start.saturating_add(page_size.get()).min(len);
    Batch {
        items: &catalog[start..end],
        next_offset: end,
        exhausted: end >= len,
    }
}

/// A built catalog and the pagination cursor over it.
#[derive(Debug, Clone)]
pub struct CatalogFeed {
    catalog: Vec<Product>,
    offset: usize,
    page_size: NonZeroUsize,
}

impl CatalogFeed {
    #[must_use]
    pub fn new(catalog: Vec<Product>, page_size: NonZeroUsize) -> Self {
        Self {
            catalog,
            offset: 0,
            page_size,
        }
    }

    /// Returns the next batch and advances the cursor.
    pub fn next_batch(&mut self) -> Batch<'_> {
        let batch = next_batch(&self.catalog, self.offset, self.page_size);
        self.offset = batch.next_offset;
        batch
    }

    /// Jumps to the zero-based page `page`. Pages past the end leave the feed
    /// exhausted.
    pub fn seek_page(&mut self, page: usize) {
        self.offset = page
            .saturating_mul(self.page_size.get())
            .min(self.catalog.len());
    }

    /// Rewinds to the first batch.
    pub fn reset(&mut self) {
        self.offset = 0;
    }

    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Products not yet handed out.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.catalog.len().saturating_sub(self.offset)
    }

    /// Number of pages needed to show the whole catalog.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.catalog.len().div_ceil(self.page_size.get())
    }

    #[must_use]
    pub fn catalog(&self) -> &[Product] {
        &self.catalog
    }
}
