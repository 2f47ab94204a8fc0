//! Range Reader Module
//!
//! Ordered, lazy reads of committed rows within time ranges.
//!
//! ## Responsibilities
//! - Validate and normalize the requested ranges before touching the store
//! - Walk the ranges in ascending order, one store page at a time
//! - Expose the walk through pull (`Iterator`, `has_next`/`next_row`) and
//!   push (`for_each_row`) front-ends that share the same traversal
//!
//! ## Traversal
//! ```text
//! ranges (normalized): [0,10) [20,30)
//!                        │
//!     fetch_page ────────┤ page ─► rows popped one by one ─► caller
//!     (cursor) ◄─────────┘  next = Some(c) → fetch again
//!                           next = None    → move to next range
//! ```
//! At most one page is held in memory. Rows committed while a scan is in
//! progress may or may not show up, depending on whether the page covering
//! them has already been fetched.

mod scan;

use std::sync::Arc;

use crate::error::Result;
use crate::model::{normalize_ranges, Table, TimeRange};
use crate::store::Store;

pub use scan::RangeScan;

/// Default number of rows requested per page
pub const DEFAULT_PAGE_SIZE: usize = 4096;

/// Issues range scans over one table
#[derive(Clone)]
pub struct RangeReader {
    store: Arc<dyn Store>,
    table: Arc<Table>,
    page_size: usize,
}

impl RangeReader {
    pub fn new(store: Arc<dyn Store>, table: Arc<Table>) -> Self {
        Self::with_page_size(store, table, DEFAULT_PAGE_SIZE)
    }

    /// A page size of 0 is treated as 1
    pub fn with_page_size(store: Arc<dyn Store>, table: Arc<Table>, page_size: usize) -> Self {
        Self {
            store,
            table,
            page_size: page_size.max(1),
        }
    }

    /// Start a scan over `ranges`
    ///
    /// Fails with `InvalidRange` if `ranges` is empty or any range has
    /// `begin > end`; no page is fetched in that case. The returned scan is
    /// lazy and single-pass: call `scan` again to re-read.
    pub fn scan(&self, ranges: &[TimeRange]) -> Result<RangeScan> {
        let ranges = normalize_ranges(ranges)?;
        tracing::debug!(table = self.table.name(), ranges = ranges.len(), "starting range scan");

        Ok(RangeScan::new(
            Arc::clone(&self.store),
            Arc::clone(&self.table),
            ranges,
            self.page_size,
        ))
    }

    pub fn table(&self) -> &Arc<Table> {
        &self.table
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }
}
