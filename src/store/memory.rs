//! In-process store
//!
//! Keeps committed rows in memory. Used by tests, benchmarks and callers
//! that embed the client without a remote cluster.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::model::{Row, Table, TimeRange};

use super::index::TableIndex;
use super::{check_batch, Cursor, Page, Store, StoreResult};

/// Store backed by per-table in-memory indexes
///
/// ## Concurrency:
/// - `tables`: RwLock, so commits are serialized and fetches run concurrently
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<String, TableIndex>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of committed rows in a table (0 for unknown tables)
    pub fn row_count(&self, table: &str) -> usize {
        self.tables.read().get(table).map_or(0, TableIndex::len)
    }
}

impl Store for MemoryStore {
    fn commit(&self, table: &Table, rows: &[Row]) -> StoreResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        check_batch(table, rows)?;

        let mut tables = self.tables.write();
        let index = tables.entry(table.name().to_string()).or_default();
        let first_sequence = index.next_sequence();
        index.insert_batch(first_sequence, rows.iter().cloned());

        Ok(())
    }

    fn fetch_page(
        &self,
        table: &Table,
        range: TimeRange,
        cursor: Option<&Cursor>,
        limit: usize,
    ) -> StoreResult<Page> {
        let tables = self.tables.read();
        Ok(tables
            .get(table.name())
            .map_or_else(Page::empty, |index| index.page(range, cursor, limit)))
    }
}
