//! AppendBuffer implementation

use std::mem;
use std::sync::Arc;

use crate::error::Result;
use crate::model::{Row, Table};

/// Pending rows for exactly one table
#[derive(Debug)]
pub struct AppendBuffer {
    table: Arc<Table>,
    rows: Vec<Row>,
    capacity: usize,
}

impl AppendBuffer {
    /// Create an empty buffer bound to `table`
    pub fn new(table: Arc<Table>) -> Self {
        Self::with_capacity(table, 0)
    }

    /// Create an empty buffer that reserves room for `capacity` rows
    pub fn with_capacity(table: Arc<Table>, capacity: usize) -> Self {
        Self {
            table,
            rows: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a row after checking it against the table schema
    ///
    /// A rejected row is never buffered.
    pub fn append(&mut self, row: Row) -> Result<()> {
        self.table.check_row(&row)?;
        self.rows.push(row);
        Ok(())
    }

    /// Remove and return every buffered row in append order
    pub fn drain(&mut self) -> Vec<Row> {
        mem::replace(&mut self.rows, Vec::with_capacity(self.capacity))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn table(&self) -> &Arc<Table> {
        &self.table
    }

    /// Buffered rows, oldest first
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }
}
