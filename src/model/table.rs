//! Table schema
//!
//! Column definitions and row validation against them.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TsError};

use super::{Row, Timestamp};

/// Kind of value a column holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnKind {
    Double,
    Int64,
    Timestamp,
    Blob,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnKind::Double => "double",
            ColumnKind::Int64 => "int64",
            ColumnKind::Timestamp => "timestamp",
            ColumnKind::Blob => "blob",
        };
        f.write_str(name)
    }
}

/// A named, typed column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
}

impl Column {
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn double(name: impl Into<String>) -> Self {
        Self::new(name, ColumnKind::Double)
    }

    pub fn int64(name: impl Into<String>) -> Self {
        Self::new(name, ColumnKind::Int64)
    }

    pub fn timestamp(name: impl Into<String>) -> Self {
        Self::new(name, ColumnKind::Timestamp)
    }

    pub fn blob(name: impl Into<String>) -> Self {
        Self::new(name, ColumnKind::Blob)
    }
}

/// Table schema: a name plus an ordered column list
///
/// Schemas are immutable once built. Writers and readers share them through
/// `Arc<Table>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    name: String,
    columns: Vec<Column>,
}

impl Table {
    /// Define a table
    ///
    /// Fails with `InvalidTable` if the name is empty, there are no columns,
    /// or two columns share a name.
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(TsError::InvalidTable("table name is empty".to_string()));
        }
        if columns.is_empty() {
            return Err(TsError::InvalidTable(format!(
                "table '{}' has no columns",
                name
            )));
        }

        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(TsError::InvalidTable(format!(
                    "duplicate column '{}' in table '{}'",
                    column.name, name
                )));
            }
        }

        Ok(Self { name, columns })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Position of a column by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Verify a row has one value per column with matching kinds
    ///
    /// `Timestamp::MAX` is refused: ranges are half-open, so no scan could
    /// ever return such a row.
    pub fn check_row(&self, row: &Row) -> Result<()> {
        if row.timestamp == Timestamp::MAX {
            return Err(self.mismatch(format!(
                "timestamp {} is past the end of every range",
                row.timestamp
            )));
        }

        if row.values.len() != self.columns.len() {
            return Err(self.mismatch(format!(
                "expected {} values, got {}",
                self.columns.len(),
                row.values.len()
            )));
        }

        for (column, value) in self.columns.iter().zip(&row.values) {
            if value.kind() != column.kind {
                return Err(self.mismatch(format!(
                    "column '{}' expects {}, got {}",
                    column.name,
                    column.kind,
                    value.kind()
                )));
            }
        }

        Ok(())
    }

    fn mismatch(&self, reason: String) -> TsError {
        TsError::SchemaMismatch {
            table: self.name.clone(),
            reason,
        }
    }
}
