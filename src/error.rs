//! Error types for tsclient
//!
//! Provides a unified error type for all client operations. Errors raised by
//! a storage backend are carried as [`StoreError`] inside the variant that
//! describes what the client was doing when the store failed.

use thiserror::Error;

use crate::model::Row;
use crate::store::StoreError;

/// Result type alias using TsError
pub type Result<T> = std::result::Result<T, TsError>;

/// Unified error type for tsclient operations
#[derive(Debug, Error)]
pub enum TsError {
    // -------------------------------------------------------------------------
    // Local Validation Errors (never reach the store)
    // -------------------------------------------------------------------------
    #[error("Schema mismatch on table '{table}': {reason}")]
    SchemaMismatch { table: String, reason: String },

    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Invalid table definition: {0}")]
    InvalidTable(String),

    // -------------------------------------------------------------------------
    // Store Errors
    // -------------------------------------------------------------------------
    /// A flush batch was rejected. `rows` is the exact batch that failed; it
    /// is not re-buffered, the caller decides whether to retry or drop it.
    #[error("Commit of {} rows to '{table}' failed: {source}", .rows.len())]
    CommitFailure {
        table: String,
        rows: Vec<Row>,
        #[source]
        source: StoreError,
    },

    /// A page fetch failed mid-scan. `yielded` rows were already handed to
    /// the caller and remain valid.
    #[error("Scan of '{table}' failed after {yielded} rows: {source}")]
    ReadFailure {
        table: String,
        yielded: u64,
        #[source]
        source: StoreError,
    },

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl TsError {
    /// Rows of a failed commit, if this is a `CommitFailure`
    pub fn failed_rows(&self) -> Option<&[Row]> {
        match self {
            TsError::CommitFailure { rows, .. } => Some(rows),
            _ => None,
        }
    }

    /// Take ownership of the rows of a failed commit (for re-queueing)
    pub fn into_failed_rows(self) -> Option<Vec<Row>> {
        match self {
            TsError::CommitFailure { rows, .. } => Some(rows),
            _ => None,
        }
    }
}
