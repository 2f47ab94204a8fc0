//! Store Module
//!
//! The commit/fetch contract the client relies on, plus two local
//! implementations of it.
//!
//! ## Responsibilities
//! - `commit`: append a batch of rows to a table atomically
//! - `fetch_page`: return one bounded page of committed rows in a time range
//! - Order rows by (timestamp, commit sequence) so equal timestamps keep
//!   their commit order
//!
//! ## Pagination
//! ```text
//!   fetch_page(range, None)        fetch_page(range, Some(c1))    ...
//!  ┌───────────────────────┐      ┌───────────────────────┐
//!  │ rows[0..limit]        │      │ rows[limit..2*limit]  │
//!  │ next = Some(c1) ──────┼────► │ next = None (done)    │
//!  └───────────────────────┘      └───────────────────────┘
//! ```
//! A cursor positions strictly after the last row of its page. Each call
//! observes committed state at the time of the call.

mod frame;
mod index;
mod log;
mod memory;

use thiserror::Error;

use crate::model::{Row, Table, TimeRange, Timestamp};

pub use log::LogStore;
pub use memory::MemoryStore;

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors reported by a store backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("request rejected: {0}")]
    Rejected(String),

    #[error("log corruption detected: {0}")]
    Corruption(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Backend that commits batches and serves paged range reads
///
/// Implementations must be safe to share between threads; concurrent
/// commits to the same table are serialized by the implementation.
pub trait Store: Send + Sync {
    /// Append `rows` to `table` as one batch
    ///
    /// On success every row is visible to subsequent `fetch_page` calls. On
    /// failure none of them are.
    fn commit(&self, table: &Table, rows: &[Row]) -> StoreResult<()>;

    /// Fetch up to `limit` committed rows of `table` within `range`
    ///
    /// `cursor` is `None` for the first page of a range and the previous
    /// page's `next` afterwards.
    fn fetch_page(
        &self,
        table: &Table,
        range: TimeRange,
        cursor: Option<&Cursor>,
        limit: usize,
    ) -> StoreResult<Page>;
}

/// Position in a table's committed rows
///
/// Rows are keyed by (timestamp, commit sequence); a cursor names the last
/// key returned so the next page starts strictly after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cursor {
    timestamp: Timestamp,
    sequence: u64,
}

impl Cursor {
    pub fn new(timestamp: Timestamp, sequence: u64) -> Self {
        Self {
            timestamp,
            sequence,
        }
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

/// One page of a range read
#[derive(Debug, Clone, Default)]
pub struct Page {
    /// Rows ordered by (timestamp, commit sequence)
    pub rows: Vec<Row>,

    /// Where to resume, `None` once the range is exhausted
    pub next: Option<Cursor>,
}

impl Page {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_last(&self) -> bool {
        self.next.is_none()
    }
}

/// Reject rows the table cannot hold before they touch storage
fn check_batch(table: &Table, rows: &[Row]) -> StoreResult<()> {
    for row in rows {
        table
            .check_row(row)
            .map_err(|e| StoreError::Rejected(e.to_string()))?;
    }
    Ok(())
}
