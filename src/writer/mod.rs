//! Writer Module
//!
//! Batching writer that turns appends into store commits.
//!
//! ## Responsibilities
//! - Buffer rows for one table
//! - Apply the flush policy after every successful append
//! - Commit the whole buffer as one batch on flush
//! - Report failed batches back to the caller intact
//!
//! ## Flush Policy State Machine
//! ```text
//!            append(row) ok
//!   ┌──────────────────────────────┐
//!   │                              ▼
//! ┌─┴──────────┐  pending >= T  ┌──────────┐  commit ok   ┌────────────┐
//! │ Buffering  ├───────────────►│ Flushing ├─────────────►│ Buffering  │
//! │ pending=n  │                │          │              │ pending=0  │
//! └────────────┘                └────┬─────┘              └────────────┘
//!                                    │ commit err
//!                                    ▼
//!                        CommitFailure(rows), pending=0
//! ```
//! `Manual` has no threshold and only leaves `Buffering` through an explicit
//! `flush()`. `PerRow` is `T = 1`.
//!
//! ## Visibility
//! Rows are observable by readers only after the flush that committed them
//! returns `Ok`. Dropping a writer discards whatever is still buffered.

mod batch;

pub use batch::Writer;

/// What a successful append did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    /// Row is buffered; `pending` rows now await a flush
    Buffered { pending: usize },

    /// The append reached the flush threshold and `rows` rows were committed
    Flushed { rows: usize },
}

/// Counters for a single writer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriterStats {
    /// Rows accepted into the buffer
    pub rows_appended: u64,

    /// Rows in successfully committed batches
    pub rows_committed: u64,

    /// Successful commits
    pub batches_committed: u64,

    /// Rejected commits (their rows were returned to the caller)
    pub batches_failed: u64,
}
