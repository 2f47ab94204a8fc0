//! Batching writer

use std::sync::Arc;

use crate::buffer::AppendBuffer;
use crate::config::FlushPolicy;
use crate::error::{Result, TsError};
use crate::model::{Row, Table};
use crate::store::Store;

use super::{AppendOutcome, WriterStats};

/// Buffers rows for one table and commits them according to a [`FlushPolicy`]
///
/// `append` and `flush` take `&mut self`, so a writer is only ever driven
/// from one place at a time. Independent writers over the same table may run
/// concurrently; the store serializes their commits.
pub struct Writer {
    store: Arc<dyn Store>,
    buffer: AppendBuffer,
    policy: FlushPolicy,
    stats: WriterStats,
}

impl Writer {
    /// Create a writer bound to `table`
    ///
    /// Fails with `Config` if the policy has a zero threshold.
    pub fn new(store: Arc<dyn Store>, table: Arc<Table>, policy: FlushPolicy) -> Result<Self> {
        Self::with_capacity(store, table, policy, 0)
    }

    /// Create a writer whose buffer reserves room for `capacity` rows
    pub fn with_capacity(
        store: Arc<dyn Store>,
        table: Arc<Table>,
        policy: FlushPolicy,
        capacity: usize,
    ) -> Result<Self> {
        policy.validate()?;

        // No point reserving past the point where we always flush
        let capacity = policy.threshold().map_or(capacity, |t| capacity.min(t));

        Ok(Self {
            store,
            buffer: AppendBuffer::with_capacity(table, capacity),
            policy,
            stats: WriterStats::default(),
        })
    }

    /// Append a row, flushing implicitly if the policy says so
    ///
    /// Steps:
    /// 1. Validate and buffer the row (`SchemaMismatch` leaves the buffer untouched)
    /// 2. Check the policy threshold against the new buffer length
    /// 3. If reached, flush the entire buffer
    ///
    /// An implicit flush that fails is reported here as `CommitFailure`.
    pub fn append(&mut self, row: Row) -> Result<AppendOutcome> {
        self.buffer.append(row)?;
        self.stats.rows_appended += 1;

        let pending = self.buffer.len();
        if self.policy.should_flush(pending) {
            let rows = self.flush()?;
            return Ok(AppendOutcome::Flushed { rows });
        }

        Ok(AppendOutcome::Buffered { pending })
    }

    /// Append rows one at a time
    ///
    /// The policy is evaluated after each row, so a threshold is hit exactly
    /// even for large inputs. Stops at the first error; rows appended before
    /// it keep whatever outcome they had. Returns the number of rows
    /// committed by implicit flushes along the way.
    pub fn append_all<I>(&mut self, rows: I) -> Result<usize>
    where
        I: IntoIterator<Item = Row>,
    {
        let mut committed = 0;
        for row in rows {
            if let AppendOutcome::Flushed { rows } = self.append(row)? {
                committed += rows;
            }
        }
        Ok(committed)
    }

    /// Commit every buffered row as one batch
    ///
    /// Returns the number of rows committed; `Ok(0)` on an empty buffer
    /// without contacting the store. On failure the batch is returned inside
    /// `CommitFailure` and is not re-buffered.
    pub fn flush(&mut self) -> Result<usize> {
        if self.buffer.is_empty() {
            return Ok(0);
        }

        let rows = self.buffer.drain();
        let table = self.buffer.table();

        match self.store.commit(table, &rows) {
            Ok(()) => {
                self.stats.rows_committed += rows.len() as u64;
                self.stats.batches_committed += 1;
                tracing::debug!(table = table.name(), rows = rows.len(), "committed batch");
                Ok(rows.len())
            }
            Err(source) => {
                self.stats.batches_failed += 1;
                tracing::warn!(
                    table = table.name(),
                    rows = rows.len(),
                    error = %source,
                    "commit failed, returning batch to caller"
                );
                Err(TsError::CommitFailure {
                    table: table.name().to_string(),
                    rows,
                    source,
                })
            }
        }
    }

    /// Consume the writer and hand back its unflushed rows
    pub fn into_pending(mut self) -> Vec<Row> {
        self.buffer.drain()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Rows buffered and not yet committed
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    pub fn policy(&self) -> FlushPolicy {
        self.policy
    }

    pub fn table(&self) -> &Arc<Table> {
        self.buffer.table()
    }

    pub fn stats(&self) -> WriterStats {
        self.stats
    }
}

impl Drop for Writer {
    fn drop(&mut self) {
        if !self.buffer.is_empty() {
            tracing::warn!(
                table = self.buffer.table().name(),
                rows = self.buffer.len(),
                "writer dropped with unflushed rows, discarding them"
            );
        }
    }
}
