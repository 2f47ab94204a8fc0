//! Range scan
//!
//! Single-pass traversal of committed rows over a set of normalized ranges.

use std::collections::VecDeque;
use std::sync::Arc;

use crate::error::{Result, TsError};
use crate::model::{Row, Table, TimeRange};
use crate::store::{Cursor, Store};

/// Lazy sequence of committed rows in ascending timestamp order
///
/// Created by [`RangeReader::scan`](super::RangeReader::scan). Rows are
/// pulled with [`next_row`](Self::next_row) / the `Iterator` impl, or pushed
/// with [`for_each_row`](Self::for_each_row); all of them drive the same
/// page-fetch loop.
///
/// After a failed page fetch the scan is finished: it yields no further rows
/// and reports the failure exactly once.
pub struct RangeScan {
    store: Arc<dyn Store>,
    table: Arc<Table>,
    /// Ranges not yet exhausted, ascending and disjoint
    ranges: VecDeque<TimeRange>,
    /// Resume point within the front range
    cursor: Option<Cursor>,
    /// Rows of the current page not yet handed out
    page: VecDeque<Row>,
    page_size: usize,
    yielded: u64,
    finished: bool,
}

impl RangeScan {
    pub(super) fn new(
        store: Arc<dyn Store>,
        table: Arc<Table>,
        ranges: Vec<TimeRange>,
        page_size: usize,
    ) -> Self {
        Self {
            store,
            table,
            ranges: ranges.into(),
            cursor: None,
            page: VecDeque::new(),
            page_size,
            yielded: 0,
            finished: false,
        }
    }

    /// Next row, fetching pages as needed; `Ok(None)` once the scan is done
    pub fn next_row(&mut self) -> Result<Option<Row>> {
        if !self.fill()? {
            return Ok(None);
        }
        let row = self.page.pop_front();
        if row.is_some() {
            self.yielded += 1;
        }
        Ok(row)
    }

    /// Whether another row is available, fetching a page if needed
    ///
    /// Does not consume the row.
    pub fn has_next(&mut self) -> Result<bool> {
        self.fill()
    }

    /// Push every remaining row into `visitor`; returns how many were visited
    pub fn for_each_row<F>(mut self, mut visitor: F) -> Result<u64>
    where
        F: FnMut(Row),
    {
        let mut visited = 0;
        while let Some(row) = self.next_row()? {
            visitor(row);
            visited += 1;
        }
        Ok(visited)
    }

    /// Rows handed to the caller so far
    pub fn yielded(&self) -> u64 {
        self.yielded
    }

    pub fn is_finished(&self) -> bool {
        self.finished && self.page.is_empty()
    }

    /// Ensure the page buffer holds a row; `Ok(false)` when the scan is exhausted
    fn fill(&mut self) -> Result<bool> {
        while self.page.is_empty() {
            if self.finished {
                return Ok(false);
            }
            self.fetch_next_page()?;
        }
        Ok(true)
    }

    fn fetch_next_page(&mut self) -> Result<()> {
        let Some(range) = self.ranges.front().copied() else {
            self.finished = true;
            return Ok(());
        };

        match self
            .store
            .fetch_page(&self.table, range, self.cursor.as_ref(), self.page_size)
        {
            Ok(page) => {
                tracing::trace!(
                    table = self.table.name(),
                    %range,
                    rows = page.rows.len(),
                    last = page.is_last(),
                    "fetched page"
                );
                self.cursor = page.next;
                if self.cursor.is_none() {
                    self.ranges.pop_front();
                }
                self.page.extend(page.rows);
                Ok(())
            }
            Err(source) => {
                self.finished = true;
                self.ranges.clear();
                self.cursor = None;
                tracing::warn!(
                    table = self.table.name(),
                    yielded = self.yielded,
                    error = %source,
                    "page fetch failed, terminating scan"
                );
                Err(TsError::ReadFailure {
                    table: self.table.name().to_string(),
                    yielded: self.yielded,
                    source,
                })
            }
        }
    }
}

impl Iterator for RangeScan {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_row().transpose()
    }
}
