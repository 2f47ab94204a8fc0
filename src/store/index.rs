//! Ordered in-memory index of committed rows
//!
//! Shared by both store implementations. Keys are (timestamp, sequence),
//! where the sequence is assigned at commit time, so a BTreeMap gives
//! ascending timestamp order with commit order as the tie-break.

use std::collections::BTreeMap;
use std::ops::Bound;

use crate::model::{Row, TimeRange, Timestamp};

use super::{Cursor, Page};

type RowKey = (Timestamp, u64);

/// Committed rows of one table
#[derive(Debug, Default)]
pub(crate) struct TableIndex {
    rows: BTreeMap<RowKey, Row>,
    next_sequence: u64,
}

impl TableIndex {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Sequence number the next committed row will receive
    pub(crate) fn next_sequence(&self) -> u64 {
        self.next_sequence
    }

    /// Insert a committed batch; rows get consecutive sequences from `first_sequence`
    pub(crate) fn insert_batch(&mut self, first_sequence: u64, rows: impl IntoIterator<Item = Row>) {
        let mut sequence = first_sequence;
        for row in rows {
            self.rows.insert((row.timestamp, sequence), row);
            sequence += 1;
        }
        self.next_sequence = self.next_sequence.max(sequence);
    }

    pub(crate) fn len(&self) -> usize {
        self.rows.len()
    }

    /// Up to `limit` rows of `range` strictly after `cursor`
    pub(crate) fn page(&self, range: TimeRange, cursor: Option<&Cursor>, limit: usize) -> Page {
        if range.is_empty() {
            return Page::empty();
        }

        let range_start: RowKey = (range.begin, 0);
        let start = match cursor {
            Some(c) if c.timestamp() >= range.end => return Page::empty(),
            Some(c) if (c.timestamp(), c.sequence()) >= range_start => {
                Bound::Excluded((c.timestamp(), c.sequence()))
            }
            _ => Bound::Included(range_start),
        };
        let end = Bound::Excluded((range.end, 0));

        let limit = limit.max(1);
        let mut rows = Vec::with_capacity(limit.min(self.rows.len()));
        let mut last = None;
        let mut more = false;

        for (key, row) in self.rows.range((start, end)) {
            if rows.len() == limit {
                more = true;
                break;
            }
            rows.push(row.clone());
            last = Some(*key);
        }

        let next = match (more, last) {
            (true, Some((timestamp, sequence))) => Some(Cursor::new(timestamp, sequence)),
            _ => None,
        };

        Page { rows, next }
    }
}
