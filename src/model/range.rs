//! Time ranges
//!
//! Public APIs accept a slice of caller-supplied [`TimeRange`]s in any
//! order. Scans work on the normalized form produced by [`normalize_ranges`]:
//! sorted, non-empty and non-overlapping, so concatenating per-range results
//! yields one ascending sequence.

use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TsError};

use super::Timestamp;

/// Half-open interval `[begin, end)` over timestamps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    pub begin: Timestamp,
    pub end: Timestamp,
}

impl TimeRange {
    pub fn new(begin: Timestamp, end: Timestamp) -> Self {
        Self { begin, end }
    }

    /// Every representable timestamp except `Timestamp::MAX`
    pub fn all() -> Self {
        Self::new(Timestamp::MIN, Timestamp::MAX)
    }

    pub fn contains(&self, ts: Timestamp) -> bool {
        self.begin <= ts && ts < self.end
    }

    pub fn is_empty(&self) -> bool {
        self.begin >= self.end
    }

    pub fn validate(&self) -> Result<()> {
        if self.begin > self.end {
            return Err(TsError::InvalidRange(format!(
                "begin {} is after end {}",
                self.begin, self.end
            )));
        }
        Ok(())
    }
}

impl From<Range<Timestamp>> for TimeRange {
    fn from(range: Range<Timestamp>) -> Self {
        Self::new(range.start, range.end)
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.begin, self.end)
    }
}

/// Validate and normalize a set of scan ranges
///
/// Fails with `InvalidRange` if `ranges` is empty or any range has
/// `begin > end`. Empty ranges are dropped; overlapping or touching ranges
/// are coalesced. The result may be empty when every input range was empty.
pub fn normalize_ranges(ranges: &[TimeRange]) -> Result<Vec<TimeRange>> {
    if ranges.is_empty() {
        return Err(TsError::InvalidRange(
            "at least one time range is required".to_string(),
        ));
    }
    for range in ranges {
        range.validate()?;
    }

    let mut sorted: Vec<TimeRange> = ranges.iter().copied().filter(|r| !r.is_empty()).collect();
    sorted.sort_by_key(|r| r.begin);

    let mut merged: Vec<TimeRange> = Vec::with_capacity(sorted.len());
    for range in sorted {
        match merged.last_mut() {
            Some(last) if range.begin <= last.end => last.end = last.end.max(range.end),
            _ => merged.push(range),
        }
    }

    Ok(merged)
}
