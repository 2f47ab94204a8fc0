//! Row/Value Model
//!
//! Typed rows and the table schema they must conform to.
//!
//! ## Shape
//! ```text
//! Table "stocks"
//! ┌──────────────┬────────────┬────────────┬──────────────┐
//! │  timestamp   │ open (f64) │ volume(i64)│ note (blob)  │
//! ├──────────────┼────────────┼────────────┼──────────────┤
//! │ Row.timestamp│ Value      │ Value      │ Value        │
//! └──────────────┴────────────┴────────────┴──────────────┘
//! ```
//!
//! The row timestamp is the logical event time and is not one of the
//! table's columns. Values are matched to columns by position.

mod range;
mod row;
mod table;

pub use range::{normalize_ranges, TimeRange};
pub use row::{Row, Value};
pub use table::{Column, ColumnKind, Table};

/// Nanoseconds since the Unix epoch
pub type Timestamp = i64;
