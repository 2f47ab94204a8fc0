//! Rows and values

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use super::{ColumnKind, Timestamp};

/// A single typed cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Double(f64),
    Int64(i64),
    Timestamp(Timestamp),
    Blob(Bytes),
}

impl Value {
    /// The column kind this value can be stored in
    pub fn kind(&self) -> ColumnKind {
        match self {
            Value::Double(_) => ColumnKind::Double,
            Value::Int64(_) => ColumnKind::Int64,
            Value::Timestamp(_) => ColumnKind::Timestamp,
            Value::Blob(_) => ColumnKind::Blob,
        }
    }

    pub fn as_int64(&self) -> Option<i64> {
        match self {
            Value::Int64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_blob(&self) -> Option<&Bytes> {
        match self {
            Value::Blob(v) => Some(v),
            _ => None,
        }
    }
}

/// One time-stamped record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// Logical event time
    pub timestamp: Timestamp,

    /// One value per table column, in column order
    pub values: Vec<Value>,
}

impl Row {
    pub fn new(timestamp: Timestamp, values: Vec<Value>) -> Self {
        Self { timestamp, values }
    }
}
