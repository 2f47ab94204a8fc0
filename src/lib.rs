//! # tsclient
//!
//! Client-side buffering and range reads for a distributed time-series store:
//! - Typed rows validated against a table schema
//! - Batching writer with manual, threshold and per-row flush policies
//! - Lazy, paginated range reads in timestamp order
//! - Pluggable store contract with in-memory and local log implementations
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Client                              │
//! │                (store handle + Config)                      │
//! └──────────────┬───────────────────────────────┬──────────────┘
//!                │                               │
//!                ▼                               ▼
//!        ┌───────────────┐               ┌───────────────┐
//!        │    Writer     │               │  RangeReader  │
//!        │ (FlushPolicy) │               │  (RangeScan)  │
//!        └───────┬───────┘               └───────┬───────┘
//!                │                               │
//!                ▼                               │
//!        ┌───────────────┐                       │
//!        │ AppendBuffer  │                       │
//!        └───────┬───────┘                       │
//!                │ commit(rows)      fetch_page  │
//!                ▼                               ▼
//!        ┌───────────────────────────────────────────────┐
//!        │          Store (MemoryStore / LogStore)       │
//!        └───────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use tsclient::{Client, Column, Config, FlushPolicy, MemoryStore, Row, Table, TimeRange, Value};
//!
//! let store = Arc::new(MemoryStore::new());
//! let client = Client::new(store, Config::default()).unwrap();
//! let table = Arc::new(Table::new("stocks", vec![Column::double("close")]).unwrap());
//!
//! let mut writer = client.writer_with_policy(&table, FlushPolicy::Manual).unwrap();
//! writer.append(Row::new(10, vec![Value::Double(1.5)])).unwrap();
//! writer.flush().unwrap();
//!
//! let rows: Vec<Row> = client
//!     .scan(&table, &[TimeRange::new(0, 100)])
//!     .unwrap()
//!     .collect::<tsclient::Result<_>>()
//!     .unwrap();
//! assert_eq!(rows.len(), 1);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod model;
pub mod buffer;
pub mod writer;
pub mod reader;
pub mod store;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Result, TsError};
pub use config::{Config, FlushPolicy};
pub use client::Client;
pub use model::{Column, ColumnKind, Row, Table, TimeRange, Timestamp, Value};
pub use reader::{RangeReader, RangeScan};
pub use store::{LogStore, MemoryStore, Store, StoreError};
pub use writer::{AppendOutcome, Writer, WriterStats};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of tsclient
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
