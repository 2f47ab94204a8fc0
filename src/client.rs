//! Client Module
//!
//! Session facade tying a store handle to a configuration.
//!
//! ## Responsibilities
//! - Own the shared store handle (never a global)
//! - Hand out writers with the configured flush policy and buffer capacity
//! - Hand out readers with the configured page size

use std::sync::Arc;

use crate::config::{Config, FlushPolicy};
use crate::error::Result;
use crate::model::{Table, TimeRange};
use crate::reader::{RangeReader, RangeScan};
use crate::store::{LogStore, Store};
use crate::writer::Writer;

/// A session against one store
///
/// Cheap to clone; clones share the store.
#[derive(Clone)]
pub struct Client {
    /// Session configuration
    config: Config,

    /// Backend every writer and reader of this session talks to
    store: Arc<dyn Store>,
}

impl Client {
    /// Create a session over an existing store
    pub fn new(store: Arc<dyn Store>, config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, store })
    }

    /// Open a session over a local log store at `config.data_dir`
    pub fn open_local(config: Config) -> Result<Self> {
        config.validate()?;
        let store = LogStore::open(&config.data_dir, config.sync_on_commit)?;
        tracing::info!(data_dir = %config.data_dir.display(), tables = store.table_names().len(), "opened local store");
        Ok(Self {
            config,
            store: Arc::new(store),
        })
    }

    /// Writer for `table` using the session's default flush policy
    pub fn writer(&self, table: &Arc<Table>) -> Result<Writer> {
        self.writer_with_policy(table, self.config.flush_policy)
    }

    /// Writer for `table` with an explicit flush policy
    pub fn writer_with_policy(&self, table: &Arc<Table>, policy: FlushPolicy) -> Result<Writer> {
        Writer::with_capacity(
            Arc::clone(&self.store),
            Arc::clone(table),
            policy,
            self.config.buffer_capacity,
        )
    }

    /// Reader for `table` using the session's page size
    pub fn reader(&self, table: &Arc<Table>) -> RangeReader {
        RangeReader::with_page_size(
            Arc::clone(&self.store),
            Arc::clone(table),
            self.config.scan_page_size,
        )
    }

    /// Shorthand for `reader(table).scan(ranges)`
    pub fn scan(&self, table: &Arc<Table>, ranges: &[TimeRange]) -> Result<RangeScan> {
        self.reader(table).scan(ranges)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }
}
