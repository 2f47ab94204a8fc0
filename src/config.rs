//! Configuration for tsclient
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{Result, TsError};

/// Main configuration for a tsclient session
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Local Store Configuration
    // -------------------------------------------------------------------------
    /// Root directory for the local log store (one `.tslog` file per table).
    /// Only used when the session is opened with `Client::open_local`.
    pub data_dir: PathBuf,

    /// fsync each committed batch before acknowledging it
    pub sync_on_commit: bool,

    // -------------------------------------------------------------------------
    // Writer Configuration
    // -------------------------------------------------------------------------
    /// Flush policy given to writers created without an explicit one
    pub flush_policy: FlushPolicy,

    /// Initial capacity reserved by each writer's append buffer
    pub buffer_capacity: usize,

    // -------------------------------------------------------------------------
    // Reader Configuration
    // -------------------------------------------------------------------------
    /// Max rows requested from the store per page during a scan
    pub scan_page_size: usize,
}

/// When a writer commits its buffered rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushPolicy {
    /// Only an explicit `flush()` commits (highest throughput, widest loss window)
    Manual,

    /// Commit the whole buffer once it holds `threshold` rows
    AutoFlush { threshold: usize },

    /// Commit after every row (equivalent to `AutoFlush { threshold: 1 }`)
    PerRow,
}

impl FlushPolicy {
    /// Build an `AutoFlush` policy, rejecting a zero threshold
    pub fn auto(threshold: usize) -> Result<Self> {
        let policy = FlushPolicy::AutoFlush { threshold };
        policy.validate()?;
        Ok(policy)
    }

    /// Row count that triggers an implicit flush, `None` for `Manual`
    pub fn threshold(&self) -> Option<usize> {
        match self {
            FlushPolicy::Manual => None,
            FlushPolicy::AutoFlush { threshold } => Some(*threshold),
            FlushPolicy::PerRow => Some(1),
        }
    }

    /// Whether a buffer holding `pending` rows must be flushed now
    pub fn should_flush(&self, pending: usize) -> bool {
        self.threshold().is_some_and(|threshold| pending >= threshold)
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            FlushPolicy::AutoFlush { threshold: 0 } => Err(TsError::Config(
                "auto-flush threshold must be at least 1".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

impl Default for FlushPolicy {
    fn default() -> Self {
        FlushPolicy::AutoFlush { threshold: 1000 }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./tsclient_data"),
            sync_on_commit: true,
            flush_policy: FlushPolicy::default(),
            buffer_capacity: 1024,
            scan_page_size: 4096,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check invariants that cannot be expressed in the types
    pub fn validate(&self) -> Result<()> {
        self.flush_policy.validate()?;
        if self.scan_page_size == 0 {
            return Err(TsError::Config(
                "scan page size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data directory for the local log store
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Set whether commits to the local store are fsynced
    pub fn sync_on_commit(mut self, sync: bool) -> Self {
        self.config.sync_on_commit = sync;
        self
    }

    /// Set the default flush policy for new writers
    pub fn flush_policy(mut self, policy: FlushPolicy) -> Self {
        self.config.flush_policy = policy;
        self
    }

    /// Set the initial append buffer capacity
    pub fn buffer_capacity(mut self, capacity: usize) -> Self {
        self.config.buffer_capacity = capacity;
        self
    }

    /// Set the number of rows fetched per scan page
    pub fn scan_page_size(mut self, rows: usize) -> Self {
        self.config.scan_page_size = rows;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
