//! Local log store
//!
//! Durable single-node implementation of the store contract.
//!
//! ## Layout
//! ```text
//! {dir}/
//!   ├── stocks.tslog     (frames of committed batches, append-only)
//!   └── sensors.tslog
//! ```
//!
//! Logs are replayed into an in-memory index on open, the same way SSTable
//! indexes are loaded into RAM, so range reads never touch disk.

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::model::{Row, Table, TimeRange};

use super::frame::{encode_frame, read_frame, FrameRead};
use super::index::TableIndex;
use super::{check_batch, Cursor, Page, Store, StoreError, StoreResult};

const LOG_EXTENSION: &str = "tslog";

/// Append handle of one table log
struct LogFile {
    file: File,
    /// Bytes of complete frames in the file
    len: u64,
}

/// Open log file plus its replayed index
struct TableLog {
    file: Mutex<LogFile>,
    index: RwLock<TableIndex>,
}

/// File-backed store with one append-only log per table
///
/// ## Concurrency:
/// - `tables`: RwLock; the write lock is only taken to register a new table
/// - `TableLog::file`: Mutex; serializes commits to one table across
///   append + fsync
/// - `TableLog::index`: RwLock; write-locked only to insert a batch that is
///   already durable, so fetches never wait on disk I/O
pub struct LogStore {
    dir: PathBuf,
    sync_on_commit: bool,
    tables: RwLock<HashMap<String, Arc<TableLog>>>,
}

impl LogStore {
    /// Open or create a store rooted at `dir`
    ///
    /// On open:
    /// 1. Create the directory if needed
    /// 2. Replay every `.tslog` file into an index
    /// 3. Truncate torn trailing frames left by an interrupted commit
    pub fn open(dir: impl AsRef<Path>, sync_on_commit: bool) -> StoreResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;

        let mut tables = HashMap::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(LOG_EXTENSION) {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let log = Self::replay(&path)?;
            tracing::debug!(table = name, rows = log.index.read().len(), "replayed table log");
            tables.insert(name.to_string(), Arc::new(log));
        }

        Ok(Self {
            dir,
            sync_on_commit,
            tables: RwLock::new(tables),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Names of tables with a log on disk
    pub fn table_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tables.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of committed rows in a table (0 for unknown tables)
    pub fn row_count(&self, table: &str) -> usize {
        self.tables
            .read()
            .get(table)
            .map_or(0, |log| log.index.read().len())
    }

    fn log_path(&self, table: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", table, LOG_EXTENSION))
    }

    fn replay(path: &Path) -> StoreResult<TableLog> {
        let mut reader = BufReader::new(File::open(path)?);
        let mut index = TableIndex::new();
        let mut len = 0u64;

        loop {
            match read_frame(&mut reader)? {
                FrameRead::Frame { first_sequence, rows, size } => {
                    if first_sequence != index.next_sequence() {
                        return Err(StoreError::Corruption(format!(
                            "{}: frame at byte {} starts at sequence {}, expected {}",
                            path.display(),
                            len,
                            first_sequence,
                            index.next_sequence()
                        )));
                    }
                    index.insert_batch(first_sequence, rows);
                    len += size;
                }
                FrameRead::Torn => {
                    tracing::warn!(path = %path.display(), valid_bytes = len, "truncating torn frame at end of log");
                    break;
                }
                FrameRead::End => break,
            }
        }

        let file = OpenOptions::new().append(true).open(path)?;
        if file.metadata()?.len() != len {
            file.set_len(len)?;
        }

        Ok(TableLog {
            file: Mutex::new(LogFile { file, len }),
            index: RwLock::new(index),
        })
    }

    /// Log for `table`, creating its file on first use
    fn table_log(&self, table: &str) -> StoreResult<Arc<TableLog>> {
        if let Some(log) = self.tables.read().get(table) {
            return Ok(Arc::clone(log));
        }

        let mut tables = self.tables.write();
        if let Some(log) = tables.get(table) {
            return Ok(Arc::clone(log));
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.log_path(table))?;
        let log = Arc::new(TableLog {
            file: Mutex::new(LogFile { file, len: 0 }),
            index: RwLock::new(TableIndex::new()),
        });
        tables.insert(table.to_string(), Arc::clone(&log));
        Ok(log)
    }
}

impl Store for LogStore {
    fn commit(&self, table: &Table, rows: &[Row]) -> StoreResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        validate_table_name(table.name())?;
        check_batch(table, rows)?;

        let log = self.table_log(table.name())?;
        let mut guard = log.file.lock();
        let file = &mut *guard;

        // Only commits assign sequences, and they hold the file lock
        let first_sequence = log.index.read().next_sequence();
        let frame = encode_frame(first_sequence, rows)?;

        let written = file.file.write_all(&frame).and_then(|()| {
            if self.sync_on_commit {
                file.file.sync_data()
            } else {
                Ok(())
            }
        });
        if let Err(e) = written {
            // Drop any partial frame so later commits stay readable
            if let Err(truncate_err) = file.file.set_len(file.len) {
                tracing::error!(table = table.name(), error = %truncate_err, "failed to roll back partial frame");
            }
            return Err(StoreError::Io(e));
        }
        file.len += frame.len() as u64;

        log.index.write().insert_batch(first_sequence, rows.iter().cloned());

        Ok(())
    }

    fn fetch_page(
        &self,
        table: &Table,
        range: TimeRange,
        cursor: Option<&Cursor>,
        limit: usize,
    ) -> StoreResult<Page> {
        let log = self.tables.read().get(table.name()).cloned();
        Ok(log.map_or_else(Page::empty, |log| log.index.read().page(range, cursor, limit)))
    }
}

/// Table names become file names, so keep them to a portable character set
fn validate_table_name(name: &str) -> StoreResult<()> {
    let portable = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if !portable || name.starts_with('.') {
        return Err(StoreError::Rejected(format!(
            "table name '{}' cannot be stored locally",
            name
        )));
    }
    Ok(())
}
