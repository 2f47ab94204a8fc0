//! Tests for LogStore
//!
//! These tests verify:
//! - Opening/creating the store directory
//! - Committed batches survive a reopen
//! - Commit order of equal timestamps survives a reopen
//! - Torn trailing frames are truncated, corrupted frames are reported
//! - Header damage is never mistaken for a torn tail
//! - Table names are restricted to portable file names

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;
use tsclient::{Column, LogStore, Row, Store, StoreError, Table, TimeRange, Value};
use tempfile::TempDir;

use crate::common::{ids, stock_row, stocks_table};

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_store() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("store");
    (temp_dir, path)
}

fn all_rows(store: &LogStore, table: &Table) -> Vec<Row> {
    store.fetch_page(table, TimeRange::all(), None, usize::MAX).unwrap().rows
}

// =============================================================================
// Open/Create Tests
// =============================================================================

#[test]
fn test_open_creates_directory() {
    let (_temp, path) = setup_temp_store();
    assert!(!path.exists());

    let store = LogStore::open(&path, true).unwrap();

    assert!(path.is_dir());
    assert_eq!(store.dir(), path.as_path());
    assert!(store.table_names().is_empty());
}

#[test]
fn test_commit_creates_table_log() {
    let (_temp, path) = setup_temp_store();
    let store = LogStore::open(&path, true).unwrap();

    store.commit(&stocks_table(), &[stock_row(1, 1)]).unwrap();

    assert!(path.join("stocks.tslog").is_file());
    assert_eq!(store.table_names(), vec!["stocks".to_string()]);
}

// =============================================================================
// Persistence Tests
// =============================================================================

#[test]
fn test_rows_survive_reopen() {
    let (_temp, path) = setup_temp_store();
    let table = stocks_table();

    {
        let store = LogStore::open(&path, true).unwrap();
        store.commit(&table, &[stock_row(10, 0), stock_row(5, 1)]).unwrap();
        store.commit(&table, &[stock_row(7, 2)]).unwrap();
    }

    let store = LogStore::open(&path, true).unwrap();
    assert_eq!(store.row_count("stocks"), 3);
    assert_eq!(ids(&all_rows(&store, &table)), vec![1, 2, 0]);
}

#[test]
fn test_commit_order_survives_reopen() {
    let (_temp, path) = setup_temp_store();
    let table = stocks_table();

    {
        let store = LogStore::open(&path, true).unwrap();
        store.commit(&table, &[stock_row(3, 0)]).unwrap();
    }
    {
        let store = LogStore::open(&path, true).unwrap();
        store.commit(&table, &[stock_row(3, 1)]).unwrap();
    }

    let store = LogStore::open(&path, false).unwrap();
    assert_eq!(ids(&all_rows(&store, &table)), vec![0, 1]);
}

#[test]
fn test_blob_values_survive_reopen() {
    let (_temp, path) = setup_temp_store();
    let table = Arc::new(
        Table::new("notes", vec![Column::blob("body"), Column::timestamp("seen")]).unwrap(),
    );
    let row = Row::new(
        42,
        vec![Value::Blob(Bytes::from_static(b"Hello World!")), Value::Timestamp(41)],
    );

    {
        let store = LogStore::open(&path, true).unwrap();
        store.commit(&table, &[row.clone()]).unwrap();
    }

    let store = LogStore::open(&path, true).unwrap();
    assert_eq!(all_rows(&store, &table), vec![row]);
}

// =============================================================================
// Recovery Tests
// =============================================================================

#[test]
fn test_torn_tail_is_truncated() {
    let (_temp, path) = setup_temp_store();
    let table = stocks_table();
    let log_path = path.join("stocks.tslog");

    {
        let store = LogStore::open(&path, true).unwrap();
        store.commit(&table, &[stock_row(1, 1), stock_row(2, 2)]).unwrap();
    }
    let valid_len = fs::metadata(&log_path).unwrap().len();

    // Simulate a crash partway through the next frame
    {
        let mut file = OpenOptions::new().append(true).open(&log_path).unwrap();
        file.write_all(&[7, 0, 0, 0, 0, 0, 0, 0, 1, 2]).unwrap();
    }

    {
        let store = LogStore::open(&path, true).unwrap();
        assert_eq!(store.row_count("stocks"), 2);
        assert_eq!(fs::metadata(&log_path).unwrap().len(), valid_len);

        store.commit(&table, &[stock_row(3, 3)]).unwrap();
    }

    let store = LogStore::open(&path, true).unwrap();
    assert_eq!(ids(&all_rows(&store, &table)), vec![1, 2, 3]);
}

#[test]
fn test_corrupted_frame_detected() {
    let (_temp, path) = setup_temp_store();
    let log_path = path.join("stocks.tslog");

    {
        let store = LogStore::open(&path, true).unwrap();
        store.commit(&stocks_table(), &[stock_row(1, 1)]).unwrap();
    }

    let mut bytes = fs::read(&log_path).unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 0xFF;
    fs::write(&log_path, bytes).unwrap();

    let result = LogStore::open(&path, true);
    assert!(matches!(result, Err(StoreError::Corruption(_))));
}

#[test]
fn test_torn_payload_is_truncated() {
    let (_temp, path) = setup_temp_store();
    let table = stocks_table();
    let log_path = path.join("stocks.tslog");

    let two_frames_len = {
        let store = LogStore::open(&path, true).unwrap();
        store.commit(&table, &[stock_row(1, 1)]).unwrap();
        store.commit(&table, &[stock_row(2, 2)]).unwrap();
        let len = fs::metadata(&log_path).unwrap().len();
        store.commit(&table, &[stock_row(3, 3)]).unwrap();
        len
    };

    // Lose the last few payload bytes of the third frame
    let full_len = fs::metadata(&log_path).unwrap().len();
    OpenOptions::new()
        .write(true)
        .open(&log_path)
        .unwrap()
        .set_len(full_len - 3)
        .unwrap();

    let store = LogStore::open(&path, true).unwrap();
    assert_eq!(ids(&all_rows(&store, &table)), vec![1, 2]);
    assert_eq!(fs::metadata(&log_path).unwrap().len(), two_frames_len);
}

#[test]
fn test_zeroed_tail_is_truncated() {
    let (_temp, path) = setup_temp_store();
    let table = stocks_table();
    let log_path = path.join("stocks.tslog");

    {
        let store = LogStore::open(&path, true).unwrap();
        store.commit(&table, &[stock_row(1, 1)]).unwrap();
        store.commit(&table, &[stock_row(2, 2)]).unwrap();
    }
    let valid_len = fs::metadata(&log_path).unwrap().len();

    // Crash left preallocated zero blocks behind the last frame
    {
        let mut file = OpenOptions::new().append(true).open(&log_path).unwrap();
        file.write_all(&[0u8; 16]).unwrap();
        file.write_all(&[0u8; 512]).unwrap();
    }

    {
        let store = LogStore::open(&path, true).unwrap();
        assert_eq!(ids(&all_rows(&store, &table)), vec![1, 2]);
        assert_eq!(fs::metadata(&log_path).unwrap().len(), valid_len);
        store.commit(&table, &[stock_row(3, 3)]).unwrap();
    }

    let store = LogStore::open(&path, true).unwrap();
    assert_eq!(ids(&all_rows(&store, &table)), vec![1, 2, 3]);
}

#[test]
fn test_corrupted_length_leaves_log_intact() {
    let (_temp, path) = setup_temp_store();
    let table = stocks_table();
    let log_path = path.join("stocks.tslog");

    {
        let store = LogStore::open(&path, true).unwrap();
        for i in 0..3 {
            store.commit(&table, &[stock_row(i, i)]).unwrap();
        }
    }

    let mut bytes = fs::read(&log_path).unwrap();
    let original_len = bytes.len() as u64;
    // Length field of the first frame
    bytes[8] ^= 0x40;
    fs::write(&log_path, bytes).unwrap();

    let result = LogStore::open(&path, true);
    assert!(matches!(result, Err(StoreError::Corruption(_))));
    assert_eq!(fs::metadata(&log_path).unwrap().len(), original_len);
}

#[test]
fn test_corrupted_sequence_detected() {
    let (_temp, path) = setup_temp_store();
    let table = stocks_table();
    let log_path = path.join("stocks.tslog");

    {
        let store = LogStore::open(&path, true).unwrap();
        store.commit(&table, &[stock_row(3, 0)]).unwrap();
        store.commit(&table, &[stock_row(3, 1)]).unwrap();
    }

    let mut bytes = fs::read(&log_path).unwrap();
    // High byte of the first frame's starting sequence
    bytes[7] ^= 0x40;
    fs::write(&log_path, bytes).unwrap();

    let result = LogStore::open(&path, true);
    assert!(matches!(result, Err(StoreError::Corruption(_))));
}

#[test]
fn test_reads_proceed_during_commits_to_other_table() {
    let (_temp, path) = setup_temp_store();
    let store = Arc::new(LogStore::open(&path, true).unwrap());
    let stocks = stocks_table();
    let notes = Arc::new(Table::new("notes", vec![Column::int64("n")]).unwrap());

    store.commit(&stocks, &[stock_row(1, 1)]).unwrap();

    let writer = {
        let store = Arc::clone(&store);
        let notes = Arc::clone(&notes);
        std::thread::spawn(move || {
            for i in 0..50 {
                store.commit(&notes, &[Row::new(i, vec![Value::Int64(i)])]).unwrap();
            }
        })
    };

    for _ in 0..50 {
        assert_eq!(ids(&all_rows(&store, &stocks)), vec![1]);
    }
    writer.join().unwrap();

    assert_eq!(store.row_count("notes"), 50);
}

#[test]
fn test_unrelated_files_ignored() {
    let (_temp, path) = setup_temp_store();
    fs::create_dir_all(&path).unwrap();
    fs::write(path.join("README.txt"), b"not a log").unwrap();

    let store = LogStore::open(&path, true).unwrap();
    assert!(store.table_names().is_empty());
}

// =============================================================================
// Validation Tests
// =============================================================================

#[test]
fn test_unportable_table_name_rejected() {
    let (_temp, path) = setup_temp_store();
    let store = LogStore::open(&path, true).unwrap();
    let table = Table::new("../escape", vec![Column::int64("v")]).unwrap();

    let result = store.commit(&table, &[Row::new(1, vec![Value::Int64(1)])]);

    assert!(matches!(result, Err(StoreError::Rejected(_))));
    assert!(store.table_names().is_empty());
}

#[test]
fn test_mismatched_rows_not_logged() {
    let (_temp, path) = setup_temp_store();
    let store = LogStore::open(&path, true).unwrap();

    let result = store.commit(&stocks_table(), &[Row::new(1, vec![Value::Int64(1)])]);

    assert!(matches!(result, Err(StoreError::Rejected(_))));
    assert!(!path.join("stocks.tslog").exists());
}
