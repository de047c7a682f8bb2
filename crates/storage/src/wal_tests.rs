// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::tempdir;

fn activity_op(name: &str, now_ms: u64) -> StoreOp {
    StoreOp::UpdateActivity {
        name: name.to_string(),
        now_ms,
    }
}

#[test]
fn open_creates_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.wal");

    let wal = Wal::open(&path, 0).unwrap();

    assert!(path.exists());
    assert_eq!(wal.write_seq(), 0);
    assert_eq!(wal.processed_seq(), 0);
}

#[test]
fn append_and_flush_persists_bytes() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.wal");

    let mut wal = Wal::open(&path, 0).unwrap();
    let seq1 = wal.append(&activity_op("alpha", 1)).unwrap();
    let seq2 = wal.append(&activity_op("alpha", 2)).unwrap();
    assert_eq!(seq1, 1);
    assert_eq!(seq2, 2);

    wal.flush().unwrap();

    let metadata = std::fs::metadata(&path).unwrap();
    assert!(metadata.len() > 0);
}

#[test]
fn next_unprocessed_returns_entries_in_order() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.wal");
    let mut wal = Wal::open(&path, 0).unwrap();

    wal.append(&activity_op("alpha", 1)).unwrap();
    wal.append(&activity_op("beta", 2)).unwrap();

    let entry1 = wal.next_unprocessed().unwrap().unwrap();
    assert_eq!(entry1.seq, 1);
    assert_eq!(entry1.op.project_name(), "alpha");

    let entry2 = wal.next_unprocessed().unwrap().unwrap();
    assert_eq!(entry2.seq, 2);
    assert_eq!(entry2.op.project_name(), "beta");

    assert!(wal.next_unprocessed().unwrap().is_none());
}

#[test]
fn mark_processed_advances_cursor() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.wal");
    let mut wal = Wal::open(&path, 0).unwrap();

    wal.append(&activity_op("alpha", 1)).unwrap();
    wal.flush().unwrap();

    let entry = wal.next_unprocessed().unwrap().unwrap();
    wal.mark_processed(entry.seq);

    assert_eq!(wal.processed_seq(), 1);
}

#[test]
fn reopen_resumes_from_processed_seq() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.wal");

    {
        let mut wal = Wal::open(&path, 0).unwrap();
        wal.append(&activity_op("alpha", 1)).unwrap();
        wal.append(&activity_op("alpha", 2)).unwrap();
        wal.flush().unwrap();
    }

    let wal = Wal::open(&path, 1).unwrap();
    assert_eq!(wal.write_seq(), 2);
    assert_eq!(wal.processed_seq(), 1);
}

#[test]
fn entries_after_filters_by_seq() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.wal");
    let mut wal = Wal::open(&path, 0).unwrap();

    wal.append(&activity_op("alpha", 1)).unwrap();
    wal.append(&activity_op("alpha", 2)).unwrap();
    wal.append(&activity_op("alpha", 3)).unwrap();
    wal.flush().unwrap();

    let entries = wal.entries_after(1).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].seq, 2);
    assert_eq!(entries[1].seq, 3);
}

#[test]
fn truncate_before_drops_earlier_entries() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.wal");
    let mut wal = Wal::open(&path, 0).unwrap();

    wal.append(&activity_op("alpha", 1)).unwrap();
    wal.append(&activity_op("alpha", 2)).unwrap();
    wal.append(&activity_op("alpha", 3)).unwrap();
    wal.flush().unwrap();

    wal.truncate_before(2).unwrap();

    assert_eq!(wal.processed_seq(), 2);
    let remaining = wal.entries_after(0).unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].seq, 3);
}

#[test]
fn corrupted_trailing_line_is_rotated_and_recovery_continues() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.wal");

    {
        let mut wal = Wal::open(&path, 0).unwrap();
        wal.append(&activity_op("alpha", 1)).unwrap();
        wal.flush().unwrap();
    }

    let mut raw = std::fs::OpenOptions::new().append(true).open(&path).unwrap();
    use std::io::Write as _;
    writeln!(raw, "{{not valid json").unwrap();

    let wal = Wal::open(&path, 0).unwrap();
    assert_eq!(wal.write_seq(), 1);
    assert!(path.with_extension("bak").exists());
}
