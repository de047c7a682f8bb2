// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only, newline-delimited JSON write-ahead log.
//!
//! Each line is a [`WalEntry`]. On open, a trailing malformed line (e.g. from
//! a crash mid-write) is tolerated: the file is truncated to the last valid
//! entry and the original bytes are preserved under a rotated `.bak` path.

use crate::error::WalError;
use crate::op::StoreOp;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// One WAL line: a monotonic sequence number plus the operation it records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalEntry {
    pub seq: u64,
    pub op: StoreOp,
}

/// Number of buffered appends after which a flush is due, independent of
/// the time-based threshold.
const FLUSH_THRESHOLD: usize = 100;
/// Time-based flush threshold, so low-traffic periods still get durability.
const FLUSH_INTERVAL: Duration = Duration::from_millis(500);
const MAX_BAK_FILES: u32 = 3;

pub struct Wal {
    path: PathBuf,
    writer: BufWriter<File>,
    write_seq: u64,
    processed_seq: u64,
    /// Byte offset in the file up to which entries have been read by
    /// `next_unprocessed`/`entries_after`.
    read_offset: u64,
    pending_since_flush: usize,
    last_flush: std::time::Instant,
}

impl Wal {
    /// Open (creating if absent) the WAL at `path`, replaying and validating
    /// existing entries. `processed_seq` seeds the read cursor, typically the
    /// sequence number recorded in the most recent snapshot.
    pub fn open(path: &Path, processed_seq: u64) -> Result<Self, WalError> {
        if !path.exists() {
            File::create(path)?;
        }

        let write_seq = Self::recover(path)?;

        let file = OpenOptions::new().append(true).read(true).open(path)?;
        let writer = BufWriter::new(file);

        Ok(Self {
            path: path.to_path_buf(),
            writer,
            write_seq,
            processed_seq,
            read_offset: 0,
            pending_since_flush: 0,
            last_flush: std::time::Instant::now(),
        })
    }

    /// Scan the file for the last valid entry. If a malformed trailing line
    /// is found, rotate the whole file to a `.bak` path and rewrite a clean
    /// copy containing only the valid entries read so far.
    fn recover(path: &Path) -> Result<u64, WalError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let mut valid_lines = Vec::new();
        let mut last_seq = 0u64;
        let mut corrupted = false;

        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<WalEntry>(&line) {
                Ok(entry) => {
                    last_seq = entry.seq;
                    valid_lines.push(line);
                }
                Err(_) => {
                    corrupted = true;
                    break;
                }
            }
        }

        if corrupted {
            let bak_path = rotate_bak_path(path);
            fs::rename(path, &bak_path)?;

            let mut clean = File::create(path)?;
            for line in &valid_lines {
                writeln!(clean, "{line}")?;
            }
            clean.flush()?;
            tracing::warn!(path = %path.display(), backup = %bak_path.display(), "WAL corruption detected, rotated to backup");
        }

        Ok(last_seq)
    }

    pub fn write_seq(&self) -> u64 {
        self.write_seq
    }

    pub fn processed_seq(&self) -> u64 {
        self.processed_seq
    }

    /// Append one operation, returning its assigned sequence number. Buffered
    /// until [`Self::flush`] or the internal threshold is hit.
    pub fn append(&mut self, op: &StoreOp) -> Result<u64, WalError> {
        self.write_seq += 1;
        let entry = WalEntry {
            seq: self.write_seq,
            op: op.clone(),
        };
        let line = serde_json::to_string(&entry)?;
        writeln!(self.writer, "{line}")?;
        self.pending_since_flush += 1;

        if self.pending_since_flush >= FLUSH_THRESHOLD {
            self.flush()?;
        }

        Ok(entry.seq)
    }

    pub fn flush(&mut self) -> Result<(), WalError> {
        self.writer.flush()?;
        self.pending_since_flush = 0;
        self.last_flush = std::time::Instant::now();
        Ok(())
    }

    pub fn needs_flush(&self) -> bool {
        self.pending_since_flush >= FLUSH_THRESHOLD || self.last_flush.elapsed() >= FLUSH_INTERVAL
    }

    /// Read and return the next entry with `seq > processed_seq`, or `None`
    /// if the log is fully caught up. Does not advance `processed_seq` —
    /// call [`Self::mark_processed`] once the caller has durably applied it.
    ///
    /// A malformed entry is treated as end-of-log (returns `None`) rather
    /// than an error, mirroring [`Self::recover`]'s tolerance of trailing
    /// corruption from an interrupted write.
    pub fn next_unprocessed(&mut self) -> Result<Option<WalEntry>, WalError> {
        let mut file = File::open(&self.path)?;
        file.seek(SeekFrom::Start(self.read_offset))?;
        let mut reader = BufReader::new(file);

        loop {
            let mut line = String::new();
            let bytes_read = reader.read_line(&mut line)?;
            if bytes_read == 0 {
                return Ok(None);
            }
            self.read_offset += bytes_read as u64;

            if line.trim().is_empty() {
                continue;
            }
            let entry: WalEntry = match serde_json::from_str(line.trim_end()) {
                Ok(entry) => entry,
                Err(_) => return Ok(None),
            };
            if entry.seq > self.processed_seq {
                return Ok(Some(entry));
            }
        }
    }

    pub fn mark_processed(&mut self, seq: u64) {
        if seq > self.processed_seq {
            self.processed_seq = seq;
        }
    }

    /// All valid entries with `seq > after`, in ascending order. Stops at the
    /// first malformed line rather than erroring.
    pub fn entries_after(&self, after: u64) -> Result<Vec<WalEntry>, WalError> {
        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<WalEntry>(&line) {
                Ok(entry) => {
                    if entry.seq > after {
                        entries.push(entry);
                    }
                }
                Err(_) => break,
            }
        }

        Ok(entries)
    }

    /// Truncate the log to start fresh after a snapshot at `seq`. Used by
    /// the checkpointer once the materialized state up to `seq` is durably
    /// persisted in a snapshot file.
    pub fn truncate_before(&mut self, seq: u64) -> Result<(), WalError> {
        self.flush()?;
        let entries = self.entries_after(seq)?;

        let mut file = File::create(&self.path)?;
        for entry in &entries {
            let line = serde_json::to_string(entry)?;
            writeln!(file, "{line}")?;
        }
        file.flush()?;

        let reopened = OpenOptions::new().append(true).read(true).open(&self.path)?;
        self.writer = BufWriter::new(reopened);
        self.processed_seq = seq;
        self.read_offset = 0;
        self.pending_since_flush = 0;
        Ok(())
    }
}

/// Pick the next `.bak` / `.bak.N` path, rotating older backups out.
///
/// Keeps up to [`MAX_BAK_FILES`] backups: `.bak`, `.bak.2`, `.bak.3`. The
/// oldest backup is removed when the limit is reached.
fn rotate_bak_path(path: &Path) -> PathBuf {
    let bak = |n: u32| {
        if n == 1 {
            path.with_extension("bak")
        } else {
            path.with_extension(format!("bak.{n}"))
        }
    };

    let oldest = bak(MAX_BAK_FILES);
    if oldest.exists() {
        let _ = fs::remove_file(&oldest);
    }

    for n in (1..MAX_BAK_FILES).rev() {
        let src = bak(n);
        if src.exists() {
            let _ = fs::rename(&src, bak(n + 1));
        }
    }

    bak(1)
}

#[cfg(test)]
#[path = "wal_tests.rs"]
mod tests;
