// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Zstd-compressed point-in-time snapshot of [`MaterializedState`], used to
//! bound WAL growth: compaction replaces "replay the whole history" with
//! "load newest snapshot, replay only what came after."

use crate::error::SnapshotError;
use crate::materialized::MaterializedState;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Current on-disk snapshot schema version.
pub const CURRENT_SNAPSHOT_VERSION: u32 = 1;

const MAX_BAK_FILES: u32 = 3;
const ZSTD_LEVEL: i32 = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(rename = "v")]
    pub version: u32,
    /// WAL sequence number this snapshot reflects; the WAL can be replayed
    /// from `seq + 1` onward to reach current state.
    pub seq: u64,
    pub state: MaterializedState,
    pub created_at_ms: u64,
}

impl Snapshot {
    pub fn new(seq: u64, state: MaterializedState, created_at_ms: u64) -> Self {
        Self {
            version: CURRENT_SNAPSHOT_VERSION,
            seq,
            state,
            created_at_ms,
        }
    }

    /// Write this snapshot to `path` as zstd-compressed JSON, atomically via
    /// a write-to-temp-then-rename.
    pub fn save(&self, path: &Path) -> Result<(), SnapshotError> {
        let json = serde_json::to_vec(self)?;
        let tmp_path = path.with_extension("tmp");
        {
            let file = File::create(&tmp_path)?;
            let mut encoder =
                zstd::Encoder::new(BufWriter::new(file), ZSTD_LEVEL).map_err(SnapshotError::Compression)?;
            encoder.write_all(&json)?;
            encoder.finish().map_err(SnapshotError::Compression)?;
        }
        fs::rename(&tmp_path, path)?;
        Ok(())
    }

    /// Load the snapshot at `path`, or `None` if it does not exist.
    pub fn load(path: &Path) -> Result<Option<Snapshot>, SnapshotError> {
        if !path.exists() {
            return Ok(None);
        }
        let file = File::open(path)?;
        let decoder = zstd::Decoder::new(BufReader::new(file)).map_err(SnapshotError::Compression)?;
        let snapshot: Snapshot = serde_json::from_reader(decoder)?;
        Ok(Some(snapshot))
    }

    /// Load `path`, rotating it to a `.bak` path and returning `None` instead
    /// of erroring if it is corrupt — a snapshot is always reconstructible
    /// from the WAL, so corruption here is recoverable, not fatal.
    pub fn load_or_rotate(path: &Path) -> Result<Option<Snapshot>, SnapshotError> {
        match Self::load(path) {
            Ok(snapshot) => Ok(snapshot),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "snapshot corrupt, rotating and rebuilding from WAL");
                let bak_path = rotate_bak_path(path);
                if path.exists() {
                    fs::rename(path, &bak_path)?;
                }
                Ok(None)
            }
        }
    }
}

/// Pick the next `.bak` / `.bak.N` path, rotating older backups out. Keeps
/// up to [`MAX_BAK_FILES`] backups, evicting the oldest.
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
#[path = "snapshot_tests.rs"]
mod tests;
