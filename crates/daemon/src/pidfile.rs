// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! PID file plus advisory lock, combined in one file as the teacher's
//! `lifecycle::startup` does for its own lock/PID file: acquiring the
//! exclusive `fs2` lock before writing is what makes "another daemon already
//! running" a clean, race-free error instead of two daemons racing to bind
//! the same proxy port.

use crate::error::DaemonError;
use fs2::FileExt;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Holds the open, locked PID file for the lifetime of one daemon
/// generation. The lock releases automatically when this (or the contained
/// `File`) is dropped; `release()` additionally unlinks the file so a clean
/// shutdown leaves no stale PID behind.
pub struct PidFile {
    path: PathBuf,
    file: Option<std::fs::File>,
}

impl PidFile {
    /// Open (or create) `path`, take an exclusive advisory lock, and
    /// overwrite it with this process's PID as ASCII decimal.
    pub fn acquire(path: &Path) -> Result<Self, DaemonError> {
        let file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;
        file.try_lock_exclusive().map_err(|source| DaemonError::Lock {
            path: path.to_path_buf(),
            source,
        })?;

        let mut file = file;
        file.set_len(0)?;
        writeln!(file, "{}", std::process::id())?;
        file.flush()?;

        Ok(Self {
            path: path.to_path_buf(),
            file: Some(file),
        })
    }

    /// Unlock and remove the PID file. Called only on a clean shutdown path;
    /// a crash leaves the file behind for the next startup's lock attempt to
    /// fail fast against (or, if the process is truly gone, to be silently
    /// reclaimed since advisory locks don't survive process exit).
    pub fn release(mut self) {
        if let Some(file) = self.file.take() {
            let _ = file.unlock();
        }
        let _ = std::fs::remove_file(&self.path);
    }
}

#[cfg(test)]
#[path = "pidfile_tests.rs"]
mod tests;
