// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Public async state-store API: WAL-backed durability over a materialized
//! in-memory view, with periodic snapshot compaction.
//!
//! All mutations go through one [`tokio::sync::Mutex`]-guarded handle, giving
//! the single-writer discipline spec §5 requires without a separate lock
//! abstraction — the same role the teacher's `Wal` itself plays, just lifted
//! one layer up so snapshot/replay bookkeeping stays alongside it.

use crate::error::{StoreError, WalError};
use crate::materialized::MaterializedState;
use crate::op::StoreOp;
use crate::snapshot::Snapshot;
use crate::wal::Wal;
use lazydev_core::{LogEntry, LogStream, ProjectMetrics, ProjectState, ProjectStatePatch};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Number of applied ops after which a snapshot checkpoint is taken,
/// bounding how much WAL a restart must replay.
const CHECKPOINT_OP_THRESHOLD: usize = 500;

struct Inner {
    wal: Wal,
    state: MaterializedState,
    ops_since_checkpoint: usize,
}

/// The durable, single-process state store: `projects`/`metrics`/`logs` as
/// specified in spec §4.A, backed by a WAL + periodic snapshot instead of a
/// literal SQL engine (see `SPEC_FULL.md` §4.A).
pub struct StateStore {
    wal_path: PathBuf,
    snapshot_path: PathBuf,
    inner: Mutex<Inner>,
}

impl StateStore {
    /// Open (or create) the store rooted at `state_dir`: `state.wal` and
    /// `state.snapshot` within it. Fatal (`StoreError::Open`) only if the WAL
    /// cannot be opened at all — a corrupt snapshot is tolerated by rotating
    /// it aside and rebuilding from the WAL instead of failing startup.
    pub async fn open(state_dir: &Path) -> Result<Self, StoreError> {
        std::fs::create_dir_all(state_dir).map_err(|e| StoreError::Open(WalError::Io(e)))?;
        let wal_path = state_dir.join("state.wal");
        let snapshot_path = state_dir.join("state.snapshot");

        let snapshot = Snapshot::load_or_rotate(&snapshot_path)?;
        let (seq, state) = match snapshot {
            Some(s) => (s.seq, s.state),
            None => (0, MaterializedState::default()),
        };

        let mut wal = Wal::open(&wal_path, seq).map_err(StoreError::Open)?;
        let mut state = state;
        let mut ops_since_checkpoint = 0;
        while let Some(entry) = wal.next_unprocessed().map_err(StoreError::Open)? {
            state.apply(&entry.op);
            wal.mark_processed(entry.seq);
            ops_since_checkpoint += 1;
        }

        Ok(Self {
            wal_path,
            snapshot_path,
            inner: Mutex::new(Inner {
                wal,
                state,
                ops_since_checkpoint,
            }),
        })
    }

    /// Append `op`, apply it to the materialized view, and checkpoint if due.
    ///
    /// Per spec §7 ("mid-run writes retry once, then log and continue"),
    /// append failures are retried once before being downgraded to a logged,
    /// best-effort no-op — a single dropped activity stamp or log line must
    /// never crash the daemon.
    async fn append(&self, op: StoreOp) {
        let mut inner = self.inner.lock().await;
        let result = inner.wal.append(&op).or_else(|_| inner.wal.append(&op));
        match result {
            Ok(seq) => {
                inner.state.apply(&op);
                inner.wal.mark_processed(seq);
                inner.ops_since_checkpoint += 1;
                if inner.wal.needs_flush() {
                    if let Err(e) = inner.wal.flush() {
                        tracing::error!(error = %e, "WAL flush failed");
                    }
                }
                if inner.ops_since_checkpoint >= CHECKPOINT_OP_THRESHOLD {
                    self.checkpoint_locked(&mut inner);
                }
            }
            Err(e) => {
                tracing::error!(op = ?op, error = %e, "WAL append failed twice, dropping op");
            }
        }
    }

    fn checkpoint_locked(&self, inner: &mut Inner) {
        if let Err(e) = inner.wal.flush() {
            tracing::error!(error = %e, "WAL flush before checkpoint failed");
            return;
        }
        let seq = inner.wal.processed_seq();
        let snapshot = Snapshot::new(seq, inner.state.clone(), 0);
        match snapshot.save(&self.snapshot_path) {
            Ok(()) => {
                if let Err(e) = inner.wal.truncate_before(seq) {
                    tracing::error!(error = %e, "WAL truncation after checkpoint failed");
                } else {
                    inner.ops_since_checkpoint = 0;
                }
            }
            Err(e) => tracing::error!(error = %e, "snapshot save failed, keeping WAL untrimmed"),
        }
    }

    pub async fn get_state(&self, name: &str) -> Option<ProjectState> {
        self.inner.lock().await.state.get_state(name)
    }

    pub async fn all_states(&self) -> BTreeMap<String, ProjectState> {
        self.inner.lock().await.state.all_states()
    }

    pub async fn metrics_for(&self, name: &str) -> ProjectMetrics {
        self.inner.lock().await.state.metrics_for(name)
    }

    /// Upsert semantics: fields left `None` in `patch` are preserved.
    pub async fn set_state(&self, name: &str, patch: ProjectStatePatch) {
        self.append(StoreOp::SetState {
            name: name.to_string(),
            status: patch.status,
            port: patch.port,
            pid: patch.pid,
            last_activity: patch.last_activity,
            started_at: patch.started_at,
        })
        .await;
    }

    pub async fn update_activity(&self, name: &str, now_ms: u64) {
        self.append(StoreOp::UpdateActivity {
            name: name.to_string(),
            now_ms,
        })
        .await;
    }

    pub async fn inc_ws(&self, name: &str, now_ms: u64) {
        self.append(StoreOp::IncWs {
            name: name.to_string(),
            now_ms,
        })
        .await;
    }

    pub async fn dec_ws(&self, name: &str, now_ms: u64) {
        self.append(StoreOp::DecWs {
            name: name.to_string(),
            now_ms,
        })
        .await;
    }

    pub async fn set_cold_start_time(&self, name: &str, ms: u64) {
        self.append(StoreOp::SetColdStartTime {
            name: name.to_string(),
            ms,
        })
        .await;
    }

    pub async fn add_log(&self, name: &str, stream: LogStream, timestamp_ms: u64, message: String) {
        self.append(StoreOp::AddLog {
            name: name.to_string(),
            stream,
            timestamp_ms,
            message,
        })
        .await;
    }

    pub async fn recent_logs(&self, name: &str, limit: usize) -> Vec<LogEntry> {
        self.inner.lock().await.state.recent_logs(name, limit)
    }

    pub async fn logs_since(&self, name: &str, ts: u64) -> Vec<LogEntry> {
        self.inner.lock().await.state.logs_since(name, ts)
    }

    pub async fn delete_project(&self, name: &str) {
        self.append(StoreOp::DeleteProject {
            name: name.to_string(),
        })
        .await;
    }

    /// Flush and checkpoint, then drop the handle. Called from the daemon's
    /// shutdown sequence so a clean exit always leaves a fresh snapshot and a
    /// short WAL tail behind.
    pub async fn close(&self) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        inner.wal.flush().map_err(StoreError::from)?;
        self.checkpoint_locked(&mut inner);
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn wal_path(&self) -> &Path {
        &self.wal_path
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
