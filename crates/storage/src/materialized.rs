// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory state built by replaying [`crate::op::StoreOp`] entries.
//!
//! Mirrors the teacher's `MaterializedState`: one struct holding the derived
//! maps, with an `apply` method that is the single place op semantics live.
//! Unlike the teacher's event log (facts about what happened), a `StoreOp`
//! is already an intent to mutate state, so `apply` is a direct upsert
//! rather than a derivation — but the replay-from-WAL shape is the same.

use crate::op::StoreOp;
use lazydev_core::{LogEntry, LogStream, ProjectMetrics, ProjectState};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};

/// Per-project retention cap for the log ring buffer (spec §4.A: "at most
/// 1,000 most recent entries").
pub const LOG_RETENTION_CAP: usize = 1_000;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MaterializedState {
    pub projects: BTreeMap<String, ProjectState>,
    pub metrics: BTreeMap<String, ProjectMetrics>,
    /// Per-project log ring, newest at the back; capped at
    /// [`LOG_RETENTION_CAP`] entries.
    pub logs: BTreeMap<String, VecDeque<LogEntry>>,
    /// Monotonic id counter for [`LogEntry::id`], independent per replay
    /// generation but never reused within one.
    pub next_log_id: u64,
}

impl MaterializedState {
    pub fn get_state(&self, name: &str) -> Option<ProjectState> {
        self.projects.get(name).cloned()
    }

    pub fn all_states(&self) -> BTreeMap<String, ProjectState> {
        self.projects.clone()
    }

    pub fn metrics_for(&self, name: &str) -> ProjectMetrics {
        self.metrics.get(name).cloned().unwrap_or_default()
    }

    pub fn recent_logs(&self, name: &str, limit: usize) -> Vec<LogEntry> {
        let Some(ring) = self.logs.get(name) else {
            return Vec::new();
        };
        let start = ring.len().saturating_sub(limit);
        ring.iter().skip(start).cloned().collect()
    }

    pub fn logs_since(&self, name: &str, ts: u64) -> Vec<LogEntry> {
        let Some(ring) = self.logs.get(name) else {
            return Vec::new();
        };
        ring.iter()
            .filter(|entry| entry.timestamp_ms > ts)
            .cloned()
            .collect()
    }

    /// Apply one durable operation, mutating the relevant maps.
    ///
    /// Every handler is idempotent with respect to the WAL's own replay:
    /// applying the same `StoreOp` twice (e.g. because the daemon crashed
    /// after append but before the in-memory apply) always lands on the same
    /// state, since each variant is a plain upsert rather than a relative
    /// adjustment applied on top of unknown prior state.
    pub fn apply(&mut self, op: &StoreOp) {
        match op {
            StoreOp::SetState {
                name,
                status,
                port,
                pid,
                last_activity,
                started_at,
            } => {
                let entry = self.projects.entry(name.clone()).or_default();
                if let Some(status) = status {
                    entry.status = *status;
                }
                if let Some(port) = port {
                    entry.port = *port;
                }
                if let Some(pid) = pid {
                    entry.pid = *pid;
                }
                if let Some(last_activity) = last_activity {
                    entry.last_activity = *last_activity;
                }
                if let Some(started_at) = started_at {
                    entry.started_at = *started_at;
                }
            }
            StoreOp::UpdateActivity { name, now_ms } => {
                let state = self.projects.entry(name.clone()).or_default();
                state.last_activity = Some(*now_ms);
                self.metrics
                    .entry(name.clone())
                    .or_default()
                    .record_request(*now_ms);
            }
            StoreOp::IncWs { name, now_ms } => {
                let state = self.projects.entry(name.clone()).or_default();
                state.websocket_connections = state.websocket_connections.saturating_add(1);
                state.last_activity = Some(*now_ms);
            }
            StoreOp::DecWs { name, now_ms } => {
                let state = self.projects.entry(name.clone()).or_default();
                state.websocket_connections = state.websocket_connections.saturating_sub(1);
                state.last_activity = Some(*now_ms);
            }
            StoreOp::SetColdStartTime { name, ms } => {
                self.metrics.entry(name.clone()).or_default().cold_start_time = Some(*ms);
            }
            StoreOp::AddLog {
                name,
                stream,
                timestamp_ms,
                message,
            } => {
                self.push_log(name, *stream, *timestamp_ms, message.clone());
            }
            StoreOp::DeleteProject { name } => {
                self.projects.remove(name);
                self.metrics.remove(name);
            }
        }
    }

    fn push_log(&mut self, name: &str, stream: LogStream, timestamp_ms: u64, message: String) {
        let id = self.next_log_id;
        self.next_log_id += 1;
        let ring = self.logs.entry(name.to_string()).or_default();
        ring.push_back(LogEntry {
            id,
            name: name.to_string(),
            stream,
            timestamp_ms,
            message,
        });
        while ring.len() > LOG_RETENTION_CAP {
            ring.pop_front();
        }
    }
}

#[cfg(test)]
#[path = "materialized_tests.rs"]
mod tests;
