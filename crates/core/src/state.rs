// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime state of a single project, owned by the supervisor and proxy.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a project's dev server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Stopped,
    Starting,
    Running,
}

impl Default for ProjectStatus {
    fn default() -> Self {
        Self::Stopped
    }
}

/// Persisted runtime state for one project.
///
/// Only the supervisor writes `status`, `port`, `pid`, and `started_at`; the
/// proxy writes `last_activity` and the websocket counter via the store's
/// atomic primitives.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectState {
    pub status: ProjectStatus,
    /// Listen port of the child while `starting`/`running`; `None` otherwise.
    pub port: Option<u16>,
    /// OS process id while `running`; `None` otherwise.
    pub pid: Option<u32>,
    /// Epoch-ms of the last proxied request; `None` if never active this generation.
    pub last_activity: Option<u64>,
    /// Epoch-ms at the start of the most recent spawn attempt.
    pub started_at: Option<u64>,
    /// Count of upgraded client-facing WebSocket connections, floored at 0.
    pub websocket_connections: u32,
}

impl ProjectState {
    pub fn is_running(&self) -> bool {
        self.status == ProjectStatus::Running
    }

    /// Apply a partial update, preserving fields the caller did not mention.
    pub fn merge(&mut self, partial: ProjectStatePatch) {
        if let Some(status) = partial.status {
            self.status = status;
        }
        if let Some(port) = partial.port {
            self.port = port;
        }
        if let Some(pid) = partial.pid {
            self.pid = pid;
        }
        if let Some(last_activity) = partial.last_activity {
            self.last_activity = last_activity;
        }
        if let Some(started_at) = partial.started_at {
            self.started_at = started_at;
        }
        if let Some(websocket_connections) = partial.websocket_connections {
            self.websocket_connections = websocket_connections;
        }
    }
}

/// A set of fields to upsert into a [`ProjectState`]; `None` fields are left untouched.
///
/// Fields of type `Option<Option<T>>` distinguish "don't touch" (`None`) from
/// "clear to null" (`Some(None)`).
#[derive(Debug, Clone, Default)]
pub struct ProjectStatePatch {
    pub status: Option<ProjectStatus>,
    pub port: Option<Option<u16>>,
    pub pid: Option<Option<u32>>,
    pub last_activity: Option<Option<u64>>,
    pub started_at: Option<Option<u64>>,
    pub websocket_connections: Option<u32>,
}

impl ProjectStatePatch {
    pub fn status(mut self, status: ProjectStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn port(mut self, port: Option<u16>) -> Self {
        self.port = Some(port);
        self
    }

    pub fn pid(mut self, pid: Option<u32>) -> Self {
        self.pid = Some(pid);
        self
    }

    pub fn last_activity(mut self, last_activity: Option<u64>) -> Self {
        self.last_activity = Some(last_activity);
        self
    }

    pub fn started_at(mut self, started_at: Option<u64>) -> Self {
        self.started_at = Some(started_at);
        self
    }

    pub fn websocket_connections(mut self, count: u32) -> Self {
        self.websocket_connections = Some(count);
        self
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
