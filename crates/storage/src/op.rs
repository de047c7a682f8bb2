// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The durable unit of the write-ahead log: one fact about project state.

use lazydev_core::{LogStream, ProjectStatus};
use serde::{Deserialize, Serialize};

/// A single state mutation, as it is appended to the WAL and replayed into a
/// [`crate::MaterializedState`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StoreOp {
    /// Upsert runtime fields for a project; unmentioned fields are preserved.
    SetState {
        name: String,
        status: Option<ProjectStatus>,
        port: Option<Option<u16>>,
        pid: Option<Option<u32>>,
        last_activity: Option<Option<u64>>,
        started_at: Option<Option<u64>>,
    },
    /// Stamp `last_activity` and append a request timestamp to history.
    UpdateActivity { name: String, now_ms: u64 },
    /// Increment the websocket counter by one and stamp activity.
    IncWs { name: String, now_ms: u64 },
    /// Decrement the websocket counter by one, floored at 0, and stamp activity.
    DecWs { name: String, now_ms: u64 },
    SetColdStartTime { name: String, ms: u64 },
    AddLog {
        name: String,
        stream: LogStream,
        timestamp_ms: u64,
        message: String,
    },
    DeleteProject { name: String },
}

impl StoreOp {
    /// The project name this op applies to, for log/tracing attribution.
    pub fn project_name(&self) -> &str {
        match self {
            StoreOp::SetState { name, .. }
            | StoreOp::UpdateActivity { name, .. }
            | StoreOp::IncWs { name, .. }
            | StoreOp::DecWs { name, .. }
            | StoreOp::SetColdStartTime { name, .. }
            | StoreOp::AddLog { name, .. }
            | StoreOp::DeleteProject { name } => name,
        }
    }
}
