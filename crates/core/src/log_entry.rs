// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A single captured line of child-process output.

use serde::{Deserialize, Serialize};

/// Which output stream a [`LogEntry`] was captured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogStream {
    Out,
    Err,
}

/// One line of captured stdout/stderr, trailing newline stripped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Monotonic id, unique within the store, used as the sort/resume key.
    pub id: u64,
    pub name: String,
    pub stream: LogStream,
    pub timestamp_ms: u64,
    pub message: String,
}

#[cfg(test)]
#[path = "log_entry_tests.rs"]
mod tests;
