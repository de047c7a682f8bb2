// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind the `test-support` feature.

use crate::config_types::ProjectConfig;
use crate::name::ProjectName;
use crate::state::{ProjectState, ProjectStatus};
use std::path::PathBuf;

/// Proptest strategies for core domain types.
pub mod strategies {
    use super::*;
    use proptest::prelude::*;

    /// Generates strings matching `^[a-z][a-z0-9-]*$` with length in `1..=20`.
    pub fn arb_project_name() -> impl Strategy<Value = ProjectName> {
        "[a-z][a-z0-9-]{0,19}".prop_map(|s| ProjectName::parse(s).expect("generated valid label"))
    }

    pub fn arb_project_status() -> impl Strategy<Value = ProjectStatus> {
        prop_oneof![
            Just(ProjectStatus::Stopped),
            Just(ProjectStatus::Starting),
            Just(ProjectStatus::Running),
        ]
    }
}

pub fn project_config(name: &str, cwd: &str, start_cmd: &str) -> ProjectConfig {
    ProjectConfig {
        name: ProjectName::parse(name).expect("test project name"),
        cwd: PathBuf::from(cwd),
        start_cmd: start_cmd.to_string(),
        idle_timeout: None,
        disabled: false,
        aliases: Vec::new(),
    }
}

pub fn running_state(port: u16, pid: u32) -> ProjectState {
    ProjectState {
        status: ProjectStatus::Running,
        port: Some(port),
        pid: Some(pid),
        last_activity: Some(0),
        started_at: Some(0),
        websocket_connections: 0,
    }
}
