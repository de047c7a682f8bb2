// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// Errors surfaced by [`crate::Supervisor`], per spec §7.
#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error("no available ports in range [{min}, {max}]")]
    NoPortsAvailable { min: u16, max: u16 },
    #[error("project {name:?} did not become healthy within {timeout_ms}ms")]
    StartTimeout { name: String, timeout_ms: u64 },
    #[error("failed to spawn child process for {name:?}: {source}")]
    SpawnFailed {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<lazydev_ports::PortError> for SupervisorError {
    fn from(e: lazydev_ports::PortError) -> Self {
        match e {
            lazydev_ports::PortError::NoPortsAvailable { min, max } => {
                SupervisorError::NoPortsAvailable { min, max }
            }
        }
    }
}
