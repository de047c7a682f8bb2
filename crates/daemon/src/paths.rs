// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Filesystem locations the daemon binary needs beyond the config crate's
//! own `default_config_path`/`default_state_dir`: the PID file and the log
//! file, both rooted under the state directory per spec §6.

use std::path::PathBuf;

/// Every path the daemon touches on disk, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Paths {
    pub config_path: PathBuf,
    pub state_dir: PathBuf,
    pub pid_path: PathBuf,
    pub log_path: PathBuf,
}

impl Paths {
    /// Resolve paths for this run: `config_override` (the `--config` flag)
    /// wins over `$LAZYDEV_CONFIG`/the default, matching the config crate's
    /// own override order for the state directory.
    pub fn resolve(config_override: Option<PathBuf>) -> Self {
        let config_path = config_override.unwrap_or_else(lazydev_config::default_config_path);
        let state_dir = lazydev_config::default_state_dir();
        Self {
            pid_path: state_dir.join("daemon.pid"),
            log_path: state_dir.join("daemon.log"),
            config_path,
            state_dir,
        }
    }
}

#[cfg(test)]
#[path = "paths_tests.rs"]
mod tests;
