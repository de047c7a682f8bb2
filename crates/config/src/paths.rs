// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Default filesystem locations, overridable via environment variables.

use std::path::PathBuf;

/// Default config file location: `~/.config/lazydev/config.yaml`, or
/// `$LAZYDEV_CONFIG` if set.
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var("LAZYDEV_CONFIG") {
        return PathBuf::from(path);
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("lazydev")
        .join("config.yaml")
}

/// Default state directory: `~/.local/share/lazydev`, or `$LAZYDEV_STATE_DIR`
/// if set.
pub fn default_state_dir() -> PathBuf {
    if let Ok(path) = std::env::var("LAZYDEV_STATE_DIR") {
        return PathBuf::from(path);
    }
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("lazydev")
}

/// Expand a leading `~` to `$HOME`. Paths without a leading `~` pass through
/// unchanged.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    } else if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
#[path = "paths_tests.rs"]
mod tests;
