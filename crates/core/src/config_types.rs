// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Authoritative configuration types, as parsed from YAML.
//!
//! Validation lives in the config crate; this module only carries the shape
//! and the documented defaults so that [`Settings::default`] and the daemon's
//! fallback logic have a single source of truth.

use crate::name::ProjectName;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One registered project, as declared under `projects.<name>` in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: ProjectName,
    /// Absolute working directory; `~` is expanded to `$HOME` by the loader.
    pub cwd: PathBuf,
    pub start_cmd: String,
    /// Per-project override, in ms. `Some(0)` means "never auto-stop"; `None`
    /// means "fall back to settings/dynamic timeout".
    #[serde(default)]
    pub idle_timeout: Option<u64>,
    /// If true, the idle controller never auto-stops this project, but the
    /// proxy keeps serving it.
    #[serde(default)]
    pub disabled: bool,
    /// Extra subdomain labels that resolve to this project.
    #[serde(default)]
    pub aliases: Vec<String>,
}

/// Inclusive port range `[min, max]` for the allocator to search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortRange {
    pub min: u16,
    pub max: u16,
}

impl PortRange {
    pub fn contains(&self, port: u16) -> bool {
        (self.min..=self.max).contains(&port)
    }
}

/// Daemon-wide settings, with documented defaults applied for any missing key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub proxy_port: u16,
    /// Default idle timeout in ms, used when `dynamic_timeout` is false and a
    /// project has no per-project override.
    pub idle_timeout: u64,
    pub startup_timeout: u64,
    pub port_range: PortRange,
    pub scan_interval: u64,
    pub dynamic_timeout: bool,
    pub min_timeout: u64,
    pub max_timeout: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            proxy_port: 80,
            idle_timeout: 600_000,
            startup_timeout: 30_000,
            port_range: PortRange {
                min: 4000,
                max: 4999,
            },
            scan_interval: 30_000,
            dynamic_timeout: true,
            min_timeout: 120_000,
            max_timeout: 1_800_000,
        }
    }
}

/// The fully parsed, validated configuration: settings plus the project map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub settings: Settings,
    pub projects: std::collections::BTreeMap<String, ProjectConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            settings: Settings::default(),
            projects: std::collections::BTreeMap::new(),
        }
    }
}

#[cfg(test)]
#[path = "config_types_tests.rs"]
mod tests;
