// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deserialization shape of the YAML config file, before validation.
//!
//! Kept distinct from [`lazydev_core::Config`] because durations arrive as
//! strings (`"10m"`, `"30s"`) and names are unvalidated until [`crate::validate`]
//! has had a chance to collect every error at once.

use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    pub settings: RawSettings,
    pub projects: BTreeMap<String, RawProjectConfig>,
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            settings: RawSettings::default(),
            projects: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RawSettings {
    pub proxy_port: Option<u16>,
    pub idle_timeout: Option<String>,
    pub startup_timeout: Option<String>,
    pub port_range: Option<[u16; 2]>,
    pub scan_interval: Option<String>,
    pub dynamic_timeout: Option<bool>,
    pub min_timeout: Option<String>,
    pub max_timeout: Option<String>,
}

impl Default for RawSettings {
    fn default() -> Self {
        Self {
            proxy_port: None,
            idle_timeout: None,
            startup_timeout: None,
            port_range: None,
            scan_interval: None,
            dynamic_timeout: None,
            min_timeout: None,
            max_timeout: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawProjectConfig {
    pub name: String,
    pub cwd: String,
    pub start_cmd: String,
    #[serde(default)]
    pub idle_timeout: Option<String>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub aliases: Vec<String>,
}
