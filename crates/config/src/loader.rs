// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reads and validates the YAML config file from disk.

use crate::error::ConfigError;
use crate::raw::RawConfig;
use lazydev_core::Config;
use std::path::Path;

/// Read, parse, and validate the config file at `path`.
///
/// On validation failure, all collected errors are reported together via
/// [`ConfigError::Invalid`].
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_str(&contents, path)
}

fn load_str(contents: &str, path: &Path) -> Result<Config, ConfigError> {
    let raw: RawConfig = serde_yaml::from_str(contents).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })?;
    crate::validate::validate(raw).map_err(ConfigError::Invalid)
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
