// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// A single validation failure, attributable to one project or a settings key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("project {name:?}: {reason}")]
    Project { name: String, reason: String },
    #[error("settings: {0}")]
    Settings(String),
}

/// Errors from loading and validating the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    /// All validation errors collected together, rather than failing on the first.
    #[error("config is invalid: {} error(s)", .0.len())]
    Invalid(Vec<ValidationError>),
}
