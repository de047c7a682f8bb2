// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort the daemon before it reaches a steady serving state.
///
/// Per spec §6, only these three classes of failure produce a non-zero exit
/// code; everything else is handled per-request or per-project without
/// tearing down the process.
#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("failed to acquire daemon lock at {path}: another daemon is already running?")]
    Lock {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to load configuration: {0}")]
    Config(#[from] lazydev_config::ConfigError),
    #[error("failed to open state store: {0}")]
    Store(#[from] lazydev_storage::StoreError),
    #[error("failed to bind proxy listener on port {port}: {source}")]
    Bind {
        port: u16,
        #[source]
        source: std::io::Error,
    },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
