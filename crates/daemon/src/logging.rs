// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tracing setup: `tracing-subscriber` with an `EnvFilter` over a
//! non-blocking file appender, matching the teacher's own
//! `tracing` + `tracing-subscriber` + `tracing-appender` stack
//! (`crates/daemon/Cargo.toml`).

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;

/// Must be held for the process lifetime: dropping it stops the background
/// writer thread and the last buffered lines are lost.
pub struct LoggingGuard(#[allow(dead_code)] WorkerGuard);

/// Initialize global tracing: logs go to `log_path`, appended, with level
/// controlled by `RUST_LOG` (defaulting to `info`).
pub fn init(log_path: &Path) -> std::io::Result<LoggingGuard> {
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::OpenOptions::new().create(true).append(true).open(log_path)?;
    let (writer, guard) = tracing_appender::non_blocking(file);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Ok(LoggingGuard(guard))
}
