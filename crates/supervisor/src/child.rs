// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Child process construction and log-pump tasks.
//!
//! The spawn shape and the "reaper task so we never leave a zombie" pattern
//! are ported from the teacher's `coop::spawn::execute`
//! (`crates/daemon/src/adapters/agent/coop/spawn.rs`): stdio piped, a
//! `tokio::spawn`'d task owns the `Child` and calls `wait()`, logging the
//! exit status instead of propagating it synchronously.

use lazydev_core::{Clock, LogStream};
use lazydev_storage::StateStore;
use std::collections::HashMap;
use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio_util::sync::CancellationToken;

/// Optional convenience substitutions applied to a command's leading word —
/// e.g. replacing `bun ` with the daemon's own bundled interpreter. Kept
/// configurable rather than hard-coded (spec §9 design note): the contract
/// is simply "execute `start_cmd` through a shell," and this table defaults
/// empty.
#[derive(Debug, Clone, Default)]
pub struct InterpreterSubstitutions(pub HashMap<String, String>);

impl InterpreterSubstitutions {
    /// Apply the first matching `"<prefix> " -> "<replacement> "` rule to
    /// `start_cmd`'s leading word, if any rule matches.
    pub fn apply(&self, start_cmd: &str) -> String {
        for (prefix, replacement) in &self.0 {
            let needle = format!("{prefix} ");
            if let Some(rest) = start_cmd.strip_prefix(&needle) {
                return format!("{replacement} {rest}");
            }
        }
        start_cmd.to_string()
    }
}

/// Build the shell-interpreted child command for `start_cmd`, with `PORT`
/// and `HOST` injected into an inherited environment, per spec §4.C step 4.
pub fn build_command(
    cwd: &Path,
    start_cmd: &str,
    port: u16,
    substitutions: &InterpreterSubstitutions,
) -> Command {
    let effective_cmd = substitutions.apply(start_cmd);

    let mut cmd = Command::new("sh");
    cmd.arg("-c")
        .arg(effective_cmd)
        .current_dir(cwd)
        .env("PORT", port.to_string())
        .env("HOST", "0.0.0.0")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(false);
    cmd
}

/// Spawn the reaper task: owns `child`, waits for exit, and logs the
/// outcome. Prevents zombies without blocking the caller on process exit.
pub fn spawn_reaper(name: String, mut child: Child) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        match child.wait().await {
            Ok(status) => {
                tracing::info!(project = %name, status = %status, "dev server process exited");
            }
            Err(e) => {
                tracing::error!(project = %name, error = %e, "failed to wait on dev server process");
            }
        }
    })
}

/// Spawn a log-pump task for one output stream: reads lines, trims the
/// trailing `\r`, and forwards each non-empty line to the store. A final
/// partial line without a trailing newline is flushed as-is on EOF.
pub fn spawn_log_pump<R, C>(
    reader: R,
    name: String,
    stream: LogStream,
    store: Arc<StateStore>,
    clock: C,
    cancel: CancellationToken,
) -> tokio::task::JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
    C: Clock + 'static,
{
    tokio::spawn(async move {
        let mut reader = BufReader::new(reader);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let read_result = tokio::select! {
                () = cancel.cancelled() => break,
                result = reader.read_until(b'\n', &mut buf) => result,
            };
            match read_result {
                Ok(0) => break,
                Ok(_) => {
                    let line = line_from_bytes(&buf);
                    if !line.is_empty() {
                        store.add_log(&name, stream, clock.epoch_ms(), line).await;
                    }
                }
                Err(e) => {
                    tracing::warn!(project = %name, ?stream, error = %e, "log pump read failed");
                    break;
                }
            }
        }
    })
}

fn line_from_bytes(buf: &[u8]) -> String {
    let text = String::from_utf8_lossy(buf);
    let trimmed = text.strip_suffix('\n').unwrap_or(&text);
    let trimmed = trimmed.strip_suffix('\r').unwrap_or(trimmed);
    trimmed.to_string()
}

#[cfg(test)]
#[path = "child_tests.rs"]
mod tests;
