// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Hot-reload file watcher for the config file.
//!
//! Watches the config file for changes, debounces events, reparses, and
//! publishes the new [`Config`] on a [`tokio::sync::watch`] channel. Replaces
//! a callback-registration pattern with a typed channel: consumers subscribe
//! once at startup and always read the latest value, never a stale one.

use crate::error::ConfigError;
use lazydev_core::Config;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

/// Default debounce interval for config file change events.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Handle to a running config watcher. Dropping it stops the watch task on
/// the next event loop iteration once the internal channel closes.
pub struct ConfigWatcher {
    _watcher: RecommendedWatcher,
    task: tokio::task::JoinHandle<()>,
}

impl ConfigWatcher {
    pub fn stop(self) {
        self.task.abort();
    }
}

/// Start watching `path` for changes, publishing each successfully validated
/// reparse on the returned receiver. The first value is always `initial`.
///
/// Parse/validation errors on reload are logged and the previous config is
/// kept current — a hot reload never tears down a working daemon.
pub fn watch(
    path: PathBuf,
    initial: Config,
) -> Result<(ConfigWatcher, watch::Receiver<Config>), ConfigError> {
    let (tx, rx) = watch::channel(initial);
    let (raw_tx, mut raw_rx) = mpsc::unbounded_channel();

    let watch_path = path.clone();
    let mut fs_watcher = RecommendedWatcher::new(
        move |res| {
            let _ = raw_tx.send(res);
        },
        notify::Config::default(),
    )
    .map_err(|e| ConfigError::Io {
        path: watch_path.display().to_string(),
        source: std::io::Error::new(std::io::ErrorKind::Other, e.to_string()),
    })?;

    let watch_dir = parent_or_dot(&path);
    fs_watcher
        .watch(&watch_dir, RecursiveMode::NonRecursive)
        .map_err(|e| ConfigError::Io {
            path: watch_dir.display().to_string(),
            source: std::io::Error::new(std::io::ErrorKind::Other, e.to_string()),
        })?;

    let task = tokio::spawn(async move {
        let mut pending_reload = false;
        loop {
            let sleep = tokio::time::sleep(DEFAULT_DEBOUNCE);
            tokio::select! {
                () = sleep, if pending_reload => {
                    pending_reload = false;
                    reload(&path, &tx);
                }
                event = raw_rx.recv() => {
                    match event {
                        Some(Ok(ev)) if touches_config(&ev, &path) => {
                            pending_reload = true;
                        }
                        Some(Ok(_)) => {}
                        Some(Err(e)) => warn!(error = %e, "config watcher error"),
                        None => {
                            debug!("config watcher channel closed");
                            break;
                        }
                    }
                }
            }
        }
    });

    Ok((
        ConfigWatcher {
            _watcher: fs_watcher,
            task,
        },
        rx,
    ))
}

fn reload(path: &Path, tx: &watch::Sender<Config>) {
    match crate::loader::load(path) {
        Ok(config) => {
            info!(path = %path.display(), "config reloaded");
            let _ = tx.send(config);
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "config reload failed, keeping previous config");
        }
    }
}

fn touches_config(event: &Event, path: &Path) -> bool {
    matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    ) && event.paths.iter().any(|p| p == path)
}

fn parent_or_dot(path: &Path) -> PathBuf {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
#[path = "watcher_tests.rs"]
mod tests;
