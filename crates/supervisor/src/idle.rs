// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Periodic idle scanner, analogous to the teacher's `core::timer` /
//! `engine::monitor` loops: a `tokio::time::interval` tick reads
//! `all_states()` and calls [`Supervisor::stop`] for every project that has
//! exceeded its effective timeout.

use crate::Supervisor;
use lazydev_core::{Clock, Config, ProjectMetrics, ProjectStatus};
use lazydev_storage::StateStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

const DYNAMIC_BASE_MS: u64 = 5 * 60 * 1000;
const DEFAULT_COLD_MS: u64 = 5000;

/// Compute the effective idle timeout for one project, per spec §4.D's
/// dynamic-timeout algorithm. Exposed standalone so it can be queried
/// outside of a scan tick (e.g. for diagnostics) as the spec requires.
pub fn effective_timeout(
    config_idle_timeout: Option<u64>,
    dynamic_timeout: bool,
    static_idle_timeout: u64,
    min_timeout: u64,
    max_timeout: u64,
    metrics: &ProjectMetrics,
    websocket_connections: u32,
    now_ms: u64,
) -> u64 {
    if let Some(t) = config_idle_timeout {
        return t;
    }
    if !dynamic_timeout {
        return static_idle_timeout;
    }

    let cold = metrics.cold_start_time.unwrap_or(DEFAULT_COLD_MS).max(1);
    let cold_factor = cold as f64 / DEFAULT_COLD_MS as f64;
    let ws_mult = if websocket_connections > 0 { 2.0 } else { 1.0 };
    let activity_score = metrics.activity_score(now_ms);
    let activity_mult = 0.5 + 0.5 * activity_score;

    let raw = DYNAMIC_BASE_MS as f64 * cold_factor * ws_mult * activity_mult;
    (raw as u64).clamp(min_timeout, max_timeout)
}

/// Runs the periodic scan loop until cancelled.
pub struct IdleController<C> {
    store: Arc<StateStore>,
    supervisor: Arc<Supervisor<C>>,
    config_rx: watch::Receiver<Config>,
    clock: C,
}

impl<C: Clock + 'static> IdleController<C> {
    pub fn new(
        store: Arc<StateStore>,
        supervisor: Arc<Supervisor<C>>,
        config_rx: watch::Receiver<Config>,
        clock: C,
    ) -> Self {
        Self {
            store,
            supervisor,
            config_rx,
            clock,
        }
    }

    /// Spawn the scan loop as a background task, returning a token that
    /// stops it on `cancel()`.
    pub fn spawn(mut self) -> CancellationToken {
        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();
        tokio::spawn(async move {
            loop {
                let scan_interval = self.config_rx.borrow().settings.scan_interval;
                tokio::select! {
                    () = task_cancel.cancelled() => break,
                    () = tokio::time::sleep(Duration::from_millis(scan_interval)) => {
                        self.scan_once().await;
                    }
                }
            }
        });
        cancel
    }

    async fn scan_once(&mut self) {
        let config = self.config_rx.borrow_and_update().clone();
        let now = self.clock.epoch_ms();
        let states = self.store.all_states().await;

        for (name, state) in states {
            if state.status != ProjectStatus::Running {
                continue;
            }
            let Some(project) = config.projects.get(&name) else {
                continue;
            };
            if project.disabled {
                continue;
            }
            if state.websocket_connections > 0 {
                self.store.update_activity(&name, now).await;
                continue;
            }
            let Some(last_activity) = state.last_activity else {
                continue;
            };
            if project.idle_timeout == Some(0) {
                continue;
            }

            let metrics = self.store.metrics_for(&name).await;
            let timeout = effective_timeout(
                project.idle_timeout,
                config.settings.dynamic_timeout,
                config.settings.idle_timeout,
                config.settings.min_timeout,
                config.settings.max_timeout,
                &metrics,
                state.websocket_connections,
                now,
            );

            if now.saturating_sub(last_activity) >= timeout {
                tracing::info!(project = %name, timeout_ms = timeout, "stopping idle project");
                self.supervisor.stop(&name).await;
            }
        }
    }
}

#[cfg(test)]
#[path = "idle_tests.rs"]
mod tests;
