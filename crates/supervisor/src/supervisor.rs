// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The process supervisor: owns every managed child, its log pumps, and the
//! orphan map left over from a previous daemon generation.
//!
//! Grounded on the teacher's `adapters::agent` shape (an `async_trait`-style
//! set of operations over `tokio::process::Command`) and on
//! `lifecycle::reconcile::reconcile_state`'s three-way branch for deciding
//! whether a previous generation's process is still usable.

use crate::child::{self, InterpreterSubstitutions};
use crate::error::SupervisorError;
use crate::health;
use lazydev_core::{Clock, LogStream, ProjectConfig, ProjectStatePatch, ProjectStatus, Settings};
use lazydev_ports::PortAllocator;
use lazydev_storage::StateStore;
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex as AsyncMutex;
use tokio_util::sync::CancellationToken;

/// Result of a successful [`Supervisor::start`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartOutcome {
    pub port: u16,
    pub cold_start_ms: u64,
}

/// Outcome of [`Supervisor::reconcile_orphans_on_startup`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReconcileOutcome {
    pub adopted: usize,
    pub cleaned: usize,
}

/// A child this generation spawned: holds its pid and the cancellation
/// token that stops its two log-pump tasks. The `tokio::process::Child`
/// itself lives inside the reaper task, not here, so dropping a
/// `ManagedChild` never kills the process out from under us.
struct ManagedChild {
    pid: u32,
    log_cancel: CancellationToken,
}

/// Owns the full set of child processes for this daemon generation.
pub struct Supervisor<C> {
    store: Arc<StateStore>,
    allocator: Arc<PortAllocator>,
    clock: C,
    substitutions: InterpreterSubstitutions,
    managed: Mutex<HashMap<String, ManagedChild>>,
    /// pid of a process adopted from a previous generation, keyed by project name.
    orphans: Mutex<HashMap<String, u32>>,
    /// Serializes concurrent `start()` calls for the same project so two
    /// racing cold-start requests don't spawn two children.
    start_locks: AsyncMutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl<C: Clock + 'static> Supervisor<C> {
    pub fn new(store: Arc<StateStore>, allocator: Arc<PortAllocator>, clock: C) -> Self {
        Self {
            store,
            allocator,
            clock,
            substitutions: InterpreterSubstitutions::default(),
            managed: Mutex::new(HashMap::new()),
            orphans: Mutex::new(HashMap::new()),
            start_locks: AsyncMutex::new(HashMap::new()),
        }
    }

    pub fn with_substitutions(mut self, substitutions: InterpreterSubstitutions) -> Self {
        self.substitutions = substitutions;
        self
    }

    async fn lock_for(&self, name: &str) -> Arc<AsyncMutex<()>> {
        let mut locks = self.start_locks.lock().await;
        locks
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }

    /// Spawn (or reuse) `name`'s dev server. See spec §4.C for the full
    /// eight-step contract.
    pub async fn start(
        &self,
        config: &ProjectConfig,
        settings: &Settings,
    ) -> Result<StartOutcome, SupervisorError> {
        let name = config.name.as_str().to_string();
        let per_project_lock = self.lock_for(&name).await;
        let _guard = per_project_lock.lock().await;

        // Step 1: already running with a live pid and a port -> no-op.
        if let Some(state) = self.store.get_state(&name).await {
            if state.status == ProjectStatus::Running {
                if let (Some(pid), Some(port)) = (state.pid, state.port) {
                    if self.is_alive(pid) {
                        return Ok(StartOutcome {
                            port,
                            cold_start_ms: 0,
                        });
                    }
                }
            }
        }

        // Step 2: release any stale port, clear orphan tracking.
        if let Some(state) = self.store.get_state(&name).await {
            if let Some(port) = state.port {
                self.allocator.release(port);
            }
        }
        self.orphans.lock().remove(&name);

        // Step 3: reserve a new port, mark starting.
        let port = self.allocator.find_available(settings.port_range)?;
        let start_attempt = self.clock.epoch_ms();
        self.store
            .set_state(
                &name,
                ProjectStatePatch::default()
                    .status(ProjectStatus::Starting)
                    .port(Some(port))
                    .started_at(Some(start_attempt)),
            )
            .await;

        // Step 4-5: spawn the child and its log pumps.
        let mut command = child::build_command(&config.cwd, &config.start_cmd, port, &self.substitutions);
        let mut spawned = match command.spawn() {
            Ok(c) => c,
            Err(e) => {
                self.allocator.release(port);
                self.store
                    .set_state(
                        &name,
                        ProjectStatePatch::default()
                            .status(ProjectStatus::Stopped)
                            .port(None),
                    )
                    .await;
                return Err(SupervisorError::SpawnFailed { name, source: e });
            }
        };
        let pid = spawned.id().unwrap_or(0);
        let stdout = spawned.stdout.take();
        let stderr = spawned.stderr.take();
        let log_cancel = CancellationToken::new();

        if let Some(stdout) = stdout {
            child::spawn_log_pump(
                stdout,
                name.clone(),
                LogStream::Out,
                self.store.clone(),
                self.clock.clone(),
                log_cancel.clone(),
            );
        }
        if let Some(stderr) = stderr {
            child::spawn_log_pump(
                stderr,
                name.clone(),
                LogStream::Err,
                self.store.clone(),
                self.clock.clone(),
                log_cancel.clone(),
            );
        }
        child::spawn_reaper(name.clone(), spawned);

        self.managed.lock().insert(
            name.clone(),
            ManagedChild {
                pid,
                log_cancel: log_cancel.clone(),
            },
        );

        // Step 6: poll for health.
        let client = health::build_probe_client();
        let deadline = Duration::from_millis(settings.startup_timeout);
        let poll_start = std::time::Instant::now();
        let healthy = loop {
            if health::probe_once(&client, port).await {
                break true;
            }
            if poll_start.elapsed() >= deadline {
                break false;
            }
            tokio::time::sleep(health::PROBE_INTERVAL).await;
        };

        if healthy {
            let cold_start_ms = poll_start.elapsed().as_millis() as u64;
            self.store.set_cold_start_time(&name, cold_start_ms).await;
            let now = self.clock.epoch_ms();
            self.store
                .set_state(
                    &name,
                    ProjectStatePatch::default()
                        .status(ProjectStatus::Running)
                        .pid(Some(pid))
                        .last_activity(Some(now)),
                )
                .await;
            Ok(StartOutcome {
                port,
                cold_start_ms,
            })
        } else {
            // Step 8: timeout.
            log_cancel.cancel();
            self.managed.lock().remove(&name);
            self.kill_pid(pid);
            self.allocator.release(port);
            self.store
                .set_state(
                    &name,
                    ProjectStatePatch::default()
                        .status(ProjectStatus::Stopped)
                        .port(None)
                        .pid(None),
                )
                .await;
            Err(SupervisorError::StartTimeout {
                name,
                timeout_ms: settings.startup_timeout,
            })
        }
    }

    /// Graceful-then-kill stop of one project's dev server.
    pub async fn stop(&self, name: &str) {
        let Some(state) = self.store.get_state(name).await else {
            return;
        };
        if state.status != ProjectStatus::Running {
            return;
        }

        let managed_pid = self.managed.lock().get(name).map(|m| m.pid);
        let orphan_pid = self.orphans.lock().get(name).copied();
        let pid = managed_pid.or(orphan_pid).or(state.pid);

        if let Some(pid) = pid {
            self.graceful_kill(pid).await;
        }

        if let Some(child) = self.managed.lock().remove(name) {
            child.log_cancel.cancel();
        }
        self.orphans.lock().remove(name);

        if let Some(port) = state.port {
            self.allocator.release(port);
        }
        self.store
            .set_state(
                name,
                ProjectStatePatch::default()
                    .status(ProjectStatus::Stopped)
                    .port(None)
                    .pid(None)
                    .last_activity(None),
            )
            .await;
    }

    /// Concurrently stop every managed and adopted-orphan project.
    pub async fn stop_all(&self) {
        let names: Vec<String> = {
            let managed = self.managed.lock();
            let orphans = self.orphans.lock();
            managed.keys().chain(orphans.keys()).cloned().collect()
        };
        let mut dedup: Vec<String> = names;
        dedup.sort();
        dedup.dedup();

        let stops = dedup.iter().map(|name| self.stop(name));
        futures_util::future::join_all(stops).await;
    }

    /// Classify every persisted project against live-process reality at
    /// startup. See spec §4.C for the four-way branch.
    pub async fn reconcile_orphans_on_startup(&self) -> ReconcileOutcome {
        let mut outcome = ReconcileOutcome::default();
        let states = self.store.all_states().await;

        for (name, state) in states {
            match state.status {
                ProjectStatus::Starting => {
                    if let Some(pid) = state.pid {
                        self.kill_pid(pid);
                    }
                    if let Some(port) = state.port {
                        self.allocator.release(port);
                    }
                    self.store
                        .set_state(
                            &name,
                            ProjectStatePatch::default()
                                .status(ProjectStatus::Stopped)
                                .port(None)
                                .pid(None),
                        )
                        .await;
                    outcome.cleaned += 1;
                }
                ProjectStatus::Running => match (state.pid, state.port) {
                    (Some(pid), Some(port)) if self.is_alive(pid) => {
                        self.orphans.lock().insert(name.clone(), pid);
                        self.allocator.mark_used(port);
                        outcome.adopted += 1;
                    }
                    (Some(pid), None) if self.is_alive(pid) => {
                        self.kill_pid(pid);
                        self.store
                            .set_state(
                                &name,
                                ProjectStatePatch::default()
                                    .status(ProjectStatus::Stopped)
                                    .pid(None),
                            )
                            .await;
                        outcome.cleaned += 1;
                    }
                    _ => {
                        if let Some(port) = state.port {
                            self.allocator.release(port);
                        }
                        self.store
                            .set_state(
                                &name,
                                ProjectStatePatch::default()
                                    .status(ProjectStatus::Stopped)
                                    .port(None)
                                    .pid(None),
                            )
                            .await;
                        outcome.cleaned += 1;
                    }
                },
                ProjectStatus::Stopped => {}
            }
        }

        outcome
    }

    /// Signal-0 liveness probe. `EPERM` (owned by another user but alive)
    /// counts as alive; `ESRCH` is the only "definitely dead" answer.
    pub fn is_alive(&self, pid: u32) -> bool {
        is_alive(pid)
    }

    fn kill_pid(&self, pid: u32) {
        let _ = signal::kill(Pid::from_raw(pid as i32), Signal::SIGTERM);
    }

    async fn graceful_kill(&self, pid: u32) {
        let _ = signal::kill(Pid::from_raw(pid as i32), Signal::SIGTERM);

        let poll_start = std::time::Instant::now();
        while poll_start.elapsed() < Duration::from_secs(5) {
            if !is_alive(pid) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        let _ = signal::kill(Pid::from_raw(pid as i32), Signal::SIGKILL);
        let escalate_start = std::time::Instant::now();
        while escalate_start.elapsed() < Duration::from_secs(1) {
            if !is_alive(pid) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    }
}

fn is_alive(pid: u32) -> bool {
    match signal::kill(Pid::from_raw(pid as i32), None) {
        Ok(()) => true,
        Err(nix::errno::Errno::EPERM) => true,
        Err(_) => false,
    }
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
