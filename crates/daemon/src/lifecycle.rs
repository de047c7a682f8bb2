// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon startup, steady-state wiring, and coordinated shutdown, grounded
//! on the teacher's `lifecycle::startup`/`DaemonState::shutdown` shape
//! (`crates/daemon/src/lifecycle/{startup,mod}.rs`): acquire the PID lock
//! first, open durable state, reconcile what the previous generation left
//! behind, bind the network surface last, then unwind in reverse order on
//! signal.

use crate::error::DaemonError;
use crate::paths::Paths;
use crate::pidfile::PidFile;
use lazydev_core::SystemClock;
use lazydev_ports::PortAllocator;
use lazydev_proxy::{build_router, spawn_routing_sync, ProxyState};
use lazydev_storage::StateStore;
use lazydev_supervisor::{IdleController, Supervisor};
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Base of the shutdown budget spec §4.G / §5 allow: `5s` flat, plus `1s`
/// for every project that was still `running` when the shutdown signal
/// arrived.
const SHUTDOWN_BASE_BUDGET: Duration = Duration::from_secs(5);
const SHUTDOWN_PER_CHILD_BUDGET: Duration = Duration::from_secs(1);

/// Run the daemon to completion: startup, serve until a shutdown signal,
/// then a coordinated teardown. Returns once shutdown has finished; the
/// caller (main) maps `Ok`/`Err` to an exit code.
pub async fn run(paths: Paths) -> Result<(), DaemonError> {
    info!(config = %paths.config_path.display(), state_dir = %paths.state_dir.display(), "starting lazydev daemon");

    std::fs::create_dir_all(&paths.state_dir)?;
    let pid_file = PidFile::acquire(&paths.pid_path)?;

    let config = lazydev_config::load(&paths.config_path)?;
    info!(projects = config.projects.len(), proxy_port = config.settings.proxy_port, "configuration loaded");

    let store = Arc::new(StateStore::open(&paths.state_dir).await?);

    let allocator = Arc::new(PortAllocator::new());
    allocator.initialize_from_state(&store.all_states().await);

    let supervisor = Arc::new(Supervisor::new(store.clone(), allocator.clone(), SystemClock));
    let reconciled = supervisor.reconcile_orphans_on_startup().await;
    info!(
        adopted = reconciled.adopted,
        cleaned = reconciled.cleaned,
        "reconciled processes from the previous daemon generation"
    );

    let (config_watcher, config_rx) = lazydev_config::watch(paths.config_path.clone(), config.clone())?;

    let proxy_state = Arc::new(ProxyState::new(store.clone(), supervisor.clone(), SystemClock, &config));
    let routing_sync = spawn_routing_sync(proxy_state.clone(), config_rx.clone());

    let idle_controller = IdleController::new(store.clone(), supervisor.clone(), config_rx.clone(), SystemClock);
    let idle_cancel = idle_controller.spawn();

    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, config.settings.proxy_port))
        .await
        .map_err(|source| DaemonError::Bind {
            port: config.settings.proxy_port,
            source,
        })?;
    info!(port = config.settings.proxy_port, "proxy listening");

    let router = build_router(proxy_state.clone());
    let proxy_cancel = CancellationToken::new();
    let serve_cancel = proxy_cancel.clone();
    let serve_handle = tokio::spawn(async move {
        let result = axum::serve(listener, router)
            .with_graceful_shutdown(async move { serve_cancel.cancelled().await })
            .await;
        if let Err(e) = result {
            tracing::error!(error = %e, "proxy server exited with an error");
        }
    });

    let start_time = Instant::now();
    crate::signal::wait_for_shutdown().await;
    info!("shutdown signal received, beginning coordinated shutdown");

    shutdown(
        ShutdownHandles {
            config_watcher,
            routing_sync,
            idle_cancel,
            proxy_cancel,
            serve_handle,
            store,
            supervisor,
            pid_file,
        },
        start_time,
    )
    .await;

    Ok(())
}

struct ShutdownHandles {
    config_watcher: lazydev_config::ConfigWatcher,
    routing_sync: tokio::task::JoinHandle<()>,
    idle_cancel: CancellationToken,
    proxy_cancel: CancellationToken,
    serve_handle: tokio::task::JoinHandle<()>,
    store: Arc<StateStore>,
    supervisor: Arc<Supervisor<SystemClock>>,
    pid_file: PidFile,
}

/// Unwind in the reverse order of startup: stop taking new config, stop the
/// idle scanner, stop accepting new proxy connections, then stop every
/// managed/adopted child (graceful-then-kill, concurrently), and only then
/// close the store and drop the PID lock. Per spec §4.G / §5, bounded by
/// `5s + 1s` per project still `running` when the signal arrived.
async fn shutdown(handles: ShutdownHandles, shutdown_start: Instant) {
    let live_children = handles
        .store
        .all_states()
        .await
        .values()
        .filter(|state| state.is_running())
        .count();

    handles.config_watcher.stop();
    handles.routing_sync.abort();
    handles.idle_cancel.cancel();

    handles.proxy_cancel.cancel();
    if let Err(e) = handles.serve_handle.await {
        warn!(error = %e, "proxy server task did not shut down cleanly");
    }

    handles.supervisor.stop_all().await;

    if let Err(e) = handles.store.close().await {
        tracing::error!(error = %e, "failed to close state store cleanly");
    }

    handles.pid_file.release();

    let elapsed = shutdown_start.elapsed();
    let budget = SHUTDOWN_BASE_BUDGET + SHUTDOWN_PER_CHILD_BUDGET * live_children as u32;
    if elapsed > budget {
        warn!(
            elapsed_ms = elapsed.as_millis() as u64,
            budget_ms = budget.as_millis() as u64,
            "shutdown exceeded its budget"
        );
    }
    info!(
        elapsed_ms = elapsed.as_millis() as u64,
        stopped = live_children,
        "daemon shutdown complete"
    );
}
