// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared proxy state: the atomically-published routing table plus handles
//! to the store and supervisor. Per spec §5, publication of a new routing
//! table must be a single pointer swap — `parking_lot::RwLock<Arc<_>>` gives
//! that without the proxy ever observing a torn view.

use crate::probe_cache::ProbeCache;
use lazydev_core::{Clock, Config, RoutingTable, Settings};
use lazydev_storage::StateStore;
use lazydev_supervisor::Supervisor;
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::watch;

/// Routing table plus the settings snapshot it was built from, published
/// together so a request always sees a consistent pair.
pub struct RoutingSnapshot {
    pub table: RoutingTable,
    pub settings: Settings,
}

/// Holds the current [`RoutingSnapshot`] behind a single swappable pointer.
#[derive(Default)]
pub struct RoutingCell(RwLock<Arc<RoutingSnapshot>>);

impl RoutingCell {
    pub fn new(snapshot: RoutingSnapshot) -> Self {
        Self(RwLock::new(Arc::new(snapshot)))
    }

    pub fn get(&self) -> Arc<RoutingSnapshot> {
        self.0.read().clone()
    }

    pub fn set(&self, snapshot: RoutingSnapshot) {
        *self.0.write() = Arc::new(snapshot);
    }
}

impl Default for RoutingSnapshot {
    fn default() -> Self {
        Self {
            table: RoutingTable::default(),
            settings: Settings::default(),
        }
    }
}

/// Shared application state passed to every proxy handler.
pub struct ProxyState<C> {
    pub routing: RoutingCell,
    pub store: Arc<StateStore>,
    pub supervisor: Arc<Supervisor<C>>,
    pub probe_cache: ProbeCache,
    pub http_client: reqwest::Client,
    pub clock: C,
}

impl<C: Clock + 'static> ProxyState<C> {
    pub fn new(
        store: Arc<StateStore>,
        supervisor: Arc<Supervisor<C>>,
        clock: C,
        initial_config: &Config,
    ) -> Self {
        Self {
            routing: RoutingCell::new(RoutingSnapshot {
                table: RoutingTable::from_config(initial_config),
                settings: initial_config.settings.clone(),
            }),
            store,
            supervisor,
            probe_cache: ProbeCache::new(),
            http_client: lazydev_supervisor::health::build_probe_client(),
            clock,
        }
    }
}

/// Spawn the background task that keeps `routing` in sync with a config
/// watch channel. Runs until the channel's sender is dropped.
pub fn spawn_routing_sync<C>(
    routing: Arc<ProxyState<C>>,
    mut config_rx: watch::Receiver<Config>,
) -> tokio::task::JoinHandle<()>
where
    C: Clock + 'static,
{
    tokio::spawn(async move {
        loop {
            if config_rx.changed().await.is_err() {
                break;
            }
            let config = config_rx.borrow_and_update().clone();
            routing.routing.set(RoutingSnapshot {
                table: RoutingTable::from_config(&config),
                settings: config.settings,
            });
        }
    })
}
