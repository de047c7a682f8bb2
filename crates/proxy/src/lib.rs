// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! lazydev-proxy: the reverse proxy front door. Resolves a request's
//! subdomain to a project, cold-starts it on demand, and forwards HTTP and
//! WebSocket traffic to its dev server.

pub mod error;
pub mod host;
pub mod http_proxy;
pub mod probe_cache;
pub mod router;
pub mod state;
pub mod ws_proxy;

pub use error::ProxyError;
pub use host::subdomain_label;
pub use probe_cache::ProbeCache;
pub use router::build_router;
pub use state::{spawn_routing_sync, ProxyState, RoutingCell, RoutingSnapshot};
