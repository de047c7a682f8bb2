// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cached health-probe lookups, per spec §4.E: a 2s-TTL cache per port avoids
//! probe storms against a bursty asset load, with exponential backoff
//! (100ms, ×1.5, capped at 1s) while waiting for a stale target to recover.

use lazydev_supervisor::health;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;

const CACHE_TTL: Duration = Duration::from_secs(2);
const RETRY_BUDGET: Duration = Duration::from_secs(5);
const INITIAL_BACKOFF: Duration = Duration::from_millis(100);
const BACKOFF_MULTIPLIER: f64 = 1.5;
const MAX_BACKOFF: Duration = Duration::from_secs(1);

struct CacheEntry {
    healthy: bool,
    checked_at: Instant,
}

/// Per-port cache of the most recent health-probe result.
#[derive(Default)]
pub struct ProbeCache {
    entries: Mutex<HashMap<u16, CacheEntry>>,
}

impl ProbeCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn fresh_cached(&self, port: u16) -> Option<bool> {
        let entries = self.entries.lock();
        entries.get(&port).and_then(|entry| {
            if entry.checked_at.elapsed() < CACHE_TTL {
                Some(entry.healthy)
            } else {
                None
            }
        })
    }

    fn store(&self, port: u16, healthy: bool) {
        self.entries.lock().insert(
            port,
            CacheEntry {
                healthy,
                checked_at: Instant::now(),
            },
        );
    }

    /// Returns whether `port` is healthy, trusting a fresh cached result
    /// before probing, and retrying with backoff for up to 5s total if the
    /// first live probe comes back unhealthy.
    pub async fn is_healthy(&self, client: &reqwest::Client, port: u16) -> bool {
        if let Some(cached) = self.fresh_cached(port) {
            if cached {
                return true;
            }
        }

        let first = health::probe_once(client, port).await;
        self.store(port, first);
        if first {
            return true;
        }

        let deadline = Instant::now() + RETRY_BUDGET;
        let mut backoff = INITIAL_BACKOFF;
        while Instant::now() < deadline {
            tokio::time::sleep(backoff).await;
            let healthy = health::probe_once(client, port).await;
            self.store(port, healthy);
            if healthy {
                return true;
            }
            backoff = backoff.mul_f64(BACKOFF_MULTIPLIER).min(MAX_BACKOFF);
        }
        false
    }
}

#[cfg(test)]
#[path = "probe_cache_tests.rs"]
mod tests;
