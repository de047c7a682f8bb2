// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Health probing for a cold-starting child: plain HTTP GET, any non-5xx
//! response (or a transport error) decides healthy/unhealthy.
//!
//! Shaped after the teacher's `coop::spawn::wait_for_ready` polling loop
//! (`crates/daemon/src/adapters/agent/coop/spawn.rs`), ported from a
//! Unix-socket readiness check to a TCP one per spec §4.C step 6.

use std::time::Duration;

/// Per-probe timeout: a single GET must resolve (success or failure) within
/// this long before being treated as a transport failure.
const PROBE_TIMEOUT: Duration = Duration::from_secs(1);
/// Interval between probes while waiting for a cold start to become healthy.
pub const PROBE_INTERVAL: Duration = Duration::from_millis(500);

/// Probe `http://localhost:<port>/`. "Healthy" means any response with
/// status `< 500` and no transport error.
pub async fn probe_once(client: &reqwest::Client, port: u16) -> bool {
    let url = format!("http://localhost:{port}/");
    match client.get(&url).timeout(PROBE_TIMEOUT).send().await {
        Ok(response) => response.status().as_u16() < 500,
        Err(_) => false,
    }
}

/// Build the `reqwest::Client` used for all health probes: redirects are
/// never followed automatically, matching spec §4.E's `redirect: manual`.
pub fn build_probe_client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

#[cfg(test)]
#[path = "health_tests.rs"]
mod tests;
