// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Kernel listen-table probing: is some socket already bound to this port?
//!
//! Reads `/proc/net/tcp` and `/proc/net/tcp6` directly (the design note in
//! spec §9 calls out replacing a `ss | awk | cut` pipeline with "a direct
//! read of the kernel's TCP listen table") instead of shelling out to an
//! external binary. On platforms without procfs, falls back to a
//! bind-and-close probe per candidate port, which the spec explicitly
//! allows as an alternative.

use std::collections::HashSet;
use std::net::TcpListener;

const PROC_TCP_PATHS: [&str; 2] = ["/proc/net/tcp", "/proc/net/tcp6"];

/// `st` field value for `TCP_LISTEN` in `/proc/net/tcp`.
const TCP_LISTEN_STATE: &str = "0A";

/// Returns the set of local ports with a socket in the `LISTEN` state,
/// according to the kernel's TCP tables. Empty (never an error) if procfs is
/// unavailable — callers fall back to [`probe_bind`] per candidate port.
pub fn listening_ports() -> HashSet<u16> {
    let mut ports = HashSet::new();
    let mut any_read = false;
    for path in PROC_TCP_PATHS {
        if let Ok(contents) = std::fs::read_to_string(path) {
            any_read = true;
            parse_proc_net_tcp(&contents, &mut ports);
        }
    }
    if !any_read {
        tracing::debug!("procfs TCP tables unavailable, falling back to bind probing");
    }
    ports
}

/// Parse the body of `/proc/net/tcp[6]`: a header line followed by rows whose
/// second column is `local_address:port` in hex and whose fourth column is
/// the connection state, also in hex.
fn parse_proc_net_tcp(contents: &str, ports: &mut HashSet<u16>) {
    for line in contents.lines().skip(1) {
        let mut fields = line.split_whitespace();
        let Some(local_address) = fields.nth(1) else {
            continue;
        };
        let Some(state) = fields.nth(1) else {
            continue; // fields.nth(1) here is the 4th column (st): queue (idx2) then st (idx3)
        };
        if !state.eq_ignore_ascii_case(TCP_LISTEN_STATE) {
            continue;
        }
        let Some((_, port_hex)) = local_address.rsplit_once(':') else {
            continue;
        };
        if let Ok(port) = u16::from_str_radix(port_hex, 16) {
            ports.insert(port);
        }
    }
}

/// Fallback probe: attempt to bind `127.0.0.1:port`; if binding succeeds the
/// port was free (the listener is immediately dropped), if it fails some
/// socket already holds it.
pub fn probe_bind(port: u16) -> bool {
    TcpListener::bind(("127.0.0.1", port)).is_ok()
}

#[cfg(test)]
#[path = "kernel_scan_tests.rs"]
mod tests;
