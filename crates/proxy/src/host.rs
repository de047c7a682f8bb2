// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `Host` header parsing: extracts the routing label per spec §4.E step 1.

/// Returns the lowercased label before `.localhost` in `host_header`,
/// ignoring any trailing `:<port>`. Returns `""` when `host_header` is bare
/// `localhost` or doesn't end in `.localhost` at all.
pub fn subdomain_label(host_header: &str) -> String {
    let host = host_header.split(':').next().unwrap_or(host_header);
    match host.strip_suffix(".localhost") {
        Some(label) if !label.is_empty() => label.to_ascii_lowercase(),
        _ => String::new(),
    }
}

#[cfg(test)]
#[path = "host_tests.rs"]
mod tests;
