// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Duration grammar: an integer followed by an optional unit suffix.

use std::time::Duration;

/// Error returned when a duration string does not match `^\d+(ms|s|m|h)?$`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid duration {0:?}: expected ^\\d+(ms|s|m|h)?$")]
pub struct InvalidDuration(pub String);

/// Parse a duration string like `"10m"`, `"30s"`, `"250ms"`, `"7"` into milliseconds.
///
/// Absent suffix defaults to milliseconds, unlike most duration grammars in this
/// ecosystem where a bare number defaults to seconds.
pub fn parse_duration_ms(s: &str) -> Result<u64, InvalidDuration> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(InvalidDuration(s.to_string()));
    }

    let (num_str, suffix) = trimmed
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| (&trimmed[..i], &trimmed[i..]))
        .unwrap_or((trimmed, ""));

    if num_str.is_empty() {
        return Err(InvalidDuration(s.to_string()));
    }
    let num: u64 = num_str
        .parse()
        .map_err(|_| InvalidDuration(s.to_string()))?;

    let multiplier_ms: u64 = match suffix {
        "" | "ms" => 1,
        "s" => 1_000,
        "m" => 60_000,
        "h" => 3_600_000,
        _ => return Err(InvalidDuration(s.to_string())),
    };

    num.checked_mul(multiplier_ms)
        .ok_or_else(|| InvalidDuration(s.to_string()))
}

/// Convenience wrapper returning a [`Duration`] instead of a raw millisecond count.
pub fn parse_duration(s: &str) -> Result<Duration, InvalidDuration> {
    parse_duration_ms(s).map(Duration::from_millis)
}

#[cfg(test)]
#[path = "duration_tests.rs"]
mod tests;
