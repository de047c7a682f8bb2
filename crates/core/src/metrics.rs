// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-project metrics: cold-start timing and recent request history.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Maximum number of request timestamps retained per project.
pub const REQUEST_HISTORY_CAP: usize = 20;

/// Cold-start timing and recent request activity for one project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectMetrics {
    /// Duration of the most recent successful cold start, in ms.
    pub cold_start_time: Option<u64>,
    /// Ascending epoch-ms timestamps of the most recent requests, capped at
    /// [`REQUEST_HISTORY_CAP`].
    pub request_history: VecDeque<u64>,
}

impl ProjectMetrics {
    /// Record a request at `now_ms`, trimming to the most recent
    /// [`REQUEST_HISTORY_CAP`] entries.
    pub fn record_request(&mut self, now_ms: u64) {
        self.request_history.push_back(now_ms);
        while self.request_history.len() > REQUEST_HISTORY_CAP {
            self.request_history.pop_front();
        }
    }

    /// Activity score in `{0.0, 0.2, 0.4, 0.6, 0.8, 1.0}` derived from how
    /// many recent requests fall within each of a series of widening windows.
    ///
    /// Walks thresholds from tightest to loosest and returns the first score
    /// for which at least three history timestamps fall within `now - threshold`.
    pub fn activity_score(&self, now_ms: u64) -> f64 {
        const THRESHOLDS_MS: [(u64, f64); 5] = [
            (30_000, 1.0),
            (60_000, 0.8),
            (120_000, 0.6),
            (300_000, 0.4),
            (600_000, 0.2),
        ];
        for (threshold_ms, score) in THRESHOLDS_MS {
            let cutoff = now_ms.saturating_sub(threshold_ms);
            let count = self
                .request_history
                .iter()
                .filter(|&&ts| ts >= cutoff)
                .count();
            if count >= 3 {
                return score;
            }
        }
        0.0
    }
}

#[cfg(test)]
#[path = "metrics_tests.rs"]
mod tests;
