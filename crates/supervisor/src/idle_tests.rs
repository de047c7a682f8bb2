// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use lazydev_core::ProjectMetrics;

fn metrics_with_cold_start(ms: u64) -> ProjectMetrics {
    ProjectMetrics {
        cold_start_time: Some(ms),
        request_history: Default::default(),
    }
}

#[test]
fn uses_per_project_override_regardless_of_dynamic_settings() {
    let t = effective_timeout(
        Some(12_345),
        true,
        600_000,
        120_000,
        1_800_000,
        &ProjectMetrics::default(),
        0,
        1_000_000,
    );
    assert_eq!(t, 12_345);
}

#[test]
fn uses_static_timeout_when_dynamic_is_disabled() {
    let t = effective_timeout(
        None,
        false,
        600_000,
        120_000,
        1_800_000,
        &ProjectMetrics::default(),
        0,
        1_000_000,
    );
    assert_eq!(t, 600_000);
}

#[test]
fn dynamic_timeout_matches_base_for_default_cold_start_and_no_activity() {
    let t = effective_timeout(
        None,
        true,
        600_000,
        120_000,
        1_800_000,
        &ProjectMetrics::default(),
        0,
        1_000_000,
    );
    // cold_factor=1.0, ws_mult=1.0, activity_mult=0.5 -> base * 0.5
    assert_eq!(t, 150_000);
}

#[test]
fn dynamic_timeout_doubles_with_active_websocket_connections() {
    let t = effective_timeout(
        None,
        true,
        600_000,
        120_000,
        1_800_000,
        &ProjectMetrics::default(),
        1,
        1_000_000,
    );
    assert_eq!(t, 300_000);
}

#[test]
fn dynamic_timeout_scales_with_slow_cold_start() {
    let t = effective_timeout(
        None,
        true,
        600_000,
        120_000,
        1_800_000,
        &metrics_with_cold_start(20_000),
        0,
        1_000_000,
    );
    // cold_factor = 20000/5000 = 4.0, activity_mult 0.5 -> base*4*0.5 = 600_000
    assert_eq!(t, 600_000);
}

#[test]
fn dynamic_timeout_clamps_to_min_timeout() {
    let t = effective_timeout(
        None,
        true,
        600_000,
        400_000,
        1_800_000,
        &ProjectMetrics::default(),
        0,
        1_000_000,
    );
    assert_eq!(t, 400_000);
}

#[test]
fn dynamic_timeout_clamps_to_max_timeout() {
    let t = effective_timeout(
        None,
        true,
        600_000,
        120_000,
        1_800_000,
        &metrics_with_cold_start(60_000),
        1,
        1_000_000,
    );
    // cold_factor=12, ws_mult=2, activity_mult=0.5 -> 300_000*12*2*0.5, clamped down to max
    assert_eq!(t, 1_800_000);
}

#[test]
fn dynamic_timeout_rises_with_recent_activity() {
    let now = 1_000_000;
    let mut metrics = ProjectMetrics::default();
    for _ in 0..3 {
        metrics.record_request(now - 10_000);
    }
    let t = effective_timeout(
        None, true, 600_000, 120_000, 1_800_000, &metrics, 0, now,
    );
    // activity_score=1.0 -> activity_mult=1.0 -> base*1.0*1.0*1.0 = 300_000
    assert_eq!(t, 300_000);
}
