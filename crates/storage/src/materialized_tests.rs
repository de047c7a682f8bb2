// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use lazydev_core::ProjectStatus;

fn set_state_op(name: &str, status: ProjectStatus, port: Option<u16>) -> StoreOp {
    StoreOp::SetState {
        name: name.to_string(),
        status: Some(status),
        port: Some(port),
        pid: None,
        last_activity: None,
        started_at: None,
    }
}

#[test]
fn set_state_preserves_unmentioned_fields() {
    let mut state = MaterializedState::default();
    state.apply(&set_state_op("alpha", ProjectStatus::Starting, Some(4001)));
    state.apply(&StoreOp::SetState {
        name: "alpha".to_string(),
        status: Some(ProjectStatus::Running),
        port: None,
        pid: Some(Some(123)),
        last_activity: None,
        started_at: None,
    });

    let got = state.get_state("alpha").unwrap();
    assert_eq!(got.status, ProjectStatus::Running);
    assert_eq!(got.port, Some(4001));
    assert_eq!(got.pid, Some(123));
}

#[test]
fn update_activity_stamps_and_appends_history() {
    let mut state = MaterializedState::default();
    state.apply(&StoreOp::UpdateActivity {
        name: "alpha".to_string(),
        now_ms: 1000,
    });
    state.apply(&StoreOp::UpdateActivity {
        name: "alpha".to_string(),
        now_ms: 2000,
    });

    let got = state.get_state("alpha").unwrap();
    assert_eq!(got.last_activity, Some(2000));
    assert_eq!(
        state.metrics_for("alpha").request_history,
        vec![1000, 2000]
    );
}

#[test]
fn request_history_trims_to_cap() {
    let mut state = MaterializedState::default();
    for i in 0..30u64 {
        state.apply(&StoreOp::UpdateActivity {
            name: "alpha".to_string(),
            now_ms: i,
        });
    }
    assert_eq!(state.metrics_for("alpha").request_history.len(), 20);
    assert_eq!(state.metrics_for("alpha").request_history[0], 10);
}

#[test]
fn ws_counter_floors_at_zero() {
    let mut state = MaterializedState::default();
    state.apply(&StoreOp::DecWs {
        name: "alpha".to_string(),
        now_ms: 0,
    });
    assert_eq!(state.get_state("alpha").unwrap().websocket_connections, 0);

    state.apply(&StoreOp::IncWs {
        name: "alpha".to_string(),
        now_ms: 0,
    });
    state.apply(&StoreOp::IncWs {
        name: "alpha".to_string(),
        now_ms: 0,
    });
    state.apply(&StoreOp::DecWs {
        name: "alpha".to_string(),
        now_ms: 0,
    });
    state.apply(&StoreOp::DecWs {
        name: "alpha".to_string(),
        now_ms: 0,
    });
    assert_eq!(state.get_state("alpha").unwrap().websocket_connections, 0);
}

#[test]
fn cold_start_time_is_independent_of_state() {
    let mut state = MaterializedState::default();
    state.apply(&StoreOp::SetColdStartTime {
        name: "alpha".to_string(),
        ms: 1200,
    });
    assert_eq!(state.metrics_for("alpha").cold_start_time, Some(1200));
}

#[test]
fn logs_are_retained_in_order_and_pruned() {
    let mut state = MaterializedState::default();
    for i in 0..1500u64 {
        state.apply(&StoreOp::AddLog {
            name: "alpha".to_string(),
            stream: LogStream::Out,
            timestamp_ms: i,
            message: format!("line {i}"),
        });
    }

    let recent = state.recent_logs("alpha", 5);
    assert_eq!(recent.len(), 5);
    assert_eq!(recent.last().unwrap().message, "line 1499");
    assert_eq!(
        state.logs.get("alpha").unwrap().len(),
        LOG_RETENTION_CAP
    );
    // Oldest retained entry should be line 500 (1500 - 1000 cap).
    assert_eq!(state.logs.get("alpha").unwrap().front().unwrap().message, "line 500");
}

#[test]
fn logs_since_is_ascending_and_exclusive() {
    let mut state = MaterializedState::default();
    for i in 0..5u64 {
        state.apply(&StoreOp::AddLog {
            name: "alpha".to_string(),
            stream: LogStream::Err,
            timestamp_ms: i * 10,
            message: format!("line {i}"),
        });
    }

    let since = state.logs_since("alpha", 20);
    assert_eq!(since.len(), 2);
    assert_eq!(since[0].timestamp_ms, 30);
    assert_eq!(since[1].timestamp_ms, 40);
}

#[test]
fn delete_project_removes_state_and_metrics() {
    let mut state = MaterializedState::default();
    state.apply(&set_state_op("alpha", ProjectStatus::Running, Some(4001)));
    state.apply(&StoreOp::SetColdStartTime {
        name: "alpha".to_string(),
        ms: 500,
    });

    state.apply(&StoreOp::DeleteProject {
        name: "alpha".to_string(),
    });

    assert!(state.get_state("alpha").is_none());
    assert_eq!(state.metrics_for("alpha"), lazydev_core::ProjectMetrics::default());
}
