// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use lazydev_core::{LogStream, ProjectStatePatch, ProjectStatus};
use tempfile::tempdir;

#[tokio::test]
async fn set_state_and_get_state_round_trip() {
    let dir = tempdir().unwrap();
    let store = StateStore::open(dir.path()).await.unwrap();

    store
        .set_state(
            "alpha",
            ProjectStatePatch::default()
                .status(ProjectStatus::Running)
                .port(Some(4001))
                .pid(Some(123)),
        )
        .await;

    let state = store.get_state("alpha").await.unwrap();
    assert_eq!(state.status, ProjectStatus::Running);
    assert_eq!(state.port, Some(4001));
    assert_eq!(state.pid, Some(123));
}

#[tokio::test]
async fn update_activity_appends_history_and_stamps() {
    let dir = tempdir().unwrap();
    let store = StateStore::open(dir.path()).await.unwrap();

    store.update_activity("alpha", 1000).await;
    store.update_activity("alpha", 2000).await;

    let state = store.get_state("alpha").await.unwrap();
    assert_eq!(state.last_activity, Some(2000));
}

#[tokio::test]
async fn ws_counters_are_atomic_and_floor_at_zero() {
    let dir = tempdir().unwrap();
    let store = StateStore::open(dir.path()).await.unwrap();

    store.dec_ws("alpha", 0).await;
    assert_eq!(store.get_state("alpha").await.unwrap().websocket_connections, 0);

    store.inc_ws("alpha", 0).await;
    store.inc_ws("alpha", 0).await;
    store.dec_ws("alpha", 0).await;
    assert_eq!(store.get_state("alpha").await.unwrap().websocket_connections, 1);
}

#[tokio::test]
async fn add_log_and_recent_logs_round_trip() {
    let dir = tempdir().unwrap();
    let store = StateStore::open(dir.path()).await.unwrap();

    for i in 0..5 {
        store
            .add_log("alpha", LogStream::Out, i, format!("line {i}"))
            .await;
    }

    let logs = store.recent_logs("alpha", 3).await;
    assert_eq!(logs.len(), 3);
    assert_eq!(logs[2].message, "line 4");
}

#[tokio::test]
async fn logs_since_excludes_timestamp_boundary() {
    let dir = tempdir().unwrap();
    let store = StateStore::open(dir.path()).await.unwrap();

    for i in 0..5 {
        store
            .add_log("alpha", LogStream::Err, i * 10, format!("line {i}"))
            .await;
    }

    let logs = store.logs_since("alpha", 20).await;
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0].timestamp_ms, 30);
}

#[tokio::test]
async fn delete_project_removes_all_project_state() {
    let dir = tempdir().unwrap();
    let store = StateStore::open(dir.path()).await.unwrap();

    store
        .set_state("alpha", ProjectStatePatch::default().status(ProjectStatus::Running))
        .await;
    store.set_cold_start_time("alpha", 500).await;
    store.delete_project("alpha").await;

    assert!(store.get_state("alpha").await.is_none());
}

#[tokio::test]
async fn reopen_replays_wal_into_identical_state() {
    let dir = tempdir().unwrap();
    {
        let store = StateStore::open(dir.path()).await.unwrap();
        store
            .set_state(
                "alpha",
                ProjectStatePatch::default().status(ProjectStatus::Running).port(Some(4050)),
            )
            .await;
        store.update_activity("alpha", 42).await;
    }

    let store = StateStore::open(dir.path()).await.unwrap();
    let state = store.get_state("alpha").await.unwrap();
    assert_eq!(state.status, ProjectStatus::Running);
    assert_eq!(state.port, Some(4050));
    assert_eq!(state.last_activity, Some(42));
}

#[tokio::test]
async fn close_checkpoints_and_truncates_wal() {
    let dir = tempdir().unwrap();
    let store = StateStore::open(dir.path()).await.unwrap();

    store
        .set_state("alpha", ProjectStatePatch::default().status(ProjectStatus::Running))
        .await;
    store.close().await.unwrap();

    let wal_len = std::fs::metadata(store.wal_path()).unwrap().len();
    assert_eq!(wal_len, 0);

    // Restart from the fresh snapshot should still see the state.
    let store = StateStore::open(dir.path()).await.unwrap();
    assert_eq!(
        store.get_state("alpha").await.unwrap().status,
        ProjectStatus::Running
    );
}

#[tokio::test]
async fn all_states_reports_every_project() {
    let dir = tempdir().unwrap();
    let store = StateStore::open(dir.path()).await.unwrap();

    store
        .set_state("alpha", ProjectStatePatch::default().status(ProjectStatus::Running))
        .await;
    store
        .set_state("beta", ProjectStatePatch::default().status(ProjectStatus::Stopped))
        .await;

    let all = store.all_states().await;
    assert_eq!(all.len(), 2);
    assert!(all.contains_key("alpha"));
    assert!(all.contains_key("beta"));
}
