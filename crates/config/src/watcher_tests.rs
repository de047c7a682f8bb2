// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::time::Duration;
use tokio::time::timeout;

#[tokio::test]
#[serial_test::serial]
async fn reload_publishes_new_config_on_write() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "settings:\n  proxy_port: 80\n").unwrap();

    let initial = crate::loader::load(&path).unwrap();
    let (handle, mut rx) = watch(path.clone(), initial).unwrap();

    std::fs::write(&path, "settings:\n  proxy_port: 9090\n").unwrap();

    let changed = timeout(Duration::from_secs(5), async {
        loop {
            rx.changed().await.unwrap();
            let config = rx.borrow().clone();
            if config.settings.proxy_port == 9090 {
                return config;
            }
        }
    })
    .await
    .expect("config reload did not arrive in time");

    assert_eq!(changed.settings.proxy_port, 9090);
    handle.stop();
}

#[tokio::test]
#[serial_test::serial]
async fn reload_keeps_previous_config_on_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "settings:\n  proxy_port: 80\n").unwrap();

    let initial = crate::loader::load(&path).unwrap();
    let (handle, rx) = watch(path.clone(), initial).unwrap();

    std::fs::write(&path, "settings: [not a map").unwrap();
    tokio::time::sleep(Duration::from_millis(800)).await;

    assert_eq!(rx.borrow().settings.proxy_port, 80);
    handle.stop();
}
