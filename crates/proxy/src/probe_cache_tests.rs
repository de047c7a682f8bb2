// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use lazydev_supervisor::health::build_probe_client;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

async fn serve_once(listener: TcpListener, response: &'static str) {
    if let Ok((mut stream, _)) = listener.accept().await {
        let mut buf = [0u8; 1024];
        let _ = stream.read(&mut buf).await;
        let _ = stream.write_all(response.as_bytes()).await;
        let _ = stream.shutdown().await;
    }
}

#[tokio::test]
async fn healthy_result_is_cached_and_reused_without_reprobing() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(serve_once(listener, "HTTP/1.1 200 OK\r\ncontent-length: 0\r\n\r\n"));

    let cache = ProbeCache::new();
    let client = build_probe_client();

    assert!(cache.is_healthy(&client, port).await);
    // The listener above only serves one connection; a second live probe
    // would see connection-refused. A cached true proves no reprobe happened.
    assert!(cache.is_healthy(&client, port).await);
}

#[tokio::test]
async fn unhealthy_result_is_not_cached_as_healthy() {
    let cache = ProbeCache::new();
    let client = build_probe_client();

    // Nothing is bound on this port.
    assert!(cache.fresh_cached(1).is_none());
    let healthy = cache.is_healthy(&client, 1).await;
    assert!(!healthy);
}

#[tokio::test(start_paused = true)]
async fn retry_budget_gives_up_when_target_never_recovers() {
    let cache = ProbeCache::new();
    let client = build_probe_client();

    // Port 1 is never bound in this test process, so every probe — the
    // initial one and every backoff retry — observes connection-refused.
    let healthy = cache.is_healthy(&client, 1).await;
    assert!(!healthy);
}
