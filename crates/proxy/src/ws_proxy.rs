// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket bridging between a client-facing `axum` socket and an outbound
//! `tokio-tungstenite` connection to the dev server, per spec §4.E step 4.
//!
//! The bidirectional `tokio::select!` frame pump mirrors the teacher's
//! `attach_proxy::bridge_ws` (`crates/daemon/src/adapters/agent/attach_proxy.rs`),
//! adapted from a raw-byte/WebSocket bridge to a WebSocket/WebSocket one.

use axum::extract::ws::{CloseFrame as AxumCloseFrame, Message as AxumMessage, WebSocket};
use futures_util::{SinkExt, StreamExt};
use lazydev_core::Clock;
use lazydev_storage::StateStore;
use std::sync::Arc;
use tokio_tungstenite::tungstenite::protocol::CloseFrame as TungsteniteCloseFrame;
use tokio_tungstenite::tungstenite::Message as TungsteniteMessage;

fn to_tungstenite(msg: AxumMessage) -> Option<TungsteniteMessage> {
    match msg {
        AxumMessage::Text(text) => Some(TungsteniteMessage::Text(text.to_string().into())),
        AxumMessage::Binary(data) => Some(TungsteniteMessage::Binary(data.to_vec().into())),
        AxumMessage::Ping(data) => Some(TungsteniteMessage::Ping(data.to_vec().into())),
        AxumMessage::Pong(data) => Some(TungsteniteMessage::Pong(data.to_vec().into())),
        AxumMessage::Close(frame) => Some(TungsteniteMessage::Close(frame.map(|f| {
            TungsteniteCloseFrame {
                code: f.code.into(),
                reason: f.reason.to_string().into(),
            }
        }))),
    }
}

fn to_axum(msg: TungsteniteMessage) -> Option<AxumMessage> {
    match msg {
        TungsteniteMessage::Text(text) => Some(AxumMessage::Text(text.to_string().into())),
        TungsteniteMessage::Binary(data) => Some(AxumMessage::Binary(data.to_vec().into())),
        TungsteniteMessage::Ping(data) => Some(AxumMessage::Ping(data.to_vec().into())),
        TungsteniteMessage::Pong(data) => Some(AxumMessage::Pong(data.to_vec().into())),
        TungsteniteMessage::Close(frame) => Some(AxumMessage::Close(frame.map(|f| AxumCloseFrame {
            code: f.code.into(),
            reason: f.reason.to_string().into(),
        }))),
        TungsteniteMessage::Frame(_) => None,
    }
}

/// Dial `ws://localhost:<port><path_and_query>`, accept the already-upgraded
/// `client_ws`, and bridge frames bidirectionally until either side closes
/// or errors. Tracks the websocket-connection counter on `name` for the
/// idle controller's duration of the bridge.
pub async fn bridge<C: Clock>(
    client_ws: WebSocket,
    port: u16,
    path_and_query: &str,
    name: String,
    store: Arc<StateStore>,
    clock: C,
) {
    let target_url = format!("ws://localhost:{port}{path_and_query}");
    let target = match tokio_tungstenite::connect_async(&target_url).await {
        Ok((stream, _)) => stream,
        Err(e) => {
            tracing::warn!(project = %name, port, error = %e, "failed to dial upstream websocket");
            return;
        }
    };

    let (mut target_write, mut target_read) = target.split();
    let (mut client_write, mut client_read) = client_ws.split();

    store.inc_ws(&name, clock.epoch_ms()).await;

    loop {
        tokio::select! {
            client_msg = client_read.next() => {
                match client_msg {
                    Some(Ok(msg)) => {
                        if let Some(forwarded) = to_tungstenite(msg) {
                            if target_write.send(forwarded).await.is_err() {
                                break;
                            }
                        }
                    }
                    _ => break,
                }
            }
            target_msg = target_read.next() => {
                match target_msg {
                    Some(Ok(msg)) => {
                        if let Some(forwarded) = to_axum(msg) {
                            if client_write.send(forwarded).await.is_err() {
                                break;
                            }
                        }
                    }
                    _ => break,
                }
            }
        }
    }

    store.dec_ws(&name, clock.epoch_ms()).await;
    let _ = target_write.close().await;
    let _ = client_write.close().await;
}

#[cfg(test)]
#[path = "ws_proxy_tests.rs"]
mod tests;
