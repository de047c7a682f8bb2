// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// Errors surfaced while proxying a single request, per spec §7.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("project {0:?} not found")]
    UnknownProject(String),
    #[error("failed to start project {name:?}: {source}")]
    StartFailed {
        name: String,
        #[source]
        source: lazydev_supervisor::SupervisorError,
    },
    #[error("upstream request failed: {0}")]
    UpstreamRequest(#[from] reqwest::Error),
    #[error("websocket handshake with upstream failed: {0}")]
    WebSocketHandshake(#[from] tokio_tungstenite::tungstenite::Error),
}
