// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The single fallback handler implementing spec §4.E end to end: subdomain
//! routing is data-driven (consulted inside the handler against the routing
//! table), not expressed as individual `axum` routes.

use crate::host::subdomain_label;
use crate::{http_proxy, ws_proxy};
use axum::body::Body;
use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::Router;
use lazydev_core::{Clock, ProjectConfig};
use lazydev_supervisor::SupervisorError;
use std::sync::Arc;

use crate::state::ProxyState;

pub fn build_router<C: Clock + 'static>(state: Arc<ProxyState<C>>) -> Router {
    Router::new()
        .fallback(any(fallback::<C>))
        .with_state(state)
}

fn host_header(headers: &HeaderMap) -> &str {
    headers
        .get(axum::http::header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

fn is_websocket_upgrade(headers: &HeaderMap) -> bool {
    let upgrade_is_websocket = headers
        .get(axum::http::header::UPGRADE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.eq_ignore_ascii_case("websocket"))
        .unwrap_or(false);
    let connection_has_upgrade = headers
        .get(axum::http::header::CONNECTION)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_ascii_lowercase().contains("upgrade"))
        .unwrap_or(false);
    upgrade_is_websocket && connection_has_upgrade
}

async fn fallback<C: Clock + 'static>(
    State(state): State<Arc<ProxyState<C>>>,
    req: Request,
) -> Response {
    let (mut parts, body) = req.into_parts();
    let host = host_header(&parts.headers).to_string();
    let label = subdomain_label(&host);

    let snapshot = state.routing.get();
    let Some(project) = snapshot.table.resolve(&label) else {
        return (StatusCode::NOT_FOUND, "Project not found").into_response();
    };
    let name = project.name.as_str().to_string();

    if is_websocket_upgrade(&parts.headers) {
        let upgrade = match WebSocketUpgrade::from_request_parts(&mut parts, &state).await {
            Ok(upgrade) => upgrade,
            Err(rejection) => return rejection.into_response(),
        };
        return handle_websocket(upgrade, state, project, name, &parts.uri).await;
    }

    let req = Request::from_parts(parts, body);
    handle_http(req, state, project, name, &host).await
}

async fn handle_websocket<C: Clock + 'static>(
    upgrade: WebSocketUpgrade,
    state: Arc<ProxyState<C>>,
    project: Arc<ProjectConfig>,
    name: String,
    uri: &axum::http::Uri,
) -> Response {
    let existing = state.store.get_state(&name).await;
    let running_port = existing.filter(|s| s.is_running()).and_then(|s| s.port);

    let port = match running_port {
        Some(port) => port,
        None => match start_project(&state, &project).await {
            Ok(port) => port,
            Err(message) => return (StatusCode::SERVICE_UNAVAILABLE, message).into_response(),
        },
    };

    let path_and_query = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| "/".to_string());
    let store = state.store.clone();
    let clock = state.clock.clone();

    upgrade.on_upgrade(move |socket| async move {
        ws_proxy::bridge(socket, port, &path_and_query, name, store, clock).await
    })
}

async fn handle_http<C: Clock + 'static>(
    req: Request,
    state: Arc<ProxyState<C>>,
    project: Arc<ProjectConfig>,
    name: String,
    original_host: &str,
) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let headers = req.headers().clone();
    let body = req.into_body();

    let existing = state.store.get_state(&name).await;
    let running_port = existing
        .as_ref()
        .filter(|s| s.is_running())
        .and_then(|s| s.port);

    let port = if let Some(port) = running_port {
        if state.probe_cache.is_healthy(&state.http_client, port).await {
            state.store.update_activity(&name, state.clock.epoch_ms()).await;
            port
        } else {
            match start_project(&state, &project).await {
                Ok(port) => port,
                Err(message) => {
                    return (StatusCode::SERVICE_UNAVAILABLE, message).into_response()
                }
            }
        }
    } else {
        match start_project(&state, &project).await {
            Ok(port) => port,
            Err(message) => return (StatusCode::SERVICE_UNAVAILABLE, message).into_response(),
        }
    };

    http_proxy::forward(
        &state.http_client,
        port,
        method,
        &uri,
        &headers,
        Body::new(body),
        original_host,
    )
    .await
}

async fn start_project<C: Clock + 'static>(
    state: &Arc<ProxyState<C>>,
    project: &ProjectConfig,
) -> Result<u16, String> {
    let settings = state.routing.get().settings.clone();
    match state.supervisor.start(project, &settings).await {
        Ok(outcome) => {
            state
                .store
                .update_activity(project.name.as_str(), state.clock.epoch_ms())
                .await;
            Ok(outcome.port)
        }
        Err(err) => Err(failure_message(&err)),
    }
}

fn failure_message(err: &SupervisorError) -> String {
    format!("failed to start dev server: {err}")
}

#[cfg(test)]
#[path = "router_tests.rs"]
mod tests;
