// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP proxying to a project's dev server, per spec §4.E step 6: rewrite
//! the URL, copy method/headers/body minus hop-by-hop headers, disable
//! redirect following, and add `X-Forwarded-*` headers on the way back.

use axum::body::Body;
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use futures_util::TryStreamExt;

/// Headers that must never be forwarded between hops, per RFC 7230 §6.1 plus
/// `host` (replaced with the upstream's own).
const HOP_BY_HOP: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailers",
    "transfer-encoding",
    "upgrade",
    "host",
];

fn strip_hop_by_hop(headers: &HeaderMap) -> HeaderMap {
    let mut out = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        if !HOP_BY_HOP.contains(&name.as_str()) {
            out.append(name.clone(), value.clone());
        }
    }
    out
}

/// Proxy one HTTP request to `http://localhost:<port><uri>`.
pub async fn forward(
    client: &reqwest::Client,
    port: u16,
    method: Method,
    uri: &Uri,
    headers: &HeaderMap,
    body: Body,
    original_host: &str,
) -> Response {
    let target = format!(
        "http://localhost:{port}{}",
        uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/")
    );

    let reqwest_method = match reqwest::Method::from_bytes(method.as_str().as_bytes()) {
        Ok(m) => m,
        Err(_) => return (StatusCode::BAD_REQUEST, "invalid method").into_response(),
    };

    let body_bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(b) => b,
        Err(_) => return (StatusCode::BAD_GATEWAY, "failed to read request body").into_response(),
    };

    let mut upstream_req = client.request(reqwest_method, &target);
    for (name, value) in strip_hop_by_hop(headers).iter() {
        upstream_req = upstream_req.header(name, value);
    }
    upstream_req = upstream_req
        .header("host", format!("localhost:{port}"))
        .body(body_bytes);

    let upstream_resp = match upstream_req.send().await {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(port, error = %e, "upstream request failed");
            return (StatusCode::BAD_GATEWAY, "upstream request failed").into_response();
        }
    };

    let status = upstream_resp.status();
    let mut response_headers = HeaderMap::with_capacity(upstream_resp.headers().len() + 2);
    for (name, value) in upstream_resp.headers() {
        if !HOP_BY_HOP.contains(&name.as_str()) {
            response_headers.append(name.clone(), value.clone());
        }
    }
    if let Ok(value) = HeaderValue::from_str(original_host) {
        response_headers.insert(HeaderName::from_static("x-forwarded-host"), value);
    }
    response_headers.insert(
        HeaderName::from_static("x-forwarded-proto"),
        HeaderValue::from_static("http"),
    );

    let stream = upstream_resp
        .bytes_stream()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e));
    let mut builder = Response::builder().status(status);
    for (name, value) in response_headers.iter() {
        builder = builder.header(name, value);
    }
    match builder.body(Body::from_stream(stream)) {
        Ok(response) => response,
        Err(_) => (StatusCode::BAD_GATEWAY, "failed to build response").into_response(),
    }
}

#[cfg(test)]
#[path = "http_proxy_tests.rs"]
mod tests;
