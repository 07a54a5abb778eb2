// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::extract::connect_info::MockConnectInfo;
use axum::http::{header, Request};
use axum::Router;
use http_body_util::BodyExt;
use rastreo_server::config::Config;
use rastreo_server::routes::create_router;
use rastreo_server::services::{BroadcastHub, DeviceRegistry, IngestService};
use rastreo_server::time_utils::now_rfc3339;
use rastreo_server::AppState;
use std::net::SocketAddr;
use std::sync::Arc;

/// Peer address injected for all test requests; doubles as the fallback
/// device identity when a report carries no `deviceId`.
#[allow(dead_code)]
pub const TEST_PEER_IP: &str = "127.0.0.1";

/// Create a test app with its own registry and hub.
/// Returns the router and the shared state.
pub fn create_test_app() -> (Router, Arc<AppState>) {
    let config = Config::default();
    let registry = Arc::new(DeviceRegistry::new());
    let hub = BroadcastHub::spawn(registry.clone());
    let ingest = IngestService::new(registry.clone(), hub.clone());

    let state = Arc::new(AppState {
        config,
        registry,
        hub,
        ingest,
        started_at: now_rfc3339(),
    });

    let router = create_router(state.clone())
        .layer(MockConnectInfo(SocketAddr::from(([127, 0, 0, 1], 4242))));
    (router, state)
}

/// Build a JSON request with the Android client's agent string.
#[allow(dead_code)]
pub fn json_request(method: &str, uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::USER_AGENT, "okhttp/4.9.0")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[allow(dead_code)]
pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Collect a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read response body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("Response body was not valid JSON")
}
