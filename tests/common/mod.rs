//! Shared utilities for integration tests.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tower::ServiceExt;

use router_api::config::RouterConfig;
use router_api::dispatch::ModeRegistry;
use router_api::http::{build_router, AppState};

/// Build the full HTTP router over `registry` with default settings.
pub fn app(registry: ModeRegistry) -> Router {
    let config = RouterConfig::default();
    build_router(&config, AppState::new(&config, Arc::new(registry)))
}

/// Send a request through the router and collect the response.
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

pub fn request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    request("GET", uri, "")
}

pub fn options(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
