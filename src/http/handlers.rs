//! Route handlers.
//!
//! Each handler decodes its input, delegates to the `Dispatcher` and shapes
//! the response the orchestrator expects. Errors are `ApiError`s.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::dispatch::{parse_create_opts, OPTION_HEADER};
use crate::error::{ApiError, ApiResult};
use crate::http::extract::{RouteParams, Target};
use crate::http::server::AppState;
use crate::provider::{CertData, CnamesResponse, RoutesRequest};

#[derive(Debug, Serialize)]
pub struct BackendResponse {
    /// First address, or empty while none is assigned.
    pub address: String,
    pub addresses: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RoutesResponse {
    pub addresses: Vec<String>,
}

pub async fn get_backend(
    State(state): State<AppState>,
    target: Target,
) -> ApiResult<Json<BackendResponse>> {
    let addresses = state.dispatcher.get_backend(target.mode(), &target.id).await?;
    Ok(Json(BackendResponse {
        address: addresses.first().cloned().unwrap_or_default(),
        addresses,
    }))
}

pub async fn add_backend(
    State(state): State<AppState>,
    target: Target,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<StatusCode> {
    let header_opts = headers
        .get_all(OPTION_HEADER)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(str::to_string)
        .collect();
    let opts = parse_create_opts(header_opts, &body)?;
    state
        .dispatcher
        .add_backend(target.mode(), &target.id, &opts)
        .await?;
    Ok(StatusCode::OK)
}

pub async fn update_backend(State(state): State<AppState>, target: Target) -> ApiResult<StatusCode> {
    state.dispatcher.update_backend(target.mode(), &target.id)?;
    Ok(StatusCode::OK)
}

pub async fn remove_backend(State(state): State<AppState>, target: Target) -> ApiResult<StatusCode> {
    state
        .dispatcher
        .remove_backend(target.mode(), &target.id)
        .await?;
    Ok(StatusCode::OK)
}

pub async fn get_routes(State(state): State<AppState>, target: Target) -> Json<RoutesResponse> {
    Json(RoutesResponse {
        addresses: state.dispatcher.get_routes(target.mode(), &target.id),
    })
}

pub async fn add_routes(
    State(state): State<AppState>,
    target: Target,
    body: Bytes,
) -> ApiResult<StatusCode> {
    let request: RoutesRequest = serde_json::from_slice(&body)?;
    state
        .dispatcher
        .add_routes(target.mode(), &target.id, &request)
        .await?;
    Ok(StatusCode::OK)
}

pub async fn remove_routes(State(state): State<AppState>, target: Target) -> ApiResult<StatusCode> {
    state.dispatcher.remove_routes(target.mode(), &target.id)?;
    Ok(StatusCode::OK)
}

pub async fn swap(
    State(state): State<AppState>,
    target: Target,
    body: Bytes,
) -> ApiResult<StatusCode> {
    let swap_target = parse_swap_target(&body)?;
    state
        .dispatcher
        .swap(target.mode(), &target.id, &swap_target)
        .await?;
    Ok(StatusCode::OK)
}

/// Read the `target` field of a swap body; the key is case-insensitive.
fn parse_swap_target(body: &[u8]) -> ApiResult<String> {
    let fields: Map<String, Value> = serde_json::from_slice(body)?;
    let value = fields
        .into_iter()
        .find(|(key, _)| key.eq_ignore_ascii_case("target"))
        .map(|(_, value)| value);
    match value {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(target)) => Ok(target),
        Some(other) => Err(ApiError::BadRequest(format!(
            "error parsing request: target must be a string, got {}",
            other
        ))),
    }
}

pub async fn info(
    State(state): State<AppState>,
    params: RouteParams,
) -> ApiResult<Json<BTreeMap<String, String>>> {
    Ok(Json(state.dispatcher.info(&params.mode)?))
}

pub async fn add_certificate(
    State(state): State<AppState>,
    target: Target,
    body: Bytes,
) -> ApiResult<StatusCode> {
    let cert: CertData = serde_json::from_slice(&body)?;
    state
        .dispatcher
        .add_certificate(target.mode(), &target.id, &target.params.certname, cert)
        .await?;
    Ok(StatusCode::OK)
}

pub async fn get_certificate(
    State(state): State<AppState>,
    target: Target,
) -> ApiResult<Json<CertData>> {
    let cert = state
        .dispatcher
        .get_certificate(target.mode(), &target.id, &target.params.certname)
        .await?;
    Ok(Json(cert))
}

pub async fn remove_certificate(
    State(state): State<AppState>,
    target: Target,
) -> ApiResult<StatusCode> {
    state
        .dispatcher
        .remove_certificate(target.mode(), &target.id, &target.params.certname)
        .await?;
    Ok(StatusCode::OK)
}

pub async fn set_cname(State(state): State<AppState>, target: Target) -> ApiResult<StatusCode> {
    state
        .dispatcher
        .set_cname(target.mode(), &target.id, &target.params.cname)
        .await?;
    Ok(StatusCode::OK)
}

pub async fn get_cnames(
    State(state): State<AppState>,
    target: Target,
) -> ApiResult<Json<CnamesResponse>> {
    let cnames = state.dispatcher.get_cnames(target.mode(), &target.id).await?;
    Ok(Json(CnamesResponse { cnames }))
}

pub async fn unset_cname(State(state): State<AppState>, target: Target) -> ApiResult<StatusCode> {
    state
        .dispatcher
        .unset_cname(target.mode(), &target.id, &target.params.cname)
        .await?;
    Ok(StatusCode::OK)
}

pub async fn support_tls(State(state): State<AppState>, params: RouteParams) -> ApiResult<Response> {
    Ok(support_response(
        state.dispatcher.support_tls(&params.mode)?,
        "No TLS Capabilities",
    ))
}

pub async fn support_cname(
    State(state): State<AppState>,
    params: RouteParams,
) -> ApiResult<Response> {
    Ok(support_response(
        state.dispatcher.support_cname(&params.mode)?,
        "No CNAME Capabilities",
    ))
}

fn support_response(supported: bool, missing: &'static str) -> Response {
    if supported {
        (StatusCode::OK, "OK").into_response()
    } else {
        (StatusCode::NOT_FOUND, missing).into_response()
    }
}

/// Reserved capability checks; always succeed.
pub async fn support_static() -> StatusCode {
    StatusCode::OK
}

pub async fn healthcheck(State(state): State<AppState>) -> Response {
    let report = state.health.check().await;
    let status = if report.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, report.body()).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swap_target_key_is_case_insensitive() {
        assert_eq!(parse_swap_target(br#"{"Target":"api"}"#).unwrap(), "api");
        assert_eq!(parse_swap_target(br#"{"target":"api"}"#).unwrap(), "api");
        assert_eq!(parse_swap_target(br#"{"other":"x"}"#).unwrap(), "");
    }

    #[test]
    fn malformed_swap_body_is_bad_request() {
        for body in [&b"nope"[..], br#"{"target":3}"#] {
            let err = parse_swap_target(body).unwrap_err();
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        }
    }
}
