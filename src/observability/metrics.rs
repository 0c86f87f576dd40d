//! Metrics collection and exposition.
//!
//! # Metrics
//! - `router_api_operations_total` (counter): dispatched operations by
//!   operation, mode and outcome (`ok` or an error kind)
//! - `router_api_operation_duration_seconds` (histogram): provider latency
//! - `router_api_provider_healthy` (gauge): 1=healthy, 0=unhealthy, per mode
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed
//!   exporter every call is a no-op, which keeps tests free of globals
//! - Labels are bounded: operations and modes are fixed at startup

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Count one dispatched operation.
pub fn record_operation(operation: &'static str, mode: &str, outcome: &'static str) {
    counter!(
        "router_api_operations_total",
        "operation" => operation,
        "mode" => mode.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

pub fn record_operation_duration(operation: &'static str, mode: &str, started: Instant) {
    histogram!(
        "router_api_operation_duration_seconds",
        "operation" => operation,
        "mode" => mode.to_string()
    )
    .record(started.elapsed().as_secs_f64());
}

/// Publish the latest health check result for `mode`.
pub fn record_provider_health(mode: &str, healthy: bool) {
    gauge!("router_api_provider_healthy", "mode" => mode.to_string())
        .set(if healthy { 1.0 } else { 0.0 });
}
