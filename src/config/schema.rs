//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the router
//! API. All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Root configuration for the router API.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Mode used when a request does not name one.
    pub default_mode: String,

    /// Listener configuration (bind address, body limit).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Health aggregation settings.
    pub health: HealthConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// One provider per mode.
    pub modes: Vec<ModeConfig>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            default_mode: "memory".to_string(),
            listener: ListenerConfig::default(),
            timeouts: TimeoutConfig::default(),
            health: HealthConfig::default(),
            observability: ObservabilityConfig::default(),
            modes: vec![ModeConfig::default()],
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8077").
    pub bind_address: String,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8077".to_string(),
            max_body_bytes: 1024 * 1024,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Whole HTTP request timeout in seconds.
    pub request_secs: u64,

    /// Deadline for each provider call in seconds.
    pub provider_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 30,
            provider_secs: 20,
        }
    }
}

/// Health aggregation configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthConfig {
    /// Per-provider health check timeout in seconds.
    pub check_timeout_secs: u64,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            check_timeout_secs: 5,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default `tracing` filter; `RUST_LOG` takes precedence.
    pub log_filter: String,

    /// Emit JSON log lines instead of the human-readable format.
    pub json_logs: bool,

    /// Expose Prometheus metrics.
    pub metrics_enabled: bool,

    /// Metrics listener address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: "router_api=info,tower_http=info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Provider implementations that can back a mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Memory,
}

/// A named mode and the provider that serves it.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ModeConfig {
    /// Mode name used in `/api/{mode}/...`.
    pub name: String,

    /// Provider implementation.
    pub kind: ProviderKind,

    /// Advertise certificate management.
    pub tls: bool,

    /// Advertise CNAME management.
    pub cname: bool,

    /// Domain appended to generated backend addresses.
    pub address_suffix: String,

    /// Supported option keys; empty descriptions use the global ones.
    pub supported_options: BTreeMap<String, String>,
}

impl Default for ModeConfig {
    fn default() -> Self {
        Self {
            name: "memory".to_string(),
            kind: ProviderKind::Memory,
            tls: true,
            cname: true,
            address_suffix: "router.local".to_string(),
            supported_options: BTreeMap::new(),
        }
    }
}
