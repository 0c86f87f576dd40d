//! Dispatch subsystem: turns routing API operations into provider calls.
//!
//! # Data Flow
//! ```text
//! Request (mode, app name, instance header, body)
//!     → registry.rs (mode → provider, default when empty)
//!     → identity.rs (app name + instance → InstanceId)
//!     → one operation:
//!         backend.rs    (create / update / remove / addresses)
//!         routes.rs     (default prefix only, always-empty listing)
//!         swap.rs       (same instance qualifier, other app)
//!         capability.rs (TLS / CNAME, checked before dispatch)
//!         info.rs       (provider options merged with global descriptions)
//!     → ApiError classification
//! ```
//!
//! # Design Decisions
//! - The dispatcher holds no backend state; providers own it
//! - Every provider call is bounded by a deadline and cancelled with the
//!   request future
//! - No retries; the orchestrator retries

pub mod backend;
pub mod capability;
pub mod identity;
pub mod info;
pub mod options;
pub mod registry;
pub mod routes;
pub mod swap;

#[cfg(test)]
pub(crate) mod testing;

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::ApiResult;
use crate::observability::metrics;
use crate::provider::{ProviderError, ProviderResult};

pub use identity::{resolve_instance, INSTANCE_HEADER};
pub use options::{parse_create_opts, OptionsError, OPTION_HEADER};
pub use registry::{ModeRegistry, RegisteredProvider};

/// Entry point for every mode-qualified operation.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<ModeRegistry>,
    provider_timeout: Duration,
}

impl Dispatcher {
    pub fn new(registry: Arc<ModeRegistry>, provider_timeout: Duration) -> Self {
        Self {
            registry,
            provider_timeout,
        }
    }

    /// Run a provider call under the configured deadline.
    async fn bounded<T, F>(&self, call: F) -> ProviderResult<T>
    where
        F: Future<Output = ProviderResult<T>>,
    {
        match tokio::time::timeout(self.provider_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout(self.provider_timeout)),
        }
    }

    async fn observe<T, F>(&self, operation: &'static str, mode: &str, op: F) -> ApiResult<T>
    where
        F: Future<Output = ApiResult<T>>,
    {
        let started = Instant::now();
        let result = op.await;
        metrics::record_operation_duration(operation, self.metric_mode(mode), started);
        self.finish(operation, mode, result)
    }

    /// Metric label for `mode`; unregistered names collapse into one label.
    fn metric_mode<'a>(&'a self, mode: &'a str) -> &'a str {
        let mode = self.registry.effective_mode(mode);
        if self.registry.resolve(mode).is_ok() {
            mode
        } else {
            "unknown"
        }
    }

    fn finish<T>(&self, operation: &'static str, mode: &str, result: ApiResult<T>) -> ApiResult<T> {
        let result = result.map_err(|err| err.in_mode(self.registry.effective_mode(mode)));
        let mode = self.metric_mode(mode);
        match &result {
            Ok(_) => metrics::record_operation(operation, mode, "ok"),
            Err(err) => {
                tracing::debug!(operation, mode, error = %err, "Operation failed");
                metrics::record_operation(operation, mode, err.kind());
            }
        }
        result
    }
}
