//! Health aggregation across every configured provider.
//!
//! # Responsibilities
//! - Check each provider that supports health checks, in every mode
//! - Bound each check with a timeout and run them concurrently
//! - Produce the aggregate body the orchestrator expects

use futures_util::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio::time;

use crate::dispatch::ModeRegistry;
use crate::observability::metrics;

/// Body reported when every provider is healthy.
pub const HEALTHY_BODY: &str = "WORKING";

/// Separator between failure messages in the unhealthy body.
pub const FAILURE_SEPARATOR: &str = " - ";

/// Aggregate result of one health round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthReport {
    Healthy,
    /// One message per failing provider, ordered by mode name.
    Unhealthy(Vec<String>),
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthReport::Healthy)
    }

    pub fn body(&self) -> String {
        match self {
            HealthReport::Healthy => HEALTHY_BODY.to_string(),
            HealthReport::Unhealthy(failures) => failures.join(FAILURE_SEPARATOR),
        }
    }
}

/// Fans a health check out to all providers regardless of request mode.
#[derive(Debug, Clone)]
pub struct HealthAggregator {
    registry: Arc<ModeRegistry>,
    check_timeout: Duration,
}

impl HealthAggregator {
    pub fn new(registry: Arc<ModeRegistry>, check_timeout: Duration) -> Self {
        Self {
            registry,
            check_timeout,
        }
    }

    pub async fn check(&self) -> HealthReport {
        let checks = self
            .registry
            .iter()
            .filter(|entry| entry.capabilities().healthcheck)
            .filter_map(|entry| entry.provider().as_healthcheck().map(|hc| (entry.mode(), hc)))
            .map(|(mode, hc)| async move {
                let outcome = match time::timeout(self.check_timeout, hc.healthcheck()).await {
                    Ok(Ok(())) => Ok(()),
                    Ok(Err(e)) => Err(e.to_string()),
                    Err(_) => Err(format!("timed out after {:?}", self.check_timeout)),
                };
                metrics::record_provider_health(mode, outcome.is_ok());
                outcome.map_err(|e| {
                    tracing::warn!(mode = %mode, error = %e, "Provider health check failed");
                    format!("failed to check {}: {}", mode, e)
                })
            });

        let failures: Vec<String> = join_all(checks)
            .await
            .into_iter()
            .filter_map(Result::err)
            .collect();

        if failures.is_empty() {
            HealthReport::Healthy
        } else {
            HealthReport::Unhealthy(failures)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{MemoryProvider, RecordingProvider};

    fn provider(healthy: bool) -> Arc<MemoryProvider> {
        let provider = Arc::new(MemoryProvider::new(""));
        provider.set_healthy(healthy);
        provider
    }

    #[tokio::test]
    async fn all_healthy_reports_fixed_body() {
        let registry = ModeRegistry::new("a")
            .with_provider("a", provider(true))
            .with_provider("b", provider(true));
        let report = HealthAggregator::new(Arc::new(registry), Duration::from_secs(1))
            .check()
            .await;

        assert!(report.is_healthy());
        assert_eq!(report.body(), "WORKING");
    }

    #[tokio::test]
    async fn one_failure_is_named_by_mode() {
        let registry = ModeRegistry::new("a")
            .with_provider("a", provider(true))
            .with_provider("b", provider(false))
            .with_provider("c", provider(true));
        let report = HealthAggregator::new(Arc::new(registry), Duration::from_secs(1))
            .check()
            .await;

        assert!(!report.is_healthy());
        let body = report.body();
        assert_eq!(body.matches("failed to check").count(), 1);
        assert_eq!(body, "failed to check b: memory provider marked unhealthy");
    }

    #[tokio::test]
    async fn failures_are_joined_in_mode_order() {
        let registry = ModeRegistry::new("a")
            .with_provider("z", provider(false))
            .with_provider("a", provider(false));
        let report = HealthAggregator::new(Arc::new(registry), Duration::from_secs(1))
            .check()
            .await;

        assert_eq!(
            report.body(),
            "failed to check a: memory provider marked unhealthy - \
             failed to check z: memory provider marked unhealthy"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn slow_provider_is_bounded_by_its_own_timeout() {
        let slow = Arc::new(RecordingProvider::new().with_delay(Duration::from_secs(60)));
        let fast = Arc::new(RecordingProvider::new());
        let registry = ModeRegistry::new("a")
            .with_provider("a", slow.clone())
            .with_provider("b", provider(false))
            .with_provider("c", fast.clone());

        let started = time::Instant::now();
        let report = HealthAggregator::new(Arc::new(registry), Duration::from_secs(1))
            .check()
            .await;

        assert_eq!(
            report.body(),
            "failed to check a: timed out after 1s - \
             failed to check b: memory provider marked unhealthy"
        );
        assert!(started.elapsed() < Duration::from_secs(2));
        assert_eq!(slow.calls("healthcheck"), 1);
        assert_eq!(fast.calls("healthcheck"), 1);
    }
}
