//! Route set operations.
//!
//! Only the default (empty) prefix is wired to the provider. Listing always
//! answers with no addresses so the orchestrator re-submits the full route
//! set on every rebuild instead of reconciling incrementally.

use crate::dispatch::Dispatcher;
use crate::error::{ApiError, ApiResult};
use crate::provider::{InstanceId, RoutesRequest};

impl Dispatcher {
    pub async fn add_routes(
        &self,
        mode: &str,
        id: &InstanceId,
        request: &RoutesRequest,
    ) -> ApiResult<()> {
        if !request.prefix.is_empty() {
            tracing::debug!(backend = %id, prefix = %request.prefix, "Ignoring routes for non-default prefix");
            return Ok(());
        }
        self.observe("add_routes", mode, async {
            let entry = self.registry.resolve(mode)?;
            tracing::info!(
                backend = %id,
                mode = entry.mode(),
                namespace = %request.extra_data.namespace,
                service = %request.extra_data.service,
                "Updating default routes"
            );
            self.bounded(entry.provider().update(id, &request.extra_data))
                .await?;
            Ok::<_, ApiError>(())
        })
        .await
    }

    pub fn remove_routes(&self, _mode: &str, _id: &InstanceId) -> ApiResult<()> {
        Ok(())
    }

    pub fn get_routes(&self, _mode: &str, _id: &InstanceId) -> Vec<String> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use crate::dispatch::testing::{dispatcher, RecordingProvider};
    use crate::provider::{InstanceId, RoutesExtraData, RoutesRequest};
    use std::sync::Arc;

    #[tokio::test]
    async fn custom_prefix_is_a_silent_no_op() {
        let provider = Arc::new(RecordingProvider::default());
        let dispatcher = dispatcher(provider.clone());
        let request = RoutesRequest {
            prefix: "custom".into(),
            extra_data: RoutesExtraData::default(),
        };

        dispatcher
            .add_routes("unknown-mode", &InstanceId::app("web"), &request)
            .await
            .unwrap();
        assert_eq!(provider.calls("update"), 0);
    }

    #[tokio::test]
    async fn default_prefix_updates_provider() {
        let provider = Arc::new(RecordingProvider::default());
        let dispatcher = dispatcher(provider.clone());
        let request = RoutesRequest {
            prefix: String::new(),
            extra_data: RoutesExtraData {
                namespace: "apps".into(),
                service: "web-v3".into(),
            },
        };

        dispatcher
            .add_routes("", &InstanceId::app("web"), &request)
            .await
            .unwrap();
        assert_eq!(provider.calls("update"), 1);
        assert_eq!(
            provider.last_update(),
            Some((InstanceId::app("web"), request.extra_data.clone()))
        );
    }

    #[tokio::test]
    async fn get_routes_is_always_empty() {
        let provider = Arc::new(RecordingProvider::default().with_addresses(vec!["10.0.0.1".into()]));
        let dispatcher = dispatcher(provider.clone());
        let id = InstanceId::app("web");

        assert_eq!(dispatcher.get_backend("", &id).await.unwrap(), vec!["10.0.0.1"]);
        assert!(dispatcher.get_routes("", &id).is_empty());
        dispatcher.remove_routes("", &id).unwrap();
        assert_eq!(provider.total_calls(), 1);
    }
}
