//! Backend lifecycle operations.

use crate::dispatch::Dispatcher;
use crate::error::{ApiError, ApiResult};
use crate::provider::{CreateOpts, InstanceId};

impl Dispatcher {
    /// Addresses of the backend. An empty list is a valid answer while the
    /// provider is still provisioning; callers poll.
    pub async fn get_backend(&self, mode: &str, id: &InstanceId) -> ApiResult<Vec<String>> {
        self.observe("get_backend", mode, async {
            let entry = self.registry.resolve(mode)?;
            let addresses = self.bounded(entry.provider().get_addresses(id)).await?;
            if addresses.is_empty() {
                tracing::debug!(backend = %id, mode = entry.mode(), "Backend has no addresses yet");
            }
            Ok::<_, ApiError>(addresses)
        })
        .await
    }

    pub async fn add_backend(&self, mode: &str, id: &InstanceId, opts: &CreateOpts) -> ApiResult<()> {
        self.observe("add_backend", mode, async {
            let entry = self.registry.resolve(mode)?;
            tracing::info!(
                backend = %id,
                mode = entry.mode(),
                domain = opts.domain.as_deref().unwrap_or_default(),
                route = %opts.route,
                "Creating backend"
            );
            self.bounded(entry.provider().create(id, opts)).await?;
            Ok::<_, ApiError>(())
        })
        .await
    }

    /// Accepted and ignored; the orchestrator always calls it after create.
    pub fn update_backend(&self, _mode: &str, _id: &InstanceId) -> ApiResult<()> {
        Ok(())
    }

    pub async fn remove_backend(&self, mode: &str, id: &InstanceId) -> ApiResult<()> {
        self.observe("remove_backend", mode, async {
            let entry = self.registry.resolve(mode)?;
            tracing::info!(backend = %id, mode = entry.mode(), "Removing backend");
            self.bounded(entry.provider().remove(id)).await?;
            Ok::<_, ApiError>(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use crate::dispatch::testing::{dispatcher, RecordingProvider};
    use crate::error::ApiError;
    use crate::provider::{CreateOpts, InstanceId, ProviderError};
    use std::sync::Arc;

    #[tokio::test]
    async fn get_backend_with_no_addresses_is_ok() {
        let provider = Arc::new(RecordingProvider::default());
        let dispatcher = dispatcher(provider.clone());

        let addresses = dispatcher.get_backend("", &InstanceId::app("web")).await.unwrap();
        assert!(addresses.is_empty());
        assert_eq!(provider.calls("get_addresses"), 1);
    }

    #[tokio::test]
    async fn add_backend_delegates_options() {
        let provider = Arc::new(RecordingProvider::default());
        let dispatcher = dispatcher(provider.clone());
        let opts = CreateOpts {
            domain: Some("web.example.com".into()),
            route: "/".into(),
            ..Default::default()
        };

        dispatcher
            .add_backend("", &InstanceId::new("web", "blue"), &opts)
            .await
            .unwrap();

        assert_eq!(provider.calls("create"), 1);
        assert_eq!(provider.last_created(), Some((InstanceId::new("web", "blue"), opts)));
    }

    #[tokio::test]
    async fn unknown_mode_never_reaches_provider() {
        let provider = Arc::new(RecordingProvider::default());
        let dispatcher = dispatcher(provider.clone());

        let err = dispatcher
            .remove_backend("nginx", &InstanceId::app("web"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::ModeNotFound(_)));
        assert_eq!(provider.calls("remove"), 0);
    }

    #[tokio::test]
    async fn provider_failures_are_classified() {
        let provider = Arc::new(RecordingProvider::default());
        provider.fail_with(|| ProviderError::NotFound("backend web".into()));
        let dispatcher = dispatcher(provider.clone());

        let err = dispatcher.remove_backend("", &InstanceId::app("web")).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));

        provider.fail_with(|| ProviderError::Backend("apiserver unreachable".into()));
        let err = dispatcher
            .add_backend("", &InstanceId::app("web"), &CreateOpts::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Internal(_)));
    }

    #[tokio::test]
    async fn update_backend_is_a_no_op() {
        let provider = Arc::new(RecordingProvider::default());
        let dispatcher = dispatcher(provider.clone());

        dispatcher.update_backend("nginx", &InstanceId::app("web")).unwrap();
        assert_eq!(provider.total_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_provider_times_out() {
        let provider = Arc::new(RecordingProvider::default().with_delay(std::time::Duration::from_secs(60)));
        let dispatcher = dispatcher(provider.clone());

        let err = dispatcher.get_backend("", &InstanceId::app("web")).await.unwrap_err();
        assert!(matches!(err, ApiError::Internal(ref msg) if msg.contains("timed out")));
    }
}
