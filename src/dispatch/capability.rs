//! Capability negotiation for the optional TLS and CNAME operations.
//!
//! # Design Decisions
//! - The descriptor captured at registration is checked before any
//!   dispatch; a missing capability is `ApiError::Unsupported`, never a panic
//! - Certificate reads and removals report every provider failure as
//!   not found
//! - CNAME binding reports collisions as conflicts and every other failure
//!   as not found

use crate::dispatch::registry::RegisteredProvider;
use crate::dispatch::Dispatcher;
use crate::error::{ApiError, ApiResult};
use crate::provider::{CertData, Capability, CnameProvider, InstanceId, TlsProvider};

fn unsupported(entry: &RegisteredProvider, capability: Capability) -> ApiError {
    ApiError::Unsupported {
        mode: entry.mode().to_string(),
        capability,
    }
}

fn tls(entry: &RegisteredProvider) -> ApiResult<&dyn TlsProvider> {
    if !entry.capabilities().supports(Capability::Tls) {
        return Err(unsupported(entry, Capability::Tls));
    }
    entry
        .provider()
        .as_tls()
        .ok_or_else(|| unsupported(entry, Capability::Tls))
}

fn cname(entry: &RegisteredProvider) -> ApiResult<&dyn CnameProvider> {
    if !entry.capabilities().supports(Capability::Cname) {
        return Err(unsupported(entry, Capability::Cname));
    }
    entry
        .provider()
        .as_cname()
        .ok_or_else(|| unsupported(entry, Capability::Cname))
}

impl Dispatcher {
    /// Whether the resolved provider manages certificates.
    pub fn support_tls(&self, mode: &str) -> ApiResult<bool> {
        let entry = self.registry.resolve(mode)?;
        Ok(entry.capabilities().supports(Capability::Tls))
    }

    /// Whether the resolved provider manages CNAMEs.
    pub fn support_cname(&self, mode: &str) -> ApiResult<bool> {
        let entry = self.registry.resolve(mode)?;
        Ok(entry.capabilities().supports(Capability::Cname))
    }

    pub async fn add_certificate(
        &self,
        mode: &str,
        id: &InstanceId,
        cert_name: &str,
        cert: CertData,
    ) -> ApiResult<()> {
        self.observe("add_certificate", mode, async {
            let entry = self.registry.resolve(mode)?;
            let tls = tls(entry)?;
            tracing::info!(backend = %id, certificate = cert_name, "Adding certificate");
            self.bounded(tls.add_certificate(id, cert_name, cert)).await?;
            Ok::<_, ApiError>(())
        })
        .await
    }

    pub async fn get_certificate(
        &self,
        mode: &str,
        id: &InstanceId,
        cert_name: &str,
    ) -> ApiResult<CertData> {
        self.observe("get_certificate", mode, async {
            let entry = self.registry.resolve(mode)?;
            let tls = tls(entry)?;
            tracing::debug!(backend = %id, certificate = cert_name, "Getting certificate");
            self.bounded(tls.get_certificate(id, cert_name))
                .await
                .map_err(ApiError::not_found)
        })
        .await
    }

    pub async fn remove_certificate(
        &self,
        mode: &str,
        id: &InstanceId,
        cert_name: &str,
    ) -> ApiResult<()> {
        self.observe("remove_certificate", mode, async {
            let entry = self.registry.resolve(mode)?;
            let tls = tls(entry)?;
            tracing::info!(backend = %id, certificate = cert_name, "Removing certificate");
            self.bounded(tls.remove_certificate(id, cert_name))
                .await
                .map_err(ApiError::not_found)
        })
        .await
    }

    pub async fn set_cname(&self, mode: &str, id: &InstanceId, name: &str) -> ApiResult<()> {
        self.observe("set_cname", mode, async {
            let entry = self.registry.resolve(mode)?;
            let cname = cname(entry)?;
            tracing::info!(backend = %id, cname = name, "Adding CNAME");
            self.bounded(cname.set_cname(id, name))
                .await
                .map_err(ApiError::conflict_or_not_found)
        })
        .await
    }

    pub async fn get_cnames(&self, mode: &str, id: &InstanceId) -> ApiResult<Vec<String>> {
        self.observe("get_cnames", mode, async {
            let entry = self.registry.resolve(mode)?;
            let cname = cname(entry)?;
            tracing::debug!(backend = %id, "Getting CNAMEs");
            Ok::<_, ApiError>(self.bounded(cname.get_cnames(id)).await?)
        })
        .await
    }

    pub async fn unset_cname(&self, mode: &str, id: &InstanceId, name: &str) -> ApiResult<()> {
        self.observe("unset_cname", mode, async {
            let entry = self.registry.resolve(mode)?;
            let cname = cname(entry)?;
            tracing::info!(backend = %id, cname = name, "Removing CNAME");
            self.bounded(cname.unset_cname(id, name)).await?;
            Ok::<_, ApiError>(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use crate::dispatch::testing::{dispatcher, RecordingProvider};
    use crate::error::ApiError;
    use crate::provider::{Capability, CertData, InstanceId, ProviderError};
    use std::sync::Arc;

    #[tokio::test]
    async fn missing_tls_is_unsupported_without_calls() {
        let provider = Arc::new(RecordingProvider::default().without_tls());
        let dispatcher = dispatcher(provider.clone());
        let id = InstanceId::app("web");

        assert!(!dispatcher.support_tls("").unwrap());
        let err = dispatcher
            .add_certificate("", &id, "main", CertData::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ApiError::Unsupported { capability: Capability::Tls, .. }
        ));
        assert_eq!(err.status_code(), axum::http::StatusCode::NOT_FOUND);
        assert_eq!(provider.calls("add_certificate"), 0);
    }

    #[tokio::test]
    async fn missing_cname_is_unsupported() {
        let provider = Arc::new(RecordingProvider::default().without_cname());
        let dispatcher = dispatcher(provider.clone());

        assert!(!dispatcher.support_cname("").unwrap());
        assert!(dispatcher.support_tls("").unwrap());
        let err = dispatcher
            .get_cnames("", &InstanceId::app("web"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Unsupported { capability: Capability::Cname, .. }));
    }

    #[tokio::test]
    async fn provider_side_unsupported_names_the_mode() {
        let provider = Arc::new(RecordingProvider::default());
        provider.fail_with(|| ProviderError::Unsupported(Capability::Tls));
        let dispatcher = dispatcher(provider.clone());

        let err = dispatcher
            .add_certificate("", &InstanceId::app("web"), "main", CertData::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "mode \"test\" has no TLS capabilities");
        assert_eq!(provider.calls("add_certificate"), 1);
    }

    #[tokio::test]
    async fn support_fails_for_unknown_mode() {
        let dispatcher = dispatcher(Arc::new(RecordingProvider::default()));
        assert!(matches!(dispatcher.support_tls("nope"), Err(ApiError::ModeNotFound(_))));
    }

    #[tokio::test]
    async fn set_cname_collision_is_conflict() {
        let provider = Arc::new(RecordingProvider::default());
        let dispatcher = dispatcher(provider.clone());
        let id = InstanceId::app("web");

        provider.fail_with(|| ProviderError::AlreadyExists("cname www.example.com".into()));
        let err = dispatcher.set_cname("", &id, "www.example.com").await.unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));

        provider.fail_with(|| ProviderError::Backend("apiserver unreachable".into()));
        let err = dispatcher.set_cname("", &id, "www.example.com").await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
        assert_eq!(provider.calls("set_cname"), 2);
    }

    #[tokio::test]
    async fn certificate_failures_are_not_found() {
        let provider = Arc::new(RecordingProvider::default());
        provider.fail_with(|| ProviderError::Backend("secret lookup failed".into()));
        let dispatcher = dispatcher(provider.clone());
        let id = InstanceId::app("web");

        let err = dispatcher.get_certificate("", &id, "main").await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
        let err = dispatcher.remove_certificate("", &id, "main").await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn cname_listing_passes_through() {
        let provider = Arc::new(RecordingProvider::default());
        let dispatcher = dispatcher(provider.clone());
        let id = InstanceId::app("web");

        dispatcher.set_cname("", &id, "a.example.com").await.unwrap();
        assert_eq!(
            dispatcher.get_cnames("", &id).await.unwrap(),
            vec!["a.example.com".to_string()]
        );
        dispatcher.unset_cname("", &id, "a.example.com").await.unwrap();
        assert!(dispatcher.get_cnames("", &id).await.unwrap().is_empty());
    }
}
