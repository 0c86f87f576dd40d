//! Recording provider for tests and local experiments.
//!
//! Counts every SPI invocation and remembers the last arguments of the
//! mutating calls. Failures and latency can be injected.

use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::provider::capability::{CnameProvider, HealthcheckProvider, TlsProvider};
use crate::provider::types::{
    CertData, CreateOpts, InstanceId, ProviderError, ProviderResult, RoutesExtraData,
};
use crate::provider::Provider;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-memory provider that records how it was called.
#[derive(Debug, Default)]
pub struct RecordingProvider {
    calls: DashMap<&'static str, usize>,
    failure: Mutex<Option<fn() -> ProviderError>>,
    addresses: Vec<String>,
    options: BTreeMap<String, String>,
    without_tls: bool,
    without_cname: bool,
    delay: Option<Duration>,
    created: Mutex<Option<(InstanceId, CreateOpts)>>,
    updated: Mutex<Option<(InstanceId, RoutesExtraData)>>,
    swapped: Mutex<Option<(InstanceId, InstanceId)>>,
    cnames: Mutex<BTreeSet<String>>,
}

impl RecordingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn without_tls(mut self) -> Self {
        self.without_tls = true;
        self
    }

    pub fn without_cname(mut self) -> Self {
        self.without_cname = true;
        self
    }

    pub fn with_addresses(mut self, addresses: Vec<String>) -> Self {
        self.addresses = addresses;
        self
    }

    pub fn with_options(mut self, options: BTreeMap<String, String>) -> Self {
        self.options = options;
        self
    }

    /// Delay every call, health checks included.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Make every following call fail.
    pub fn fail_with(&self, failure: fn() -> ProviderError) {
        *lock(&self.failure) = Some(failure);
    }

    pub fn calls(&self, operation: &str) -> usize {
        self.calls.get(operation).map(|n| *n).unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.iter().map(|entry| *entry.value()).sum()
    }

    pub fn last_created(&self) -> Option<(InstanceId, CreateOpts)> {
        lock(&self.created).clone()
    }

    pub fn last_update(&self) -> Option<(InstanceId, RoutesExtraData)> {
        lock(&self.updated).clone()
    }

    pub fn last_swap(&self) -> Option<(InstanceId, InstanceId)> {
        lock(&self.swapped).clone()
    }

    async fn enter(&self, operation: &'static str) -> ProviderResult<()> {
        *self.calls.entry(operation).or_default() += 1;
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let failure = *lock(&self.failure);
        match failure {
            Some(make) => Err(make()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Provider for RecordingProvider {
    async fn create(&self, id: &InstanceId, opts: &CreateOpts) -> ProviderResult<()> {
        self.enter("create").await?;
        *lock(&self.created) = Some((id.clone(), opts.clone()));
        Ok(())
    }

    async fn remove(&self, _id: &InstanceId) -> ProviderResult<()> {
        self.enter("remove").await
    }

    async fn update(&self, id: &InstanceId, extra_data: &RoutesExtraData) -> ProviderResult<()> {
        self.enter("update").await?;
        *lock(&self.updated) = Some((id.clone(), extra_data.clone()));
        Ok(())
    }

    async fn swap(&self, src: &InstanceId, dst: &InstanceId) -> ProviderResult<()> {
        self.enter("swap").await?;
        *lock(&self.swapped) = Some((src.clone(), dst.clone()));
        Ok(())
    }

    async fn get_addresses(&self, _id: &InstanceId) -> ProviderResult<Vec<String>> {
        self.enter("get_addresses").await?;
        Ok(self.addresses.clone())
    }

    fn supported_options(&self) -> BTreeMap<String, String> {
        self.options.clone()
    }

    fn as_tls(&self) -> Option<&dyn TlsProvider> {
        (!self.without_tls).then_some(self as &dyn TlsProvider)
    }

    fn as_cname(&self) -> Option<&dyn CnameProvider> {
        (!self.without_cname).then_some(self as &dyn CnameProvider)
    }

    fn as_healthcheck(&self) -> Option<&dyn HealthcheckProvider> {
        Some(self as &dyn HealthcheckProvider)
    }
}

#[async_trait]
impl TlsProvider for RecordingProvider {
    async fn add_certificate(
        &self,
        _id: &InstanceId,
        _cert_name: &str,
        _cert: CertData,
    ) -> ProviderResult<()> {
        self.enter("add_certificate").await
    }

    async fn get_certificate(&self, _id: &InstanceId, _cert_name: &str) -> ProviderResult<CertData> {
        self.enter("get_certificate").await?;
        Ok(CertData::default())
    }

    async fn remove_certificate(&self, _id: &InstanceId, _cert_name: &str) -> ProviderResult<()> {
        self.enter("remove_certificate").await
    }
}

#[async_trait]
impl CnameProvider for RecordingProvider {
    async fn set_cname(&self, _id: &InstanceId, cname: &str) -> ProviderResult<()> {
        self.enter("set_cname").await?;
        lock(&self.cnames).insert(cname.to_string());
        Ok(())
    }

    async fn get_cnames(&self, _id: &InstanceId) -> ProviderResult<Vec<String>> {
        self.enter("get_cnames").await?;
        Ok(lock(&self.cnames).iter().cloned().collect())
    }

    async fn unset_cname(&self, _id: &InstanceId, cname: &str) -> ProviderResult<()> {
        self.enter("unset_cname").await?;
        lock(&self.cnames).remove(cname);
        Ok(())
    }
}

#[async_trait]
impl HealthcheckProvider for RecordingProvider {
    async fn healthcheck(&self) -> ProviderResult<()> {
        self.enter("healthcheck").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn counts_calls_and_injects_failures() {
        let provider = RecordingProvider::new();
        let id = InstanceId::app("web");

        provider.create(&id, &CreateOpts::default()).await.unwrap();
        provider.fail_with(|| ProviderError::Backend("down".into()));
        assert!(provider.remove(&id).await.is_err());

        assert_eq!(provider.calls("create"), 1);
        assert_eq!(provider.calls("remove"), 1);
        assert_eq!(provider.total_calls(), 2);
        assert_eq!(provider.last_created().map(|(id, _)| id), Some(id));
    }
}
