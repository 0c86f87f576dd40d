//! In-process reference provider.
//!
//! # Responsibilities
//! - Keep backends, certificate slots and CNAME bindings in memory
//! - Expose addresses once the default route set is wired
//! - Exchange routing targets on swap
//!
//! # Design Decisions
//! - `DashMap` per table; never hold guards of both tables except
//!   cnames → backends, in that order
//! - Every change of a routing target (update, remove, swap) holds
//!   `routing_lock`, so a swap never overwrites a concurrent update
//! - TLS/CNAME support is switchable to model providers without them

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

use crate::config::schema::ModeConfig;
use crate::provider::capability::{CnameProvider, HealthcheckProvider, TlsProvider};
use crate::provider::types::{
    CertData, CreateOpts, InstanceId, ProviderError, ProviderResult, RoutesExtraData,
};
use crate::provider::Provider;

#[derive(Debug, Clone, Default)]
struct BackendEntry {
    opts: CreateOpts,
    /// Set once the default route set is wired.
    target: Option<RoutesExtraData>,
    certificates: HashMap<String, CertData>,
    cnames: BTreeSet<String>,
}

/// Provider backed by process memory.
#[derive(Debug)]
pub struct MemoryProvider {
    backends: DashMap<InstanceId, BackendEntry>,
    /// cname -> owning backend.
    cnames: DashMap<String, InstanceId>,
    /// Held while routing targets are read and written back.
    routing_lock: Mutex<()>,
    tls_enabled: bool,
    cname_enabled: bool,
    address_suffix: String,
    supported_options: BTreeMap<String, String>,
    healthy: AtomicBool,
}

impl MemoryProvider {
    pub fn new(address_suffix: impl Into<String>) -> Self {
        Self {
            backends: DashMap::new(),
            cnames: DashMap::new(),
            routing_lock: Mutex::new(()),
            tls_enabled: true,
            cname_enabled: true,
            address_suffix: address_suffix.into(),
            supported_options: BTreeMap::new(),
            healthy: AtomicBool::new(true),
        }
    }

    pub fn from_config(config: &ModeConfig) -> Self {
        Self::new(config.address_suffix.clone())
            .with_tls(config.tls)
            .with_cname(config.cname)
            .with_supported_options(config.supported_options.clone())
    }

    pub fn with_tls(mut self, enabled: bool) -> Self {
        self.tls_enabled = enabled;
        self
    }

    pub fn with_cname(mut self, enabled: bool) -> Self {
        self.cname_enabled = enabled;
        self
    }

    pub fn with_supported_options(mut self, options: BTreeMap<String, String>) -> Self {
        self.supported_options = options;
        self
    }

    /// Flip the result of the next health checks.
    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::Relaxed);
    }

    /// Options the backend was last created with.
    pub fn options(&self, id: &InstanceId) -> Option<CreateOpts> {
        self.backends.get(id).map(|entry| entry.opts.clone())
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    fn address_for(&self, id: &InstanceId, target: &RoutesExtraData) -> String {
        let host = if target.service.is_empty() {
            id.app_name.clone()
        } else {
            target.service.clone()
        };
        let mut labels = vec![host];
        if !target.namespace.is_empty() {
            labels.push(target.namespace.clone());
        }
        if !self.address_suffix.is_empty() {
            labels.push(self.address_suffix.clone());
        }
        labels.join(".")
    }

    fn missing(id: &InstanceId) -> ProviderError {
        ProviderError::NotFound(format!("backend {}", id))
    }
}

#[async_trait]
impl Provider for MemoryProvider {
    async fn create(&self, id: &InstanceId, opts: &CreateOpts) -> ProviderResult<()> {
        if id.app_name.is_empty() {
            return Err(ProviderError::InvalidInput("app name is required".into()));
        }
        self.backends
            .entry(id.clone())
            .and_modify(|entry| entry.opts = opts.clone())
            .or_insert_with(|| BackendEntry {
                opts: opts.clone(),
                ..Default::default()
            });
        tracing::debug!(backend = %id, "Backend stored");
        Ok(())
    }

    async fn remove(&self, id: &InstanceId) -> ProviderResult<()> {
        let _guard = self.routing_lock.lock().await;
        let (_, entry) = self.backends.remove(id).ok_or_else(|| Self::missing(id))?;
        for cname in &entry.cnames {
            self.cnames.remove_if(cname, |_, owner| owner == id);
        }
        tracing::debug!(backend = %id, "Backend removed");
        Ok(())
    }

    async fn update(&self, id: &InstanceId, extra_data: &RoutesExtraData) -> ProviderResult<()> {
        let _guard = self.routing_lock.lock().await;
        let mut entry = self.backends.get_mut(id).ok_or_else(|| Self::missing(id))?;
        entry.target = Some(extra_data.clone());
        Ok(())
    }

    async fn swap(&self, src: &InstanceId, dst: &InstanceId) -> ProviderResult<()> {
        if src == dst {
            return Err(ProviderError::InvalidInput(format!(
                "cannot swap {} with itself",
                src
            )));
        }
        let _guard = self.routing_lock.lock().await;

        let src_target = self
            .backends
            .get(src)
            .ok_or_else(|| Self::missing(src))?
            .target
            .clone();
        let dst_target = self
            .backends
            .get(dst)
            .ok_or_else(|| Self::missing(dst))?
            .target
            .clone();

        if let Some(mut entry) = self.backends.get_mut(src) {
            entry.target = dst_target;
        }
        if let Some(mut entry) = self.backends.get_mut(dst) {
            entry.target = src_target;
        }
        tracing::debug!(src = %src, dst = %dst, "Backends swapped");
        Ok(())
    }

    async fn get_addresses(&self, id: &InstanceId) -> ProviderResult<Vec<String>> {
        let entry = self.backends.get(id).ok_or_else(|| Self::missing(id))?;
        Ok(entry
            .target
            .as_ref()
            .map(|target| vec![self.address_for(id, target)])
            .unwrap_or_default())
    }

    fn supported_options(&self) -> BTreeMap<String, String> {
        self.supported_options.clone()
    }

    fn as_tls(&self) -> Option<&dyn TlsProvider> {
        self.tls_enabled.then_some(self as &dyn TlsProvider)
    }

    fn as_cname(&self) -> Option<&dyn CnameProvider> {
        self.cname_enabled.then_some(self as &dyn CnameProvider)
    }

    fn as_healthcheck(&self) -> Option<&dyn HealthcheckProvider> {
        Some(self as &dyn HealthcheckProvider)
    }
}

#[async_trait]
impl TlsProvider for MemoryProvider {
    async fn add_certificate(
        &self,
        id: &InstanceId,
        cert_name: &str,
        cert: CertData,
    ) -> ProviderResult<()> {
        let mut entry = self.backends.get_mut(id).ok_or_else(|| Self::missing(id))?;
        entry.certificates.insert(cert_name.to_string(), cert);
        Ok(())
    }

    async fn get_certificate(&self, id: &InstanceId, cert_name: &str) -> ProviderResult<CertData> {
        let entry = self.backends.get(id).ok_or_else(|| Self::missing(id))?;
        entry
            .certificates
            .get(cert_name)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(format!("certificate {}", cert_name)))
    }

    async fn remove_certificate(&self, id: &InstanceId, cert_name: &str) -> ProviderResult<()> {
        let mut entry = self.backends.get_mut(id).ok_or_else(|| Self::missing(id))?;
        entry
            .certificates
            .remove(cert_name)
            .map(|_| ())
            .ok_or_else(|| ProviderError::NotFound(format!("certificate {}", cert_name)))
    }
}

#[async_trait]
impl CnameProvider for MemoryProvider {
    async fn set_cname(&self, id: &InstanceId, cname: &str) -> ProviderResult<()> {
        if !self.backends.contains_key(id) {
            return Err(Self::missing(id));
        }
        match self.cnames.entry(cname.to_string()) {
            Entry::Occupied(owner) if owner.get() != id => {
                return Err(ProviderError::AlreadyExists(format!(
                    "cname {} bound to {}",
                    cname,
                    owner.get()
                )));
            }
            Entry::Occupied(_) => return Ok(()),
            Entry::Vacant(slot) => {
                let mut entry = self.backends.get_mut(id).ok_or_else(|| Self::missing(id))?;
                entry.cnames.insert(cname.to_string());
                slot.insert(id.clone());
            }
        }
        Ok(())
    }

    async fn get_cnames(&self, id: &InstanceId) -> ProviderResult<Vec<String>> {
        let entry = self.backends.get(id).ok_or_else(|| Self::missing(id))?;
        Ok(entry.cnames.iter().cloned().collect())
    }

    async fn unset_cname(&self, id: &InstanceId, cname: &str) -> ProviderResult<()> {
        if !self.backends.contains_key(id) {
            return Err(Self::missing(id));
        }
        self.cnames
            .remove_if(cname, |_, owner| owner == id)
            .ok_or_else(|| ProviderError::NotFound(format!("cname {}", cname)))?;
        if let Some(mut entry) = self.backends.get_mut(id) {
            entry.cnames.remove(cname);
        }
        Ok(())
    }
}

#[async_trait]
impl HealthcheckProvider for MemoryProvider {
    async fn healthcheck(&self) -> ProviderResult<()> {
        if self.healthy.load(Ordering::Relaxed) {
            Ok(())
        } else {
            Err(ProviderError::Backend("memory provider marked unhealthy".into()))
        }
    }
}
