//! Optional provider capabilities.

use async_trait::async_trait;
use serde::Serialize;
use std::fmt;

use crate::provider::types::{CertData, InstanceId, ProviderResult};
use crate::provider::Provider;

/// An optional operation group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    Tls,
    Cname,
    Healthcheck,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Tls => write!(f, "TLS"),
            Capability::Cname => write!(f, "CNAME"),
            Capability::Healthcheck => write!(f, "healthcheck"),
        }
    }
}

/// Capabilities a provider declared when it was registered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    pub tls: bool,
    pub cname: bool,
    pub healthcheck: bool,
}

impl Capabilities {
    /// Read the typed accessors of a provider.
    pub fn of(provider: &dyn Provider) -> Self {
        Self {
            tls: provider.as_tls().is_some(),
            cname: provider.as_cname().is_some(),
            healthcheck: provider.as_healthcheck().is_some(),
        }
    }

    pub fn supports(&self, capability: Capability) -> bool {
        match capability {
            Capability::Tls => self.tls,
            Capability::Cname => self.cname,
            Capability::Healthcheck => self.healthcheck,
        }
    }
}

/// Certificate management, one slot per (backend, certificate name).
#[async_trait]
pub trait TlsProvider: Send + Sync {
    async fn add_certificate(
        &self,
        id: &InstanceId,
        cert_name: &str,
        cert: CertData,
    ) -> ProviderResult<()>;

    async fn get_certificate(&self, id: &InstanceId, cert_name: &str) -> ProviderResult<CertData>;

    async fn remove_certificate(&self, id: &InstanceId, cert_name: &str) -> ProviderResult<()>;
}

/// Alternate names bound to a backend.
///
/// `set_cname` must fail with `ProviderError::AlreadyExists` when the name is
/// bound to another backend.
#[async_trait]
pub trait CnameProvider: Send + Sync {
    async fn set_cname(&self, id: &InstanceId, cname: &str) -> ProviderResult<()>;

    async fn get_cnames(&self, id: &InstanceId) -> ProviderResult<Vec<String>>;

    async fn unset_cname(&self, id: &InstanceId, cname: &str) -> ProviderResult<()>;
}

#[async_trait]
pub trait HealthcheckProvider: Send + Sync {
    async fn healthcheck(&self) -> ProviderResult<()>;
}
