//! Provider subsystem: the boundary every routing operation ends up at.
//!
//! # Data Flow
//! ```text
//! Dispatcher operation
//!     → Provider (mandatory: create/remove/update/addresses/swap/options)
//!     → capability.rs (optional: TLS, CNAME, healthcheck)
//!     → concrete provider (memory.rs, recording.rs, or an external implementation)
//! ```
//!
//! # Design Decisions
//! - Providers own all backend state; the dispatcher keeps none
//! - Optional capabilities are exposed through typed accessors and
//!   summarised in a `Capabilities` descriptor at registration
//! - Errors are classified by variant, never by message text

pub mod capability;
pub mod memory;
pub mod options;
pub mod recording;
pub mod types;

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::schema::{ModeConfig, ProviderKind};

pub use capability::{Capabilities, Capability, CnameProvider, HealthcheckProvider, TlsProvider};
pub use memory::MemoryProvider;
pub use recording::RecordingProvider;
pub use types::{
    CertData, CnamesResponse, CreateOpts, InstanceId, ProviderError, ProviderResult,
    RoutesExtraData, RoutesRequest,
};

/// A pluggable routing backend.
///
/// Implementations translate each call into primitives of the underlying
/// routing platform. Any mutual exclusion between concurrent calls for the
/// same `InstanceId` is the implementation's responsibility.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Create the backend. Idempotency is up to the provider.
    async fn create(&self, id: &InstanceId, opts: &CreateOpts) -> ProviderResult<()>;

    /// Destroy the backend.
    async fn remove(&self, id: &InstanceId) -> ProviderResult<()>;

    /// Wire the default route set of the backend to `extra_data`.
    async fn update(&self, id: &InstanceId, extra_data: &RoutesExtraData) -> ProviderResult<()>;

    /// Exchange the serving identity of `src` and `dst`.
    async fn swap(&self, src: &InstanceId, dst: &InstanceId) -> ProviderResult<()>;

    /// Public addresses of the backend. An empty list means provisioning is
    /// still in progress.
    async fn get_addresses(&self, id: &InstanceId) -> ProviderResult<Vec<String>>;

    /// Option keys this provider understands, mapped to a description.
    /// An empty description falls back to the global one.
    fn supported_options(&self) -> BTreeMap<String, String>;

    fn as_tls(&self) -> Option<&dyn TlsProvider> {
        None
    }

    fn as_cname(&self) -> Option<&dyn CnameProvider> {
        None
    }

    fn as_healthcheck(&self) -> Option<&dyn HealthcheckProvider> {
        None
    }
}

/// Instantiate the provider configured for a mode.
pub fn build_provider(config: &ModeConfig) -> Arc<dyn Provider> {
    match config.kind {
        ProviderKind::Memory => Arc::new(MemoryProvider::from_config(config)),
    }
}
