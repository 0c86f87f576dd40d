//! Mode registry: mode name → provider.
//!
//! # Design Decisions
//! - Built once at startup, never mutated; shared through `Arc`
//! - Capabilities are captured at registration and checked before dispatch
//! - An empty mode selects the default mode

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::config::schema::RouterConfig;
use crate::error::{ApiError, ApiResult};
use crate::provider::{build_provider, Capabilities, Provider};

/// A provider together with the capabilities it declared.
#[derive(Clone)]
pub struct RegisteredProvider {
    mode: String,
    provider: Arc<dyn Provider>,
    capabilities: Capabilities,
}

impl RegisteredProvider {
    pub fn new(mode: impl Into<String>, provider: Arc<dyn Provider>) -> Self {
        let capabilities = Capabilities::of(provider.as_ref());
        Self {
            mode: mode.into(),
            provider,
            capabilities,
        }
    }

    pub fn mode(&self) -> &str {
        &self.mode
    }

    pub fn provider(&self) -> &dyn Provider {
        self.provider.as_ref()
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }
}

impl fmt::Debug for RegisteredProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredProvider")
            .field("mode", &self.mode)
            .field("capabilities", &self.capabilities)
            .finish()
    }
}

/// Immutable mapping from mode name to provider plus the default mode.
#[derive(Debug, Clone)]
pub struct ModeRegistry {
    default_mode: String,
    providers: BTreeMap<String, RegisteredProvider>,
}

impl ModeRegistry {
    pub fn new(default_mode: impl Into<String>) -> Self {
        Self {
            default_mode: default_mode.into(),
            providers: BTreeMap::new(),
        }
    }

    /// Register `provider` under `mode`, replacing any previous one.
    pub fn with_provider(mut self, mode: impl Into<String>, provider: Arc<dyn Provider>) -> Self {
        let mode = mode.into();
        let registered = RegisteredProvider::new(mode.clone(), provider);
        tracing::debug!(
            mode = %mode,
            tls = registered.capabilities.tls,
            cname = registered.capabilities.cname,
            healthcheck = registered.capabilities.healthcheck,
            "Provider registered"
        );
        self.providers.insert(mode, registered);
        self
    }

    /// Build every configured provider.
    pub fn from_config(config: &RouterConfig) -> Self {
        config
            .modes
            .iter()
            .fold(Self::new(config.default_mode.clone()), |registry, mode| {
                registry.with_provider(mode.name.clone(), build_provider(mode))
            })
    }

    /// Resolve `mode`, substituting the default mode when it is empty.
    pub fn resolve(&self, mode: &str) -> ApiResult<&RegisteredProvider> {
        let name = self.effective_mode(mode);
        self.providers
            .get(name)
            .ok_or_else(|| ApiError::ModeNotFound(name.to_string()))
    }

    /// Mode name a request for `mode` is served by.
    pub fn effective_mode<'a>(&'a self, mode: &'a str) -> &'a str {
        if mode.is_empty() {
            &self.default_mode
        } else {
            mode
        }
    }

    pub fn default_mode(&self) -> &str {
        &self.default_mode
    }

    /// All registered providers ordered by mode name.
    pub fn iter(&self) -> impl Iterator<Item = &RegisteredProvider> {
        self.providers.values()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MemoryProvider;

    fn registry() -> ModeRegistry {
        ModeRegistry::new("ingress")
            .with_provider("ingress", Arc::new(MemoryProvider::new("")))
            .with_provider("lb", Arc::new(MemoryProvider::new("").with_tls(false)))
    }

    #[test]
    fn empty_mode_resolves_to_default() {
        let registry = registry();
        assert_eq!(registry.resolve("").unwrap().mode(), "ingress");
        assert_eq!(registry.resolve("ingress").unwrap().mode(), "ingress");
        assert_eq!(registry.resolve("lb").unwrap().mode(), "lb");
    }

    #[test]
    fn unknown_mode_is_not_found() {
        let err = registry().resolve("nginx").unwrap_err();
        assert!(matches!(err, ApiError::ModeNotFound(ref m) if m == "nginx"));
    }

    #[test]
    fn missing_default_mode_is_not_found() {
        let registry = ModeRegistry::new("absent")
            .with_provider("ingress", Arc::new(MemoryProvider::new("")));
        assert!(matches!(
            registry.resolve(""),
            Err(ApiError::ModeNotFound(ref m)) if m == "absent"
        ));
    }

    #[test]
    fn capabilities_captured_at_registration() {
        let registry = registry();
        assert!(registry.resolve("ingress").unwrap().capabilities().tls);
        assert!(!registry.resolve("lb").unwrap().capabilities().tls);
        assert!(registry.resolve("lb").unwrap().capabilities().cname);
    }

    #[test]
    fn iterates_in_mode_order() {
        let modes: Vec<_> = registry().iter().map(|p| p.mode().to_string()).collect();
        assert_eq!(modes, vec!["ingress", "lb"]);
    }

    #[test]
    fn reports_size_and_default() {
        let registry = registry();
        assert_eq!(registry.len(), 2);
        assert!(!registry.is_empty());
        assert_eq!(registry.default_mode(), "ingress");
        assert!(ModeRegistry::new("ingress").is_empty());
    }
}
