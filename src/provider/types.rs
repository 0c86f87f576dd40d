//! Provider-facing domain types and error definitions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

use crate::provider::capability::Capability;

/// Identifies one routable backend.
///
/// `instance_name` is empty for the single default instance of an app.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstanceId {
    pub app_name: String,
    #[serde(default)]
    pub instance_name: String,
}

impl InstanceId {
    pub fn new(app_name: impl Into<String>, instance_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            instance_name: instance_name.into(),
        }
    }

    /// Identity of the default instance of `app_name`.
    pub fn app(app_name: impl Into<String>) -> Self {
        Self::new(app_name, "")
    }

    /// Same instance qualifier, different app.
    pub fn with_app(&self, app_name: impl Into<String>) -> Self {
        Self::new(app_name, self.instance_name.clone())
    }

    pub fn is_default_instance(&self) -> bool {
        self.instance_name.is_empty()
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_default_instance() {
            write!(f, "{}", self.app_name)
        } else {
            write!(f, "{}[{}]", self.app_name, self.instance_name)
        }
    }
}

/// Options a backend is created with.
///
/// `header_opts` is only ever seeded from request headers; every other field
/// comes from the request body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CreateOpts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exposed_port: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    pub route: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain_suffix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain_prefix: Option<String>,
    pub acme: bool,
    pub acme_cname: bool,
    pub additional_opts: BTreeMap<String, String>,
    pub header_opts: Vec<String>,
}

impl CreateOpts {
    /// Returns true when a non-empty domain was requested.
    pub fn has_domain(&self) -> bool {
        self.domain.as_deref().is_some_and(|d| !d.is_empty())
    }
}

/// Opaque routing target handed to the provider when the default route set
/// is (re)wired.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutesExtraData {
    pub namespace: String,
    pub service: String,
}

/// Body of a route-update request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RoutesRequest {
    /// Empty means the default route set.
    pub prefix: String,
    pub extra_data: RoutesExtraData,
}

/// Certificate material stored in a named slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CertData {
    pub certificate: String,
    pub key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CnamesResponse {
    pub cnames: Vec<String>,
}

/// Errors a provider reports back to the dispatcher.
///
/// Variants carry their classification; callers never inspect messages.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Backend, certificate slot or CNAME binding does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// The name is already bound to another backend.
    #[error("{0} already exists")]
    AlreadyExists(String),

    /// The provider rejected its input.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The provider does not implement the capability.
    #[error("{0} capability not supported")]
    Unsupported(Capability),

    /// The provider call exceeded its deadline.
    #[error("provider call timed out after {0:?}")]
    Timeout(Duration),

    /// Any other failure of the underlying routing platform.
    #[error("{0}")]
    Backend(String),
}

/// Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_id_display() {
        assert_eq!(InstanceId::app("web").to_string(), "web");
        assert_eq!(InstanceId::new("web", "blue").to_string(), "web[blue]");
    }

    #[test]
    fn with_app_keeps_instance_qualifier() {
        let src = InstanceId::new("web", "blue");
        let dst = src.with_app("web-next");
        assert_eq!(dst, InstanceId::new("web-next", "blue"));
    }

    #[test]
    fn routes_request_wire_names() {
        let req: RoutesRequest = serde_json::from_str(
            r#"{"prefix":"","extraData":{"namespace":"apps","service":"web-v2"}}"#,
        )
        .unwrap();
        assert_eq!(req.prefix, "");
        assert_eq!(req.extra_data.namespace, "apps");
        assert_eq!(req.extra_data.service, "web-v2");

        let empty: RoutesRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, RoutesRequest::default());
    }

    #[test]
    fn error_display() {
        let err = ProviderError::AlreadyExists("cname www.example.com".into());
        assert_eq!(err.to_string(), "cname www.example.com already exists");

        let err = ProviderError::Unsupported(Capability::Tls);
        assert_eq!(err.to_string(), "TLS capability not supported");
    }
}
