//! API error types and status classification.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::dispatch::options::OptionsError;
use crate::provider::{Capability, ProviderError};

/// Outcome of a failed dispatch operation.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The requested mode has no registered provider.
    #[error("mode {0:?} not found")]
    ModeNotFound(String),

    /// The resolved provider lacks an optional capability.
    ///
    /// Reported with the same status as `NotFound` so existing callers keep
    /// working, but tracked separately in logs and metrics.
    #[error("mode {mode:?} has no {capability} capabilities")]
    Unsupported { mode: String, capability: Capability },

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::ModeNotFound(_) | ApiError::Unsupported { .. } | ApiError::NotFound(_) => {
                StatusCode::NOT_FOUND
            }
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short label used in metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::ModeNotFound(_) => "mode_not_found",
            ApiError::Unsupported { .. } => "unsupported",
            ApiError::NotFound(_) => "not_found",
            ApiError::Conflict(_) => "conflict",
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Internal(_) => "internal",
        }
    }

    /// Classify any provider failure as `NotFound` except name collisions.
    pub(crate) fn conflict_or_not_found(err: ProviderError) -> Self {
        match err {
            ProviderError::AlreadyExists(_) => ApiError::Conflict(err.to_string()),
            other => ApiError::NotFound(other.to_string()),
        }
    }

    /// Classify any provider failure as `NotFound`.
    pub(crate) fn not_found(err: ProviderError) -> Self {
        ApiError::NotFound(err.to_string())
    }

    /// Name the mode on an `Unsupported` error converted from a provider.
    pub(crate) fn in_mode(self, resolved: &str) -> Self {
        match self {
            ApiError::Unsupported { mode, capability } if mode.is_empty() => {
                ApiError::Unsupported {
                    mode: resolved.to_string(),
                    capability,
                }
            }
            other => other,
        }
    }
}

impl From<ProviderError> for ApiError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::NotFound(_) => ApiError::NotFound(err.to_string()),
            ProviderError::AlreadyExists(_) => ApiError::Conflict(err.to_string()),
            ProviderError::InvalidInput(_) => ApiError::BadRequest(err.to_string()),
            ProviderError::Unsupported(capability) => ApiError::Unsupported {
                mode: String::new(),
                capability,
            },
            ProviderError::Timeout(_) | ProviderError::Backend(_) => {
                ApiError::Internal(err.to_string())
            }
        }
    }
}

impl From<OptionsError> for ApiError {
    fn from(err: OptionsError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::BadRequest(format!("error parsing request: {}", err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, kind = self.kind(), "Request failed");
        } else {
            tracing::debug!(error = %self, kind = self.kind(), "Request rejected");
        }
        (status, self.to_string()).into_response()
    }
}

/// Result type for dispatch operations.
pub type ApiResult<T> = Result<T, ApiError>;
