//! Routing control-plane adapter.
//!
//! Serves the orchestrator's router API over HTTP and dispatches every
//! operation to the provider configured for the requested mode.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod provider;

pub use config::schema::RouterConfig;
pub use dispatch::{Dispatcher, ModeRegistry};
pub use error::{ApiError, ApiResult};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
