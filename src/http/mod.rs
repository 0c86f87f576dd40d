//! HTTP binding of the routing API.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, timeout / request ID / trace layers)
//!     → extract.rs (mode, app name, instance header → Target)
//!     → handlers.rs (decode body, call Dispatcher or HealthAggregator)
//!     → ApiError → status + plain-text body
//! ```
//!
//! # Design Decisions
//! - Every route is mounted under `/api` (default mode) and `/api/{mode}`
//! - Handlers decode bodies themselves so malformed JSON maps to 400 with
//!   the same plain-text error shape as every other failure

pub mod extract;
pub mod handlers;
pub mod request;
pub mod server;

pub use extract::{RouteParams, Target};
pub use request::{RequestSpan, UuidRequestId, X_REQUEST_ID};
pub use server::{build_router, AppState, HttpServer};
