//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Dispatcher / HealthAggregator produce:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (operation counters, provider health gauges)
//!
//! Consumers:
//!     → stdout (pretty or JSON lines)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID is set by middleware and appears in the HTTP trace span
//! - Metric updates are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;

pub use logging::{init_logging, LoggingError};
