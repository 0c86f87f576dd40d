//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! GET /healthcheck
//!     → aggregate.rs (every mode, not just the requested one)
//!     → providers with the healthcheck capability, concurrently
//!     → "WORKING" or the joined failure messages
//! ```
//!
//! # Design Decisions
//! - One slow provider is bounded by its own timeout and cannot stall the rest
//! - Output order follows mode names so the body is deterministic

pub mod aggregate;

pub use aggregate::{HealthAggregator, HealthReport};
