//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Cache and routing produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging with key/value fields
//! - Request ID flows through the HTTP layer
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
