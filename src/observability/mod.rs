//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! manager / health / checks produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (readiness gauges, failover counters)
//!
//! Consumers:
//!     → Log aggregation (stderr pretty, or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```

pub mod logging;
pub mod metrics;
