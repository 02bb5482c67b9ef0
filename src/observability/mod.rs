//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Gateway and HTTP layers produce:
//!     → logging.rs (structured log events, request IDs as fields)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout, pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```

pub mod logging;
pub mod metrics;
