//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! instrument / navigation / http produce:
//!     → logging.rs (subscriber setup for structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```

pub mod logging;
pub mod metrics;
