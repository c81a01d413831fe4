//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! routing, gateway, http layers produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (fmt layer)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every log line of a request and upstream
//! - Metrics are cheap (atomic increments); without an installed
//!   recorder they are no-ops

pub mod logging;
pub mod metrics;
