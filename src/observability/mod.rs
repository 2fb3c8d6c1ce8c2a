//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Relay and HTTP layers produce:
//!     → logging.rs (structured log events, request-id spans)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout, pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape, opt-in)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every span via tower-http
//! - The upstream token never reaches a log field

pub mod logging;
pub mod metrics;
