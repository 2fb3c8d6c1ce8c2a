//! Metrics collection and exposition.
//!
//! # Metrics
//! - `symbol_relay_requests_total` (counter): relayed downloads by outcome
//! - `symbol_relay_upstream_duration_seconds` (histogram): upstream call + body copy
//! - `symbol_relay_payload_bytes` (histogram): size of buffered symbol files
//!
//! Without `init_metrics` no recorder is installed and every call is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// How a relayed download ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Payload,
    Absent,
    TransportError,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Payload => "payload",
            Outcome::Absent => "absent",
            Outcome::TransportError => "transport_error",
        }
    }
}

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    let builder = PrometheusBuilder::new().with_http_listener(addr);
    match builder.install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install Prometheus recorder"),
    }
}

/// Record one relayed download.
pub fn record_relay(outcome: Outcome, start: Instant) {
    counter!("symbol_relay_requests_total", "outcome" => outcome.as_str()).increment(1);
    histogram!("symbol_relay_upstream_duration_seconds", "outcome" => outcome.as_str())
        .record(start.elapsed().as_secs_f64());
}

/// Record the size of a buffered payload.
pub fn record_payload_size(bytes: usize) {
    histogram!("symbol_relay_payload_bytes").record(bytes as f64);
}
