//! Relay handler: one inbound download, one upstream call.
//!
//! # Responsibilities
//! - Derive the upstream path from the three inbound segments
//! - Issue exactly one GET through the connector (no retries)
//! - Buffer a 200 body in full and capture its ETag verbatim
//! - Collapse every other upstream status into `OutboundResponse::Absent`
//!
//! The upstream response is owned by the `forward` future, so dropping that
//! future (client disconnect, timeout) aborts the call and frees the
//! connection on every exit path.

use axum::http::header::ETAG;
use reqwest::StatusCode;
use std::time::Instant;

use crate::config::{TransportFailurePolicy, UpstreamConfig};
use crate::observability::metrics::{self, Outcome};
use crate::relay::connector::UpstreamClient;
use crate::relay::types::{DownloadRequest, OutboundResponse, RelayError, RelayResult};

/// Upper bound on the buffer reserved up front from a declared `Content-Length`.
/// Larger bodies still arrive in full; the buffer grows as chunks land.
pub const MAX_PREALLOCATION: usize = 8 * 1024 * 1024;

/// Forwards symbol downloads to the configured upstream.
#[derive(Debug, Clone)]
pub struct SymbolRelay {
    client: UpstreamClient,
    on_transport_failure: TransportFailurePolicy,
}

impl SymbolRelay {
    /// Create the relay and its connector from startup configuration.
    pub fn new(config: &UpstreamConfig) -> RelayResult<Self> {
        Ok(Self {
            client: UpstreamClient::new(config)?,
            on_transport_failure: config.on_transport_failure,
        })
    }

    /// Relay one download request.
    ///
    /// Transport failures are returned as errors or turned into
    /// `Absent`, depending on the configured policy.
    pub async fn handle(&self, request: &DownloadRequest) -> RelayResult<OutboundResponse> {
        let start = Instant::now();
        let path = request.relative_path();

        match self.forward(&path).await {
            Ok(response) => {
                let outcome = if response.is_absent() {
                    Outcome::Absent
                } else {
                    Outcome::Payload
                };
                metrics::record_relay(outcome, start);
                Ok(response)
            }
            Err(e) => {
                metrics::record_relay(Outcome::TransportError, start);
                tracing::error!(path = %path, error = %e, "Upstream request failed");
                match self.on_transport_failure {
                    TransportFailurePolicy::Propagate => Err(e),
                    TransportFailurePolicy::NotFound => Ok(OutboundResponse::Absent),
                }
            }
        }
    }

    async fn forward(&self, path: &str) -> RelayResult<OutboundResponse> {
        tracing::debug!(path = %path, "Forwarding symbol request");

        let mut response = self.client.get(path).await?;
        let status = response.status();

        if status != StatusCode::OK {
            let diagnostic = match response.text().await {
                Ok(text) => text,
                Err(e) => format!("<unreadable body: {e}>"),
            };
            tracing::warn!(
                path = %path,
                status = %status,
                body = %diagnostic,
                "Upstream did not return symbol"
            );
            return Ok(OutboundResponse::Absent);
        }

        let declared = response.content_length();
        let etag = response.headers().get(ETAG).cloned();
        if etag.is_none() {
            tracing::warn!(path = %path, "Upstream response has no ETag");
        }

        // A body shorter than its declared length fails the copy with `RelayError::Body`.
        let mut buffer = Vec::with_capacity(preallocation(declared));
        while let Some(chunk) = response.chunk().await.map_err(RelayError::Body)? {
            buffer.extend_from_slice(&chunk);
        }

        metrics::record_payload_size(buffer.len());
        tracing::debug!(path = %path, bytes = buffer.len(), "Symbol buffered");

        Ok(OutboundResponse::Payload {
            bytes: buffer.into(),
            etag,
        })
    }
}

fn preallocation(declared: Option<u64>) -> usize {
    declared.map_or(0, |len| {
        usize::try_from(len).map_or(MAX_PREALLOCATION, |len| len.min(MAX_PREALLOCATION))
    })
}
