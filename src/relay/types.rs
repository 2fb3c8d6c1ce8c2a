//! Request-scoped relay types and error definitions.

use axum::body::Bytes;
use axum::http::HeaderValue;
use serde::Deserialize;
use thiserror::Error;

/// A symbol download request as captured from the inbound path.
///
/// Segments arrive percent-decoded from the router and are used verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DownloadRequest {
    pub filename: String,
    pub key: String,
    pub filename2: String,
}

impl DownloadRequest {
    pub fn new(
        filename: impl Into<String>,
        key: impl Into<String>,
        filename2: impl Into<String>,
    ) -> Self {
        Self {
            filename: filename.into(),
            key: key.into(),
            filename2: filename2.into(),
        }
    }

    /// Path of the artifact relative to the upstream base URL.
    pub fn relative_path(&self) -> String {
        format!("{}/{}/{}", self.filename, self.key, self.filename2)
    }
}

/// What the relay sends back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundResponse {
    /// The artifact bytes, plus the upstream ETag for that exact call.
    Payload {
        bytes: Bytes,
        etag: Option<HeaderValue>,
    },
    /// The upstream did not return the artifact.
    Absent,
}

impl OutboundResponse {
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

/// Errors raised while relaying a download.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The outbound client could not be constructed.
    #[error("failed to build upstream client: {0}")]
    Client(#[source] reqwest::Error),

    /// The token cannot be carried in an HTTP header.
    #[error("upstream token contains characters not allowed in a header")]
    InvalidToken,

    /// Connect, DNS, redirect or timeout failure before headers arrived.
    #[error("upstream request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The connection broke while copying the body.
    #[error("failed to read upstream body: {0}")]
    Body(#[source] reqwest::Error),
}

/// Result type for relay operations.
pub type RelayResult<T> = Result<T, RelayError>;
