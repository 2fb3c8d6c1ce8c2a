//! Response writing for relayed symbols.
//!
//! # Responsibilities
//! - Write a buffered payload as `application/octet-stream`
//! - Set `Content-Length`, `Accept-Ranges: bytes` and the upstream ETag
//! - Map absence to a bare 404 and transport failures to 502
//!
//! # Design Decisions
//! - `Accept-Ranges: bytes` is advertised because the upstream does, but
//!   range requests are answered with the full body
//! - The ETag is copied as-is; no quoting or weak-tag normalization

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use crate::relay::{OutboundResponse, RelayError};

pub const OCTET_STREAM: &str = "application/octet-stream";

impl IntoResponse for OutboundResponse {
    fn into_response(self) -> Response {
        match self {
            OutboundResponse::Payload { bytes, etag } => {
                let mut response = Response::new(Body::empty());
                let headers = response.headers_mut();
                headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(OCTET_STREAM));
                headers.insert(header::CONTENT_LENGTH, HeaderValue::from(bytes.len()));
                headers.insert(header::ACCEPT_RANGES, HeaderValue::from_static("bytes"));
                if let Some(etag) = etag {
                    headers.insert(header::ETAG, etag);
                }
                *response.body_mut() = Body::from(bytes);
                response
            }
            OutboundResponse::Absent => StatusCode::NOT_FOUND.into_response(),
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
    }
}
