//! Outbound connector to the upstream symbol server.
//!
//! # Responsibilities
//! - Build one pooled HTTP client per process from `UpstreamConfig`
//! - Inject the Basic authorization and checksum-validation headers
//! - Follow redirects, never keep cookies
//! - Apply the configured connect and request timeouts

use base64::{engine::general_purpose, Engine as _};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::redirect::Policy;
use std::time::Duration;

use crate::config::{SecretToken, UpstreamConfig};
use crate::relay::types::{RelayError, RelayResult};

/// Tells the symbol server the caller can verify checksums itself.
pub const CHECKSUM_VALIDATION_HEADER: HeaderName =
    HeaderName::from_static("symbolchecksumvalidationsupported");

/// `Authorization` value for a personal access token: Basic auth with an
/// empty user name.
pub fn basic_auth_value(token: &SecretToken) -> RelayResult<HeaderValue> {
    let encoded = general_purpose::STANDARD.encode(format!(":{}", token.expose()));
    let mut value = HeaderValue::from_str(&format!("Basic {encoded}"))
        .map_err(|_| RelayError::InvalidToken)?;
    value.set_sensitive(true);
    Ok(value)
}

/// HTTP client bound to a single upstream base URL.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
    base_url: String,
}

impl UpstreamClient {
    /// Build the client. Called once at startup.
    pub fn new(config: &UpstreamConfig) -> RelayResult<Self> {
        let token = config.token.as_ref().ok_or(RelayError::InvalidToken)?;

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, basic_auth_value(token)?);
        headers.insert(CHECKSUM_VALIDATION_HEADER, HeaderValue::from_static("1"));

        // reqwest keeps no cookie store unless asked to.
        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .redirect(Policy::limited(config.max_redirects))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs));
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let client = builder.build().map_err(RelayError::Client)?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    /// Absolute upstream URL for a relative symbol path.
    pub fn url_for(&self, relative_path: &str) -> String {
        format!("{}{}", self.base_url, relative_path)
    }

    /// Issue a GET and return as soon as the response headers are in.
    ///
    /// The body is left unread on the returned response.
    pub async fn get(&self, relative_path: &str) -> RelayResult<reqwest::Response> {
        self.client
            .get(self.url_for(relative_path))
            .send()
            .await
            .map_err(RelayError::Transport)
    }
}
