//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Upstream used when no config file overrides it.
pub const DEFAULT_UPSTREAM_BASE_URL: &str =
    "https://artifacts.dev.azure.com/mseng/_apis/symbol/symsrv/";

/// Environment variable holding the upstream access token.
pub const DEFAULT_TOKEN_ENV: &str = "ADO_PAT";

/// Root configuration for the symbol relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Upstream symbol server settings.
    pub upstream: UpstreamConfig,

    /// Inbound timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// What the relay does when the upstream cannot be reached at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TransportFailurePolicy {
    /// Surface the failure to the caller as 502 Bad Gateway.
    #[default]
    Propagate,
    /// Treat an unreachable upstream like a missing symbol (404).
    NotFound,
}

/// Upstream symbol server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL every relative symbol path is appended to. Must end in `/`.
    pub base_url: String,

    /// Name of the environment variable the access token is read from.
    pub token_env: String,

    /// Access token. Never read from or written to the config file.
    #[serde(skip)]
    pub token: Option<SecretToken>,

    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Total upstream request timeout in seconds. `None` keeps the transport default.
    pub request_timeout_secs: Option<u64>,

    /// Maximum number of redirects followed per request.
    pub max_redirects: usize,

    /// Handling of connect, DNS and timeout failures.
    pub on_transport_failure: TransportFailurePolicy,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_UPSTREAM_BASE_URL.to_string(),
            token_env: DEFAULT_TOKEN_ENV.to_string(),
            token: None,
            connect_timeout_secs: 10,
            request_timeout_secs: None,
            max_redirects: 10,
            on_transport_failure: TransportFailurePolicy::default(),
        }
    }
}

/// Upstream access token.
///
/// `Debug` and `Display` are redacted so the token cannot leak through logs.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretToken(String);

impl SecretToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token. Only the connector should call this.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SecretToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretToken(<redacted>)")
    }
}

impl fmt::Display for SecretToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

/// Inbound timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Deadline for a whole inbound request in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        // Symbol files can be hundreds of megabytes.
        Self { request_secs: 300 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_symbol_server() {
        let config = RelayConfig::default();
        assert_eq!(config.upstream.base_url, DEFAULT_UPSTREAM_BASE_URL);
        assert_eq!(config.upstream.token_env, "ADO_PAT");
        assert!(config.upstream.token.is_none());
        assert_eq!(
            config.upstream.on_transport_failure,
            TransportFailurePolicy::Propagate
        );
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
    }

    #[test]
    fn secret_token_is_redacted() {
        let token = SecretToken::new("hunter2");
        assert_eq!(format!("{:?}", token), "SecretToken(<redacted>)");
        assert_eq!(token.to_string(), "<redacted>");
        assert_eq!(token.expose(), "hunter2");
    }

    #[test]
    fn token_is_never_serialized() {
        let mut config = RelayConfig::default();
        config.upstream.token = Some(SecretToken::new("hunter2"));
        let rendered = toml::to_string(&config).unwrap();
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn transport_policy_parses_snake_case() {
        let config: RelayConfig = toml::from_str(
            r#"
            [upstream]
            on_transport_failure = "not_found"
            "#,
        )
        .unwrap();
        assert_eq!(
            config.upstream.on_transport_failure,
            TransportFailurePolicy::NotFound
        );
    }
}
