//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the upstream base URL can have relative symbol paths appended
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Require the access token to be present
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RelayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::schema::RelayConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("upstream.base_url '{0}' is not an absolute URL")]
    InvalidBaseUrl(String),

    #[error("upstream.base_url '{0}' must use http or https")]
    UnsupportedScheme(String),

    #[error("upstream.base_url '{0}' must end with '/'")]
    MissingTrailingSlash(String),

    #[error("upstream token is missing; set the {0} environment variable")]
    MissingToken(String),

    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("{field} '{value}' is not a valid socket address")]
    InvalidAddress { field: &'static str, value: String },
}

/// Validate a fully loaded configuration.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let upstream = &config.upstream;

    match Url::parse(&upstream.base_url) {
        Ok(url) => {
            if url.scheme() != "http" && url.scheme() != "https" {
                errors.push(ValidationError::UnsupportedScheme(upstream.base_url.clone()));
            }
            if !upstream.base_url.ends_with('/') {
                errors.push(ValidationError::MissingTrailingSlash(upstream.base_url.clone()));
            }
        }
        Err(_) => errors.push(ValidationError::InvalidBaseUrl(upstream.base_url.clone())),
    }

    if upstream.token.as_ref().map_or(true, |t| t.is_empty()) {
        errors.push(ValidationError::MissingToken(upstream.token_env.clone()));
    }

    if upstream.connect_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("upstream.connect_timeout_secs"));
    }
    if upstream.request_timeout_secs == Some(0) {
        errors.push(ValidationError::ZeroTimeout("upstream.request_timeout_secs"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("timeouts.request_secs"));
    }

    check_address(&mut errors, "listener.bind_address", &config.listener.bind_address);
    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::SecretToken;

    fn valid_config() -> RelayConfig {
        let mut config = RelayConfig::default();
        config.upstream.token = Some(SecretToken::new("pat"));
        config
    }

    #[test]
    fn default_config_with_token_is_valid() {
        assert_eq!(validate_config(&valid_config()), Ok(()));
    }

    #[test]
    fn missing_token_names_the_variable() {
        let mut config = valid_config();
        config.upstream.token = None;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::MissingToken("ADO_PAT".into())]);

        config.upstream.token = Some(SecretToken::new(""));
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn base_url_must_be_appendable() {
        let mut config = valid_config();
        config.upstream.base_url = "https://symbols.example.com/symsrv".into();
        assert_eq!(
            validate_config(&config).unwrap_err(),
            vec![ValidationError::MissingTrailingSlash(
                "https://symbols.example.com/symsrv".into()
            )]
        );

        config.upstream.base_url = "ftp://symbols.example.com/".into();
        assert_eq!(
            validate_config(&config).unwrap_err(),
            vec![ValidationError::UnsupportedScheme("ftp://symbols.example.com/".into())]
        );

        config.upstream.base_url = "not a url/".into();
        assert_eq!(
            validate_config(&config).unwrap_err(),
            vec![ValidationError::InvalidBaseUrl("not a url/".into())]
        );
    }

    #[test]
    fn collects_every_error() {
        let mut config = RelayConfig::default();
        config.upstream.connect_timeout_secs = 0;
        config.timeouts.request_secs = 0;
        config.listener.bind_address = "localhost".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::ZeroTimeout("timeouts.request_secs")));
    }

    #[test]
    fn metrics_address_checked_only_when_enabled() {
        let mut config = valid_config();
        config.observability.metrics_address = "nowhere".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert!(validate_config(&config).is_err());
    }
}
