//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! built-in defaults
//!     → loader.rs (optional TOML file, token from environment)
//!     → validation.rs (semantic checks)
//!     → RelayConfig (validated, immutable)
//!     → passed by reference into the relay and the server at startup
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup and never reloaded
//! - All fields have defaults to allow minimal configs
//! - The upstream token only ever comes from the environment
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    ListenerConfig, LogFormat, ObservabilityConfig, RelayConfig, SecretToken, TimeoutConfig,
    TransportFailurePolicy, UpstreamConfig,
};
