//! Symbol relay subsystem.
//!
//! # Data Flow
//! ```text
//! DownloadRequest { filename, key, filename2 }
//!     → handler.rs (build "filename/key/filename2", one upstream GET)
//!     → connector.rs (reqwest client with Basic auth + checksum header)
//!     → 200: buffer body, capture ETag → OutboundResponse::Payload
//!     → otherwise: log diagnostic body → OutboundResponse::Absent
//! ```
//!
//! # Security Constraints
//! - The token is only read from configuration built at startup
//! - The Authorization header is marked sensitive and never logged

pub mod connector;
pub mod handler;
pub mod types;

pub use connector::UpstreamClient;
pub use handler::SymbolRelay;
pub use types::{DownloadRequest, OutboundResponse, RelayError, RelayResult};
