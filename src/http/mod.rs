//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, route match)
//!     → request.rs (request ID for tracing)
//!     → relay::SymbolRelay (upstream call)
//!     → response.rs (payload headers or 404)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{MakeRequestUuidV4, X_REQUEST_ID};
pub use server::{AppState, HttpServer, DOWNLOAD_ROUTE};
