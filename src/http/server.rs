//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with the symbol download route
//! - Wire up middleware (request ID, tracing, timeout)
//! - Bind server to listener
//! - Hand requests to the relay and write its outcome

use axum::{
    body::Body,
    extract::{Path, State},
    http::{Request, StatusCode},
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::RelayConfig;
use crate::http::request::{request_id_of, MakeRequestUuidV4, X_REQUEST_ID};
use crate::relay::{DownloadRequest, OutboundResponse, RelayError, RelayResult, SymbolRelay};

/// Inbound route for symbol downloads.
pub const DOWNLOAD_ROUTE: &str = "/api/symbols/download/{filename}/{key}/{filename2}";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<SymbolRelay>,
}

/// HTTP server for the symbol relay.
pub struct HttpServer {
    router: Router,
    config: RelayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: RelayConfig) -> RelayResult<Self> {
        let relay = Arc::new(SymbolRelay::new(&config.upstream)?);
        let router = Self::build_router(&config, AppState { relay });
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &RelayConfig, state: AppState) -> Router {
        let middleware = ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuidV4))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    request_id = %request_id_of(request.headers()),
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            }))
            .layer(TimeoutLayer::with_status_code(
                StatusCode::GATEWAY_TIMEOUT,
                Duration::from_secs(config.timeouts.request_secs),
            ));

        Router::new()
            .route(DOWNLOAD_ROUTE, get(download_symbol))
            .with_state(state)
            .layer(middleware)
    }

    /// The fully layered router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve on `listener` until a shutdown signal is broadcast.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.base_url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// `GET /api/symbols/download/{filename}/{key}/{filename2}`
async fn download_symbol(
    State(state): State<AppState>,
    Path(request): Path<DownloadRequest>,
) -> Result<OutboundResponse, RelayError> {
    state.relay.handle(&request).await
}
