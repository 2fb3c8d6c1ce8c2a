//! Symbol Relay
//!
//! Forwards `GET /api/symbols/download/{filename}/{key}/{filename2}` to a
//! single symbol server, adding Basic authorization from a token held in the
//! environment, and returns the artifact with its upstream ETag.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request        ┌──────────────────────────────────────────────┐
//!     ──────────────────────┼─▶ http::server ─▶ relay::handler ─▶ connector ┼──▶ Symbol
//!                           │                                               │    Server
//!     ◀─────────────────────┼── http::response ◀── Payload | Absent ◀───────┼───
//!     Client Response       │                                               │
//!                           │   config · observability · lifecycle          │
//!                           └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use symbol_relay::config::load_config;
use symbol_relay::lifecycle::{signals, Shutdown};
use symbol_relay::observability::{logging, metrics};
use symbol_relay::HttpServer;

#[derive(Parser)]
#[command(name = "symbol-relay")]
#[command(about = "Authenticating relay for symbol server downloads", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long, env = "SYMBOL_RELAY_CONFIG")]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability);

    tracing::info!("symbol-relay v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        token_env = %config.upstream.token_env,
        on_transport_failure = ?config.upstream.on_transport_failure,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::wait_for_signal().await;
        shutdown.trigger();
    });

    let server = HttpServer::new(config)?;
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
