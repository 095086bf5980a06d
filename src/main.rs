//! AciTracker Gateway
//!
//! An authenticated, caching reverse proxy built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                       ┌──────────────────────────────────────────────────────┐
//!                       │                       GATEWAY                        │
//!                       │                                                      │
//!   Client Request      │  ┌─────────┐   ┌─────────┐   ┌─────────┐   ┌──────┐  │
//!   ────────────────────┼─▶│  guard  │──▶│ routing │──▶│  auth   │──▶│cache │  │
//!                       │  │413 / 405│   │   404   │   │401 / 500│   │lookup│  │
//!                       │  └─────────┘   └─────────┘   └─────────┘   └──┬───┘  │
//!                       │                                        HIT │  │ MISS │
//!                       │                                            │  ▼      │
//!   Client Response     │  ┌──────────────────────────┐        ┌──────────┐    │
//!   ◀───────────────────┼──│ envelope + X-Cache / 502 │◀───────│ upstream │◀───┼── Upstream
//!                       │  └──────────────────────────┘ store  │ forwarder│    │
//!                       │                                      └──────────┘    │
//!                       │  ┌────────────────────────────────────────────────┐  │
//!                       │  │ config · observability · lifecycle             │  │
//!                       │  └────────────────────────────────────────────────┘  │
//!                       └──────────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use acitracker_gateway::config::load_config;
use acitracker_gateway::lifecycle::{signals, Shutdown};
use acitracker_gateway::observability::{logging, metrics};
use acitracker_gateway::routing::Route;
use acitracker_gateway::HttpServer;

#[derive(Parser)]
#[command(name = "acitracker-gateway")]
#[command(about = "Authenticated caching gateway for the AciTracker backend", long_about = None)]
struct Cli {
    /// Optional TOML config file; environment variables override it.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    logging::init_logging(&config.observability);

    tracing::info!("acitracker-gateway v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address(),
        upstream = %config.upstream.base_url,
        cache_ttl_ms = config.cache.ttl_ms,
        upstream_timeout_ms = config.upstream.timeout_ms,
        routes = Route::ALL.len(),
        bearer_token_configured = config.auth.secret().is_some(),
        "Configuration loaded"
    );
    if config.auth.secret().is_none() {
        tracing::warn!("GATEWAY_BEARER_TOKEN not set; every allowlisted route will answer 500");
    }

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(config.listener.bind_address()).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::shutdown_signal().await;
        shutdown.trigger();
    });

    let server = HttpServer::new(config)?;
    let cache = server.cache();
    server.run(listener, server_shutdown).await?;

    tracing::info!(cache_entries = cache.len(), "Shutdown complete");
    Ok(())
}
