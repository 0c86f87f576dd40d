//! Router API server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Orchestrator request
//!     ──────────────▶ http (axum, request ID, trace, timeout)
//!                        │
//!                        ▼
//!                    dispatch ──▶ ModeRegistry ──▶ Provider (per mode)
//!                        │                            │
//!                        ▼                            ▼
//!                    ApiError ◀──────────────── ProviderError
//!
//!     GET /healthcheck ──▶ health (all providers, concurrently)
//! ```
//!
//! Startup order: config, logging, metrics, registry, listener. Shutdown on
//! SIGINT/SIGTERM drains in-flight requests before exiting.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use router_api::config::load_or_default;
use router_api::observability::{init_logging, metrics};
use router_api::{HttpServer, ModeRegistry, Shutdown};

#[derive(Parser, Debug)]
#[command(name = "router-api", version, about = "Routing API for container orchestrators")]
struct Args {
    /// Path to the TOML configuration file; defaults are used when absent.
    #[arg(short, long, env = "ROUTER_API_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = load_or_default(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    init_logging(&config.observability)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "router-api starting");

    tracing::info!(
        bind_address = %config.listener.bind_address,
        provider_timeout_secs = config.timeouts.provider_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let registry = Arc::new(ModeRegistry::from_config(&config));
    if registry.is_empty() {
        return Err("no routing modes configured".into());
    }
    for entry in registry.iter() {
        tracing::info!(mode = entry.mode(), capabilities = ?entry.capabilities(), "Mode registered");
    }
    tracing::info!(
        default_mode = registry.default_mode(),
        modes = registry.len(),
        "Mode registry ready"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    shutdown.spawn_signal_listener();

    HttpServer::new(&config, registry).run(listener, &shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
