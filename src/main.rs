//! Storefront gateway
//!
//! Routing core of the storefront-pricing dashboard, built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌───────────────────────────────────────────────────┐
//!                         │                 STOREFRONT GATEWAY                │
//!                         │                                                   │
//!   Browser Request       │  ┌──────────┐     ┌────────────┐                  │
//!   ──────────────────────┼─▶│   http   │────▶│  /api/*    │──┐               │
//!                         │  │  server  │     └────────────┘  │               │
//!                         │  └────┬─────┘                     ▼               │
//!                         │       │ pages          ┌──────────────────┐       │
//!                         │       ▼                │     gateway      │       │
//!                         │  ┌──────────┐          │ payload/session  │───────┼──▶ Upstream
//!                         │  │ routing  │          │    upstream      │◀──────┼─── pricing
//!                         │  │ + locale │          └──────────────────┘       │    service
//!                         │  └──────────┘                                     │
//!                         │   root → redirect, excluded → pass,               │
//!                         │   prefixed → serve | redirect | 404               │
//!                         │                                                   │
//!                         │  config (TOML + hot reload) · observability ·     │
//!                         │  lifecycle (signals, graceful shutdown)           │
//!                         └───────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use storefront_gateway::config::{
    load_config_with, validation::validate_config, watcher::ConfigWatcher, ConfigOverrides,
    GatewayConfig,
};
use storefront_gateway::lifecycle::signals::shutdown_on_signal;
use storefront_gateway::observability::{logging, metrics};
use storefront_gateway::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "storefront-gateway")]
#[command(about = "Locale routing and pricing proxy for the storefront dashboard", long_about = None)]
struct Args {
    /// TOML configuration file; watched for changes when given.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(short, long)]
    bind: Option<String>,

    /// Override upstream.base_url.
    #[arg(short, long)]
    upstream: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let overrides = ConfigOverrides {
        bind_address: args.bind.clone(),
        upstream_base_url: args.upstream.clone(),
    };

    let config = match &args.config {
        Some(path) => load_config_with(path, &overrides)?,
        None => {
            let mut config = GatewayConfig::default();
            overrides.apply(&mut config);
            config
        }
    };
    if let Err(errors) = validate_config(&config) {
        for e in &errors {
            eprintln!("invalid configuration: {}", e);
        }
        return Err(format!("{} configuration error(s)", errors.len()).into());
    }

    logging::init(&config.observability.log_level);
    tracing::info!("storefront-gateway v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        upstream_timeout_secs = config.upstream.timeout_secs,
        excluded_prefixes = ?config.routing.excluded_prefixes,
        "Configuration loaded"
    );
    if !overrides.is_empty() {
        tracing::info!(?overrides, "Command-line overrides apply to every reload");
    }

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    // Keep the watcher alive for the life of the server.
    let (_watcher, config_updates) = match &args.config {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (Some(watcher.with_overrides(overrides).run()?), updates)
        }
        None => {
            let (_, updates) = mpsc::unbounded_channel();
            (None, updates)
        }
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    tokio::spawn(shutdown_on_signal(shutdown.clone()));

    let server = HttpServer::new(config);
    server.run(listener, config_updates, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
