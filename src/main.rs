//! Content delivery front (v1)
//!
//! Resolves incoming request paths to culture-qualified content routes
//! using the configured domains.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌──────────────────────────────────────────────┐
//!                         │                DELIVERY CORE                  │
//!                         │                                               │
//!     Client Request      │  ┌─────────┐    ┌──────────┐    ┌──────────┐  │
//!     ────────────────────┼─▶│  http   │───▶│ routing  │───▶│  domain  │  │
//!                         │  │ server  │    │ resolver │    │  table   │  │
//!                         │  └─────────┘    └──────────┘    └────▲─────┘  │
//!                         │                                      │ swap   │
//!                         │  ┌──────────────────────────┐   ┌────┴─────┐  │
//!                         │  │ cache (per snapshot)     │   │  config  │  │
//!                         │  │ element / snapshot scope │   │ watcher  │  │
//!                         │  └──────────────────────────┘   └──────────┘  │
//!                         └──────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use delivery_core::config::{load_config, watcher::ConfigWatcher, DeliveryConfig};
use delivery_core::http::DeliveryServer;
use delivery_core::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "delivery-core")]
#[command(about = "Resolve request paths to content routes", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file. Watched for changes.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => DeliveryConfig::default(),
    };

    logging::init(&config.observability.log_level);
    tracing::info!("delivery-core v0.1.0 starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        domains = config.domains.len(),
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

    // The watcher stops when dropped, so keep it for the life of the server.
    let (_watcher, config_updates) = match &cli.config {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path, &config);
            (Some(watcher.run()?), updates)
        }
        None => {
            let (_, updates) = mpsc::unbounded_channel();
            (None, updates)
        }
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = DeliveryServer::new(config)?;
    server.run(listener, config_updates).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
