//! Dynamic reverse proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌────────────────────────────────────────────┐
//!                         │               DYNAMIC PROXY                │
//!                         │                                            │
//!   Client Request        │  ┌──────────┐    ┌──────────────┐          │
//!   ──────────────────────┼─▶│  proxy   │───▶│  dispatcher  │──────────┼──▶ Upstream
//!                         │  │ listener │    │ + forwarder  │          │
//!                         │  └──────────┘    └──────┬───────┘          │
//!                         │                         │ load             │
//!                         │                  ┌──────▼───────┐          │
//!                         │                  │  RouteSlot   │          │
//!                         │                  │ (ArcSwap of  │          │
//!                         │                  │ RoutingTable)│          │
//!                         │                  └──────▲───────┘          │
//!                         │                         │ publish          │
//!   Operator              │  ┌──────────┐    ┌──────┴───────┐          │
//!   ──────────────────────┼─▶│  admin   │───▶│    admin     │          │
//!                         │  │ listener │    │  controller  │          │
//!                         │  └──────────┘    └──────────────┘          │
//!                         └────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use dynamic_proxy::config::load_config;
use dynamic_proxy::lifecycle::{bind_listeners, signals::shutdown_on_signal, Shutdown};
use dynamic_proxy::observability::{logging, metrics};
use dynamic_proxy::HttpServer;

#[derive(Parser)]
#[command(name = "dynamic-proxy")]
#[command(about = "HTTP reverse proxy with a runtime route admin API", long_about = None)]
struct Args {
    /// Optional TOML configuration file. `PORT` and `ADMIN_PORT` override
    /// the listener addresses it sets.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    logging::init_logging(&config.observability.log_level);
    tracing::info!("dynamic-proxy v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        proxy_address = %config.listener.bind_address,
        admin_address = %config.admin.bind_address,
        connect_timeout_secs = config.timeouts.connect_secs,
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

    let listeners = bind_listeners(&config).await?;

    let shutdown = Shutdown::new();
    tokio::spawn(shutdown_on_signal(shutdown.clone()));

    HttpServer::new(config).run(listeners, &shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
