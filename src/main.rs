//! Fantasy Gateway
//!
//! # Architecture Overview
//!
//! ```text
//!                       ┌──────────────────────────────────────────────┐
//!                       │                  GATEWAY                      │
//!   Browser GET page    │  ┌────────┐   ┌────────────┐   ┌──────────┐  │
//!   ────────────────────┼─▶│  http  │──▶│ aggregator │──▶│ upstream │──┼──▶ Fantasy API
//!                       │  │ server │   │ fan-out/in │   │  client  │  │
//!   HTML | JSON model   │  └───┬────┘   └─────┬──────┘   └────▲─────┘  │
//!   ◀───────────────────┼──────┤         render (template)      │        │
//!                       │      │                                 │        │
//!   Browser mutation    │      │        ┌────────────┐           │        │
//!   ────────────────────┼──────┴───────▶│   proxy    │───────────┘        │
//!   ResultEnvelope      │               │  envelope  │                    │
//!   ◀───────────────────┼───────────────┴────────────┘                    │
//!                       │                                                 │
//!                       │  config · observability · lifecycle             │
//!                       └─────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use fantasy_gateway::config::load_config;
use fantasy_gateway::lifecycle::{spawn_signal_listener, Shutdown};
use fantasy_gateway::observability::{logging, metrics};
use fantasy_gateway::HttpServer;

#[derive(Parser)]
#[command(name = "fantasy-gateway")]
#[command(about = "Web gateway for the fantasy-sports API", long_about = None)]
struct Args {
    /// Optional TOML config file. `PORT` and `API_BASE_URL` override it.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    logging::init_logging(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "fantasy-gateway starting");

    tracing::info!(
        bind_address = %config.listener.bind_address(),
        upstream = %config.upstream.base_url,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(config.listener.bind_address()).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    spawn_signal_listener(shutdown.clone());

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
