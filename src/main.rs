//! Service host binary.
//!
//! ```text
//!                      ┌──────────────────────────────────────────────┐
//!                      │                 SERVICE HOST                 │
//!   Client request     │  ┌──────────┐   ┌──────────┐   ┌──────────┐  │
//!   ───────────────────┼─▶│   net    │──▶│   http   │──▶│ routing  │──┼──▶ registered
//!                      │  │ listener │   │ h1 / h2c │   │ registry │  │    handlers
//!                      │  └──────────┘   └────┬─────┘   └──────────┘  │
//!                      │                      │                       │
//!                      │                      ▼                       │
//!                      │                ┌──────────┐                  │
//!                      │                │  health  │ /liveness        │
//!                      │                └──────────┘ RPC Liveness     │
//!                      │                                              │
//!                      │  lifecycle: listen → stop → drain → stopped  │
//!                      └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use service_host::config::{load_config, HostConfig};
use service_host::lifecycle::signals::shutdown_signal;
use service_host::observability::init_logging;
use service_host::services::Echo;
use service_host::Host;

#[derive(Parser)]
#[command(name = "service-host")]
#[command(about = "Hosts HTTP services behind one HTTP/1.1 + h2c listener", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address, overriding `listener.bind_address`.
    #[arg(short, long)]
    listen: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => HostConfig::default(),
    };
    if let Some(listen) = cli.listen {
        config.listener.bind_address = listen;
    }

    if let Err(e) = init_logging(&config.observability) {
        eprintln!("failed to initialize logging: {}", e);
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        max_connections = config.listener.max_connections,
        request_timeout_secs = config.timeouts.request_secs,
        drain_secs = ?config.timeouts.drain_secs,
        "service-host starting"
    );

    let host = Arc::new(Host::new(config.clone()));

    if let Some(path) = &config.services.echo_path {
        host.add_service(&Echo::new(path.as_str()))?;
    }

    let signal_host = Arc::clone(&host);
    tokio::spawn(async move {
        shutdown_signal().await;
        signal_host.stop();
    });

    host.listen(&config.listener.bind_address).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
