//! Station Daemon (mspd-pd) - Main entry point
//!
//! Serves the station control protocol and starts `mspd-ps` players on
//! request.

use anyhow::{Context, Result};
use clap::Parser;
use mspd_common::logging::init_tracing;
use mspd_common::shutdown::shutdown_signal;
use mspd_common::TomlConfig;
use mspd_pd::backend::Backend;
use mspd_pd::protocol::StationControl;
use mspd_pd::server::serve;
use mspd_pd::stations::StationTable;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

/// Command-line arguments for mspd-pd
#[derive(Parser, Debug)]
#[command(name = "mspd-pd")]
#[command(about = "Internet radio station daemon")]
#[command(version)]
struct Args {
    /// Configuration file
    #[arg(long, value_name = "FILE", env = "MSPD_CONFIG")]
    config: Option<PathBuf>,

    /// Address to listen on (overrides daemon.listen)
    #[arg(long, value_name = "ADDR", env = "MSPD_LISTEN")]
    listen: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let (config, config_source) = TomlConfig::resolve(args.config.as_deref())
        .context("Failed to load configuration")?;

    init_tracing("mspd_pd", &config.logging);

    info!(
        "Starting MSPD Station Daemon (mspd-pd) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    info!("Configuration: {}", config_source);

    let stations = StationTable::from_config(&config);
    if stations.is_empty() {
        warn!("No stations configured");
    } else {
        info!("Loaded {} stations", stations.len());
    }

    let mut backend = Backend::new(stations, &config.daemon);
    backend
        .run_dir()
        .ensure_exists()
        .await
        .context("Failed to create run directory")?;
    info!("Run directory: {}", backend.run_dir().root().display());
    info!("Player: {}", config.daemon.player);

    // State left behind by a previous daemon run
    match backend.status(false).await {
        Ok(status) if status.station_id != 0 => {
            info!("Station {} still playing: {}", status.station_id, status.tag)
        }
        Ok(_) => info!("Nothing playing"),
        Err(e) => warn!("Could not read previous status: {}", e),
    }

    let listen = args.listen.unwrap_or(config.daemon.listen);
    let listener = match TcpListener::bind(&listen).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", listen, e);
            return Err(e).context("Failed to start control server");
        }
    };

    let control = Arc::new(Mutex::new(backend));
    tokio::select! {
        _ = serve(listener, Arc::clone(&control)) => {}
        _ = shutdown_signal() => {}
    }

    // Players are left running; a restarted daemon picks them up from the
    // run directory
    info!("Daemon shutdown complete");
    Ok(())
}
