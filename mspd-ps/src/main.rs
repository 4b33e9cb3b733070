//! Stream Player (mspd-ps) - Main entry point
//!
//! Resolves the station URI, starts playback through GStreamer and keeps
//! the tag file up to date until interrupted.

use anyhow::{Context, Result};
use mspd_common::logging::init_tracing;
use mspd_common::shutdown::shutdown_signal;
use mspd_common::TomlConfig;
use mspd_ps::args::Args;
use mspd_ps::dispatch::dispatch_events;
use mspd_ps::playback::{PlaybackDriver, PlaybinDriver};
use mspd_ps::resolver::{select_stream, HttpFetcher, PlaylistResolver};
use tracing::{debug, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let parsed = Args::parse_lenient();
    let args = parsed.args;

    let (config, config_source) = TomlConfig::resolve(args.config.as_deref())
        .context("Failed to load configuration")?;

    init_tracing("mspd_ps", &config.logging);

    info!(
        "Starting MSPD Stream Player (mspd-ps) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    info!("Configuration: {}", config_source);
    if !parsed.ignored.is_empty() {
        debug!("Ignoring unrecognised arguments: {:?}", parsed.ignored);
    }
    if !args.station_name.is_empty() {
        info!("Station: {}", args.station_name);
    }

    let mut sink = args.tag_sink();
    match sink.path() {
        Some(path) => info!("Tag file: {}", path.display()),
        None => info!("No tag file given (-t), titles will not be recorded"),
    }

    let fetcher = HttpFetcher::new(&config.player).context("Failed to create HTTP client")?;
    let resolver = PlaylistResolver::new(fetcher);
    let entries = resolver.resolve(&args.uri).await;
    let stream_uri = select_stream(&args.uri, &entries);
    info!("Playing: {}", stream_uri);

    let mut driver = PlaybinDriver::new().context("Failed to initialize playback engine")?;
    let events = driver
        .play(&stream_uri)
        .context("Failed to start playback")?;

    tokio::select! {
        stats = dispatch_events(events, &mut sink) => {
            warn!("Playback engine closed its event stream ({:?})", stats);
        }
        _ = shutdown_signal() => {}
    }

    driver.stop().context("Failed to stop playback")?;
    info!("Player shutdown complete");
    Ok(())
}
