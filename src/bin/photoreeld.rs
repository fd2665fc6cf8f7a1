//! photoreeld: Photoreel daemon.
//!
//! Serves the cache-aside photo gateway over HTTP.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use photoreel::PhotoreelError;
use photoreel::server::config::{Config, FLICKR_API_KEY_ENV, Secrets};

/// Photoreel daemon: rotating photo gateway.
#[derive(Parser)]
#[command(name = "photoreeld")]
#[command(version = photoreel::PKG_VERSION)]
#[command(about = "Photoreel rotating photo gateway daemon")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    /// Populate the cache before accepting requests.
    #[arg(long)]
    warm: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("photoreel=info")),
        )
        .init();

    let args = Args::parse();

    // Load configuration
    let config = Config::load(args.config.as_deref())?;
    let secrets = Secrets::load()?;
    let api_key = secrets.flickr_api_key().ok_or_else(|| {
        PhotoreelError::Configuration(format!(
            "no Flickr API key: add [flickr] api_key to secrets.toml or set {FLICKR_API_KEY_ENV}"
        ))
    })?;

    let gateway = Arc::new(config.builder(api_key).build()?);

    // Parse address
    let addr: SocketAddr = config
        .server
        .address
        .parse()
        .map_err(|e| PhotoreelError::Configuration(format!("Invalid address: {e}")))?;

    if args.warm {
        let report = gateway.refresh().await;
        if report.cached() == 0 {
            warn!(outcome = report.outcome.as_str(), "cache warm-up stored no images");
        }
    }

    info!(
        version = photoreel::PKG_VERSION,
        %addr,
        slots = gateway.config().image_count.get(),
        cache = gateway.cache().name(),
        "photoreeld starting"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, photoreel::server::router(gateway)).await?;

    Ok(())
}
