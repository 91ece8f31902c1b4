//! MEXC listing sniper - entry point.
//!
//! Watches the ticker feed for newly listed symbols and fires a single
//! market buy the moment trading starts, then drops the symbol.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

/// MEXC listing sniper
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Watch-list file path (can also be set via SNIPER_WATCHLIST)
    #[arg(short, long)]
    watchlist: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize TLS crypto provider (must be before any WS connections)
    sniper_feed::init_crypto();

    let args = Args::parse();

    sniper_bot::logging::init_logging()?;

    info!("Starting MEXC listing sniper v{}", env!("CARGO_PKG_VERSION"));

    // Fatal if the API secrets are missing; nothing is started before this
    let config = sniper_bot::AppConfig::from_env(args.watchlist)?;
    info!(
        watchlist = %config.watchlist_path.display(),
        feed_url = %config.feed.url,
        "Configuration loaded"
    );

    let app = sniper_bot::Application::new(config)?;
    app.run().await?;

    Ok(())
}
