//! Application configuration.
//!
//! The two API secrets are required and come from the environment; their
//! absence is fatal before any subsystem starts. Everything else has a
//! sensible default with an optional environment override.

use crate::error::{AppError, AppResult};
use sniper_feed::FeedConfig;
use sniper_gateway::ApiCredentials;
use std::path::PathBuf;
use std::time::Duration;

/// Default watch-list file, next to the working directory.
pub const DEFAULT_WATCHLIST_PATH: &str = "snipe_config.json";

/// MEXC REST endpoint.
const DEFAULT_REST_URL: &str = "https://api.mexc.com";

/// Liveness line interval.
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(60);

/// Application configuration.
#[derive(Debug)]
pub struct AppConfig {
    /// Exchange API credentials.
    pub credentials: ApiCredentials,
    /// REST base URL for order placement.
    pub rest_url: String,
    /// Feed session configuration.
    pub feed: FeedConfig,
    /// Watch-list file path.
    pub watchlist_path: PathBuf,
    /// Heartbeat interval.
    pub heartbeat_interval: Duration,
}

impl AppConfig {
    /// Build the configuration from the environment.
    ///
    /// `MEXC_API_KEY` and `MEXC_SECRET_KEY` are required. Optional
    /// overrides: `SNIPER_REST_URL`, `SNIPER_FEED_URL`, `SNIPER_WATCHLIST`
    /// (the CLI argument wins over the latter).
    pub fn from_env(watchlist_override: Option<PathBuf>) -> AppResult<Self> {
        let api_key = require_env("MEXC_API_KEY")?;
        let api_secret = require_env("MEXC_SECRET_KEY")?;

        let rest_url =
            std::env::var("SNIPER_REST_URL").unwrap_or_else(|_| DEFAULT_REST_URL.to_string());

        let mut feed = FeedConfig::default();
        if let Ok(url) = std::env::var("SNIPER_FEED_URL") {
            feed.url = url;
        }

        let watchlist_path = watchlist_override
            .or_else(|| std::env::var("SNIPER_WATCHLIST").ok().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_WATCHLIST_PATH));

        Ok(Self {
            credentials: ApiCredentials {
                api_key,
                api_secret,
            },
            rest_url,
            feed,
            watchlist_path,
            heartbeat_interval: HEARTBEAT_INTERVAL,
        })
    }
}

fn require_env(name: &str) -> AppResult<String> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Startup(format!("{name} environment variable not set")))
}
