//! Main application orchestration.
//!
//! Control flow: the feed session owns the connection lifecycle in its own
//! task and delivers ticker events through a channel; this loop dispatches
//! them and otherwise only emits periodic liveness lines. Only a startup
//! configuration error halts the process; feed and order errors never do.

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use sniper_dispatch::SnipeDispatcher;
use sniper_feed::{FeedError, FeedSession};
use sniper_gateway::OrderGateway;
use sniper_watchlist::WatchlistStore;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Ticker events buffered between the feed task and the dispatch loop.
const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Main application.
pub struct Application {
    config: AppConfig,
    dispatcher: Arc<SnipeDispatcher>,
}

impl Application {
    /// Wire up the store, gateway and dispatcher.
    ///
    /// A corrupt watch-list file degrades to an empty watch set; the
    /// process stays up so operators can fix the file and restart.
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let store = match WatchlistStore::load(&config.watchlist_path) {
            Ok(store) => store,
            Err(e) => {
                warn!(
                    path = %config.watchlist_path.display(),
                    error = %e,
                    "Watch list unreadable, starting with an empty set"
                );
                WatchlistStore::empty(&config.watchlist_path)
            }
        };

        let gateway = OrderGateway::new(config.rest_url.clone(), config.credentials.clone())?;
        let dispatcher = Arc::new(SnipeDispatcher::new(store, Arc::new(gateway)));

        Ok(Self { config, dispatcher })
    }

    /// Number of symbols currently being watched.
    #[must_use]
    pub fn watching_count(&self) -> usize {
        self.dispatcher.watching_count()
    }

    /// Run the application. Returns only if the feed task dies, which it
    /// is designed never to do.
    pub async fn run(&self) -> AppResult<()> {
        let targets = self.dispatcher.watch_targets();
        if targets.is_empty() {
            warn!("Watch list empty, running but not monitoring anything");
        } else {
            info!(count = targets.len(), "Active snipe targets");
            for (symbol, amount) in &targets {
                info!(%symbol, %amount, "Snipe target");
            }
        }

        let (event_tx, mut event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let session = FeedSession::new(
            self.config.feed.clone(),
            event_tx,
            self.dispatcher.clone(),
        );
        tokio::spawn(async move { session.run().await });

        let mut heartbeat = tokio::time::interval(self.config.heartbeat_interval);
        // Swallow the immediate first tick so beats land every full interval
        heartbeat.tick().await;
        let mut beats: u64 = 0;

        loop {
            tokio::select! {
                event = event_rx.recv() => match event {
                    Some(event) => self.dispatcher.on_ticker(event).await,
                    None => {
                        error!("Feed task stopped delivering events");
                        return Err(AppError::Feed(FeedError::ChannelClosed));
                    }
                },
                _ = heartbeat.tick() => {
                    beats += 1;
                    info!(
                        beat = beats,
                        watching = self.dispatcher.watching_count(),
                        "Heartbeat"
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sniper_feed::FeedConfig;
    use sniper_gateway::ApiCredentials;
    use std::time::Duration;
    use tempfile::TempDir;

    fn test_config(path: std::path::PathBuf) -> AppConfig {
        AppConfig {
            credentials: ApiCredentials {
                api_key: "key".to_string(),
                api_secret: "secret".to_string(),
            },
            rest_url: "https://api.invalid".to_string(),
            feed: FeedConfig::default(),
            watchlist_path: path,
            heartbeat_interval: Duration::from_secs(60),
        }
    }

    #[test]
    fn test_corrupt_watch_list_degrades_to_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("snipe_config.json");
        std::fs::write(&path, "{broken").unwrap();

        let app = Application::new(test_config(path)).unwrap();
        assert_eq!(app.watching_count(), 0);
    }

    #[test]
    fn test_watch_list_loaded_on_startup() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("snipe_config.json");
        std::fs::write(&path, r#"{"ABCUSDT": 5.0, "XYZUSDT": 1.0}"#).unwrap();

        let app = Application::new(test_config(path)).unwrap();
        assert_eq!(app.watching_count(), 2);
    }
}
