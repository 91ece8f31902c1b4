//! Feed session: connection lifecycle and event delivery.
//!
//! State machine: Disconnected -> Connecting -> Subscribed -> Disconnected,
//! looping forever. The retry is unconditional and unlimited; a permanently
//! unreachable feed results in permanent retrying, since the process runs
//! unattended for long periods.

use crate::error::{FeedError, FeedResult};
use crate::parser::{parse_message, TICKER_STREAM_SUFFIX};
use futures_util::{SinkExt, StreamExt};
use serde::Serialize;
use sniper_core::{SymbolSource, TickerEvent};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async_tls_with_config, tungstenite::Message};
use tracing::{error, info, warn};

/// MEXC public WebSocket endpoint.
const MEXC_FEED_URL: &str = "wss://wbs.mexc.com/ws";

/// Fixed backoff between reconnect attempts.
const RECONNECT_DELAY: Duration = Duration::from_secs(10);

type WsSink = futures_util::stream::SplitSink<
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>,
    Message,
>;

/// Feed session configuration.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// WebSocket URL.
    pub url: String,
    /// Fixed delay before each reconnect attempt.
    pub reconnect_delay: Duration,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: MEXC_FEED_URL.to_string(),
            reconnect_delay: RECONNECT_DELAY,
        }
    }
}

/// Subscription control message.
///
/// `{"method":"SUBSCRIPTION","params":["<symbol-lowercase>@24hrTicker", ...]}`
#[derive(Debug, Serialize)]
pub struct SubscribeRequest {
    method: String,
    params: Vec<String>,
}

impl SubscribeRequest {
    /// Build the subscription covering `symbols`.
    pub fn for_symbols(symbols: &[String]) -> Self {
        Self {
            method: "SUBSCRIPTION".to_string(),
            params: symbols
                .iter()
                .map(|s| format!("{}{TICKER_STREAM_SUFFIX}", s.to_lowercase()))
                .collect(),
        }
    }
}

/// One logical subscription to the exchange feed.
///
/// Owns the connection lifecycle; parsed ticker events are pushed into the
/// channel without buffering beyond the channel capacity.
pub struct FeedSession {
    config: FeedConfig,
    event_tx: mpsc::Sender<TickerEvent>,
    symbols: Arc<dyn SymbolSource>,
}

impl FeedSession {
    pub fn new(
        config: FeedConfig,
        event_tx: mpsc::Sender<TickerEvent>,
        symbols: Arc<dyn SymbolSource>,
    ) -> Self {
        Self {
            config,
            event_tx,
            symbols,
        }
    }

    /// Run the connection loop. Never returns.
    pub async fn run(&self) {
        let mut generation: u64 = 0;
        loop {
            generation += 1;
            info!(generation, url = %self.config.url, "Connecting to feed");

            match self.connect_once().await {
                Ok(()) => warn!(generation, "Feed connection closed"),
                Err(e) => error!(generation, error = %e, "Feed connection error"),
            }

            info!(
                delay_ms = self.config.reconnect_delay.as_millis(),
                "Reconnecting after backoff"
            );
            tokio::time::sleep(self.config.reconnect_delay).await;
        }
    }

    async fn connect_once(&self) -> FeedResult<()> {
        let (ws_stream, _response) =
            connect_async_tls_with_config(&self.config.url, None, true, None).await?;
        let (mut write, mut read) = ws_stream.split();
        info!("Feed connected");

        self.subscribe(&mut write).await?;

        while let Some(msg) = read.next().await {
            match msg? {
                Message::Text(text) => self.handle_text(&text).await?,
                Message::Ping(data) => write.send(Message::Pong(data)).await?,
                Message::Close(frame) => {
                    let reason = frame.map(|f| f.reason.to_string()).unwrap_or_default();
                    warn!(%reason, "Feed closed by server");
                    return Ok(());
                }
                _ => {}
            }
        }

        Ok(())
    }

    /// Subscribe to one ticker stream per watched symbol.
    ///
    /// An empty watch set stays connected without subscribing to anything.
    async fn subscribe(&self, write: &mut WsSink) -> FeedResult<()> {
        let symbols = self.symbols.watched_symbols();
        if symbols.is_empty() {
            warn!("Watch list empty, connected but not subscribed");
            return Ok(());
        }

        let request = SubscribeRequest::for_symbols(&symbols);
        let msg = serde_json::to_string(&request)?;
        write.send(Message::Text(msg)).await?;
        info!(count = symbols.len(), "Subscribed to ticker streams");
        Ok(())
    }

    async fn handle_text(&self, text: &str) -> FeedResult<()> {
        match parse_message(text) {
            Ok(Some(event)) => match self.event_tx.try_send(event) {
                Ok(()) => Ok(()),
                Err(mpsc::error::TrySendError::Full(event)) => {
                    // A slow consumer costs latency, never the connection
                    warn!(symbol = %event.symbol, "Event channel full, dropping tick");
                    Ok(())
                }
                Err(mpsc::error::TrySendError::Closed(_)) => Err(FeedError::ChannelClosed),
            },
            Ok(None) => Ok(()),
            Err(e) => {
                // Malformed message: discard it, keep the connection
                warn!(error = %e, "Skipping unparseable feed message");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FeedConfig::default();
        assert_eq!(config.url, MEXC_FEED_URL);
        assert_eq!(config.reconnect_delay, Duration::from_secs(10));
    }

    #[test]
    fn test_subscribe_request_streams() {
        let request = SubscribeRequest::for_symbols(&[
            "NSGUSDT".to_string(),
            "ABCUSDT".to_string(),
        ]);
        let json = serde_json::to_string(&request).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["method"], "SUBSCRIPTION");
        assert_eq!(value["params"][0], "nsgusdt@24hrTicker");
        assert_eq!(value["params"][1], "abcusdt@24hrTicker");
    }
}
