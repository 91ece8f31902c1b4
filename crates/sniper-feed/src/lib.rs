//! Reconnecting market-data feed session.
//!
//! Owns one logical subscription to the exchange WebSocket feed: connects,
//! subscribes to the currently watched symbols, parses inbound 24hrTicker
//! messages into [`sniper_core::TickerEvent`]s, and reconnects forever with
//! a fixed backoff on any disconnect or error.

pub mod error;
pub mod parser;
pub mod session;

pub use error::{FeedError, FeedResult};
pub use parser::{parse_message, TICKER_STREAM_SUFFIX};
pub use session::{FeedConfig, FeedSession, SubscribeRequest};

use std::sync::Once;

static INIT_CRYPTO: Once = Once::new();

/// Initialize the TLS crypto provider.
/// Must be called before any WebSocket connections are made.
pub fn init_crypto() {
    INIT_CRYPTO.call_once(|| {
        let _ = rustls::crypto::ring::default_provider().install_default();
    });
}
