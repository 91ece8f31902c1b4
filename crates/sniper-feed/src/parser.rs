//! Inbound message parsing.
//!
//! Messages of interest carry a `stream` field containing `24hrTicker` and
//! a nested `data` object with `s` (symbol), `c` (last price) and `v`
//! (volume). Everything else on the socket (subscription acks, other
//! streams) is not an error, just not a ticker.

use crate::error::{FeedError, FeedResult};
use rust_decimal::Decimal;
use serde::Deserialize;
use sniper_core::TickerEvent;

/// Tag identifying a 24-hour ticker stream message.
const TICKER_STREAM_TAG: &str = "24hrTicker";

/// Suffix appended to the lowercase symbol to form a stream identifier.
pub const TICKER_STREAM_SUFFIX: &str = "@24hrTicker";

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    stream: Option<String>,
    #[serde(default)]
    data: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct TickerPayload {
    /// Symbol, e.g. "ABCUSDT".
    s: String,
    /// Last price. Absent until the pair has traded.
    #[serde(default)]
    c: Option<String>,
    /// 24h volume.
    #[serde(default)]
    v: Option<String>,
}

/// Parse one inbound text message.
///
/// Returns `Ok(None)` for well-formed messages that are not ticker updates.
/// Errors mean the single message is discarded; they never tear down the
/// connection.
pub fn parse_message(text: &str) -> FeedResult<Option<TickerEvent>> {
    let envelope: Envelope = serde_json::from_str(text)?;

    let Some(stream) = envelope.stream else {
        // Control message (subscription ack etc.)
        return Ok(None);
    };
    if !stream.contains(TICKER_STREAM_TAG) {
        return Ok(None);
    }

    let Some(data) = envelope.data else {
        return Err(FeedError::InvalidData(format!(
            "ticker message without data object on stream {stream}"
        )));
    };
    let payload: TickerPayload = serde_json::from_value(data)?;

    Ok(Some(TickerEvent {
        symbol: payload.s,
        last_price: parse_field(payload.c.as_deref(), "c")?,
        volume: parse_field(payload.v.as_deref(), "v")?,
        stream,
    }))
}

/// A missing field means the pair has not traded yet and parses as zero;
/// a present but non-numeric field is a parse error.
fn parse_field(value: Option<&str>, field: &str) -> FeedResult<Decimal> {
    match value {
        None => Ok(Decimal::ZERO),
        Some(raw) => raw
            .parse()
            .map_err(|e| FeedError::InvalidData(format!("bad {field} field {raw:?}: {e}"))),
    }
}
