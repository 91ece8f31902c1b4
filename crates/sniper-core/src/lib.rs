//! Core domain types for the MEXC listing sniper.
//!
//! This crate provides the fundamental types shared by the feed, dispatch
//! and gateway crates:
//! - `WatchEntry`: a symbol targeted for a one-shot market buy
//! - `SymbolState`: per-symbol lifecycle tag (claim tracking)
//! - `TickerEvent`: a parsed 24hrTicker update
//! - `SymbolSource`: seam between the feed session and the dispatcher

pub mod error;
pub mod types;

pub use error::{CoreError, Result};
pub use types::{SymbolSource, SymbolState, TickerEvent, WatchEntry};
