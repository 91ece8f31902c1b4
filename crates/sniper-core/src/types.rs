//! Shared domain types.

use crate::error::{CoreError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A symbol targeted for a one-shot market buy.
///
/// Entries are loaded from the watch-list file at startup and removed
/// exactly once, immediately after a successful placement. They are never
/// mutated otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchEntry {
    /// Trading pair identifier, uppercase (e.g., "NSGUSDT").
    pub symbol: String,
    /// Amount to spend in quote currency. Strictly positive.
    pub target_spend: Decimal,
}

impl WatchEntry {
    /// Create a validated watch entry. Symbols are normalized to uppercase.
    pub fn new(symbol: impl Into<String>, target_spend: Decimal) -> Result<Self> {
        let symbol: String = symbol.into();
        if symbol.trim().is_empty() {
            return Err(CoreError::InvalidSymbol("empty symbol".to_string()));
        }
        if target_spend <= Decimal::ZERO {
            return Err(CoreError::InvalidSpend(format!(
                "{symbol}: target spend must be positive, got {target_spend}"
            )));
        }
        Ok(Self {
            symbol: symbol.to_uppercase(),
            target_spend,
        })
    }
}

/// Per-symbol lifecycle tag.
///
/// Lives only for the process runtime. A symbol with no recorded state is
/// implicitly `Watching` while it remains in the watch list. Transitions
/// are one-directional: `Watching -> Executing` happens at most once per
/// symbol, `Executing -> {Completed, Failed}` exactly once after that.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolState {
    /// In the watch list, no eligible tick seen yet.
    Watching,
    /// Claimed: a placement call is in flight.
    Executing,
    /// Placement succeeded; the symbol has been removed from the watch list.
    Completed,
    /// Placement failed; terminal, never retried in-process.
    Failed,
}

impl SymbolState {
    /// Whether the symbol has been claimed by a placement attempt.
    ///
    /// A claimed symbol must never trigger another gateway call.
    #[must_use]
    pub fn is_claimed(&self) -> bool {
        !matches!(self, SymbolState::Watching)
    }
}

/// A parsed 24hrTicker update from the feed.
///
/// Transient: produced by the feed session, consumed once by the dispatcher.
#[derive(Debug, Clone)]
pub struct TickerEvent {
    /// Trading pair identifier as reported by the exchange.
    pub symbol: String,
    /// Last traded price. Zero while the pair has not started trading.
    pub last_price: Decimal,
    /// 24h volume.
    pub volume: Decimal,
    /// Stream tag the update arrived on (e.g., "nsgusdt@24hrTicker").
    pub stream: String,
}

/// Source of the currently watched symbols.
///
/// The feed session snapshots this at every (re)subscribe so that completed
/// symbols drop out of the subscription on the next reconnect.
pub trait SymbolSource: Send + Sync {
    /// Symbols that should be covered by the next subscription.
    fn watched_symbols(&self) -> Vec<String>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_watch_entry_normalizes_symbol() {
        let entry = WatchEntry::new("nsgusdt", dec!(2.0)).unwrap();
        assert_eq!(entry.symbol, "NSGUSDT");
        assert_eq!(entry.target_spend, dec!(2.0));
    }

    #[test]
    fn test_watch_entry_rejects_empty_symbol() {
        assert!(matches!(
            WatchEntry::new("  ", dec!(1)),
            Err(CoreError::InvalidSymbol(_))
        ));
    }

    #[test]
    fn test_watch_entry_rejects_non_positive_spend() {
        assert!(matches!(
            WatchEntry::new("ABCUSDT", dec!(0)),
            Err(CoreError::InvalidSpend(_))
        ));
        assert!(matches!(
            WatchEntry::new("ABCUSDT", dec!(-5)),
            Err(CoreError::InvalidSpend(_))
        ));
    }

    #[test]
    fn test_symbol_state_claims() {
        assert!(!SymbolState::Watching.is_claimed());
        assert!(SymbolState::Executing.is_claimed());
        assert!(SymbolState::Completed.is_claimed());
        assert!(SymbolState::Failed.is_claimed());
    }
}
