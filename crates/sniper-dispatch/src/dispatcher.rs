//! The at-most-once trigger state machine.
//!
//! Per incoming ticker event for symbol S:
//! 1. S not in the watch list -> ignore
//! 2. S already claimed -> ignore (duplicate/late delivery)
//! 3. last price <= 0 -> ignore without claiming (not yet trading)
//! 4. claim S as Executing, then call the gateway
//! 5. success -> Completed, remove from the watch list and persist
//! 6. failure -> Failed, never retried in-process
//!
//! Steps 1-4 run under a single lock acquisition, so two events for the
//! same symbol can never both pass the eligibility check, even when the
//! first placement call has not returned yet.

use parking_lot::Mutex;
use rust_decimal::Decimal;
use sniper_core::{SymbolSource, SymbolState, TickerEvent};
use sniper_gateway::OrderPlacer;
use sniper_watchlist::WatchlistStore;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Shared mutable state: the watch list plus the per-symbol claim set.
struct DispatchState {
    store: WatchlistStore,
    states: HashMap<String, SymbolState>,
}

/// Snipe dispatcher.
///
/// Purely reactive: it owns no tasks and only acts when handed an event.
pub struct SnipeDispatcher {
    state: Mutex<DispatchState>,
    gateway: Arc<dyn OrderPlacer>,
}

impl SnipeDispatcher {
    pub fn new(store: WatchlistStore, gateway: Arc<dyn OrderPlacer>) -> Self {
        Self {
            state: Mutex::new(DispatchState {
                store,
                states: HashMap::new(),
            }),
            gateway,
        }
    }

    /// Handle one ticker event.
    ///
    /// All failures are terminal for the symbol and logged; nothing
    /// propagates to the caller.
    pub async fn on_ticker(&self, event: TickerEvent) {
        // Claim-then-act: the claim must be indivisible relative to
        // concurrent events for the same symbol. The gateway call happens
        // outside the lock.
        let spend = {
            let mut state = self.state.lock();

            let Some(spend) = state.store.target_spend(&event.symbol) else {
                return;
            };
            if state
                .states
                .get(&event.symbol)
                .is_some_and(SymbolState::is_claimed)
            {
                debug!(symbol = %event.symbol, "Duplicate event for claimed symbol, ignoring");
                return;
            }
            if event.last_price <= Decimal::ZERO {
                // Price still at its pre-listing placeholder
                return;
            }

            state
                .states
                .insert(event.symbol.clone(), SymbolState::Executing);
            spend
        };

        info!(
            symbol = %event.symbol,
            price = %event.last_price,
            volume = %event.volume,
            amount = %spend,
            "Trading start detected, executing snipe"
        );

        match self.gateway.place_market_buy(&event.symbol, spend).await {
            Ok(ack) => {
                let mut state = self.state.lock();
                state
                    .states
                    .insert(event.symbol.clone(), SymbolState::Completed);
                if let Err(e) = state.store.remove_and_save(&event.symbol) {
                    // In-memory removal already happened; the stale file
                    // entry is harmless because the claim blocks re-entry
                    warn!(symbol = %event.symbol, error = %e, "Watch-list save failed after snipe");
                }
                info!(
                    symbol = %event.symbol,
                    order_id = %ack.order_id,
                    "Snipe succeeded, symbol removed from watch list"
                );
            }
            Err(e) => {
                self.state
                    .lock()
                    .states
                    .insert(event.symbol.clone(), SymbolState::Failed);
                error!(
                    symbol = %event.symbol,
                    error = %e,
                    "Snipe failed, symbol will not be retried"
                );
            }
        }
    }

    /// Number of symbols still being watched.
    #[must_use]
    pub fn watching_count(&self) -> usize {
        self.state.lock().store.len()
    }

    /// Recorded state for a symbol, if any event has claimed it.
    #[must_use]
    pub fn symbol_state(&self, symbol: &str) -> Option<SymbolState> {
        self.state.lock().states.get(symbol).copied()
    }

    /// Snapshot of the watch list for startup logging.
    #[must_use]
    pub fn watch_targets(&self) -> Vec<(String, Decimal)> {
        self.state
            .lock()
            .store
            .entries()
            .map(|e| (e.symbol.clone(), e.target_spend))
            .collect()
    }
}

impl SymbolSource for SnipeDispatcher {
    fn watched_symbols(&self) -> Vec<String> {
        self.state.lock().store.symbols()
    }
}
