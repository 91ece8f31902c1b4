//! Durable watch-list store for the MEXC listing sniper.
//!
//! Owns the mapping of symbol to target spend, backed by a JSON file
//! (`{"NSGUSDT": 2.0}`). The file is read once at startup and fully
//! rewritten after every successful snipe.

pub mod error;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use store::WatchlistStore;
