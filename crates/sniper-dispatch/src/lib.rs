//! Snipe dispatch for the MEXC listing sniper.
//!
//! Consumes ticker events, enforces the at-most-once-per-symbol guarantee
//! and drives the order gateway. The claim-then-act step is the critical
//! section; everything else is reactive.

pub mod dispatcher;

pub use dispatcher::SnipeDispatcher;
