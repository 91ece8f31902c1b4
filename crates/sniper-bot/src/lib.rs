//! Main application for the MEXC listing sniper.
//!
//! Wires the watch-list store, feed session, dispatcher and order gateway
//! together and keeps the process alive with a periodic heartbeat.

pub mod app;
pub mod config;
pub mod error;
pub mod logging;

pub use app::Application;
pub use config::AppConfig;
pub use error::{AppError, AppResult};
