//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Startup error: {0}")]
    Startup(String),

    #[error("Watch-list error: {0}")]
    Store(#[from] sniper_watchlist::StoreError),

    #[error("Gateway error: {0}")]
    Gateway(#[from] sniper_gateway::GatewayError),

    #[error("Feed error: {0}")]
    Feed(#[from] sniper_feed::FeedError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
