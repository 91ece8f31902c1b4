//! Watch-list store error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Watch-list file corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("Watch-list entry invalid: {0}")]
    InvalidEntry(#[from] sniper_core::CoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;
