//! Gateway error types.

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Signing failed: {0}")]
    Signing(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Order rejected: {0}")]
    Rejected(String),
}

pub type GatewayResult<T> = Result<T, GatewayError>;
