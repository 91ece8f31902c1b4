//! Order gateway for the MEXC listing sniper.
//!
//! Stateless wrapper around the exchange REST API: signs a market buy with
//! HMAC-SHA256 over the canonical query string and submits it with a bounded
//! timeout. A failed placement is final for that invocation; the gateway
//! never retries (a duplicate buy is worse than a missed buy).
//!
//! The [`OrderPlacer`] trait is the seam the dispatcher is tested against;
//! [`MockGateway`] records calls and returns scripted results.

pub mod error;
pub mod gateway;
pub mod signer;

pub use error::{GatewayError, GatewayResult};
pub use gateway::{
    ApiCredentials, BoxFuture, MockGateway, OrderAck, OrderGateway, OrderPlacer,
};
pub use signer::{canonical_query, sign_query};
