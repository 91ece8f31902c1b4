//! Market buy submission over the exchange REST API.

use crate::error::{GatewayError, GatewayResult};
use crate::signer::{canonical_query, sign_query};
use chrono::Utc;
use reqwest::Client;
use rust_decimal::Decimal;
use serde_json::Value;
use std::pin::Pin;
use std::time::Duration;
use tracing::info;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Bounded timeout for order submission.
const ORDER_TIMEOUT: Duration = Duration::from_secs(10);

/// Order endpoint path.
const ORDER_PATH: &str = "/api/v3/order";

/// API key header name.
const API_KEY_HEADER: &str = "X-MEXC-APIKEY";

/// Boxed future for dyn-compatible async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;

/// API credentials. Zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct ApiCredentials {
    pub api_key: String,
    pub api_secret: String,
}

impl std::fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiCredentials").finish_non_exhaustive()
    }
}

/// Acknowledgement of a placed order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderAck {
    /// Order identifier assigned by the exchange.
    pub order_id: String,
}

/// Trait for issuing market buys.
///
/// Abstracts the REST gateway so the dispatcher can be unit tested against
/// a mock. A returned error is final for that invocation; implementations
/// must not retry internally.
pub trait OrderPlacer: Send + Sync {
    /// Submit a market buy spending `quote_amount` of quote currency.
    fn place_market_buy<'a>(
        &'a self,
        symbol: &'a str,
        quote_amount: Decimal,
    ) -> BoxFuture<'a, GatewayResult<OrderAck>>;
}

/// REST order gateway.
pub struct OrderGateway {
    client: Client,
    base_url: String,
    credentials: ApiCredentials,
}

impl OrderGateway {
    /// Create a gateway against `base_url` (e.g., "https://api.mexc.com").
    pub fn new(base_url: impl Into<String>, credentials: ApiCredentials) -> GatewayResult<Self> {
        let client = Client::builder()
            .timeout(ORDER_TIMEOUT)
            .build()
            .map_err(|e| GatewayError::Http(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            credentials,
        })
    }

    async fn submit(&self, symbol: &str, quote_amount: Decimal) -> GatewayResult<OrderAck> {
        if symbol.trim().is_empty() {
            return Err(GatewayError::InvalidRequest("empty symbol".to_string()));
        }
        if quote_amount <= Decimal::ZERO {
            return Err(GatewayError::InvalidRequest(format!(
                "quote amount must be positive, got {quote_amount}"
            )));
        }

        let timestamp = Utc::now().timestamp_millis();
        let query = canonical_query(symbol, quote_amount, timestamp);
        let signature = sign_query(&self.credentials.api_secret, &query)?;
        let url = format!("{}{ORDER_PATH}?{query}&signature={signature}", self.base_url);

        info!(%symbol, amount = %quote_amount, "Submitting market buy");

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.credentials.api_key)
            .send()
            .await
            .map_err(|e| GatewayError::Http(format!("Order request failed: {e}")))?;

        let body: Value = response
            .json()
            .await
            .map_err(|e| GatewayError::Http(format!("Failed to read order response: {e}")))?;

        // Success is defined by the presence of an order identifier
        match body.get("orderId") {
            Some(Value::String(id)) => Ok(OrderAck {
                order_id: id.clone(),
            }),
            Some(id) if !id.is_null() => Ok(OrderAck {
                order_id: id.to_string(),
            }),
            _ => {
                let reason = body
                    .get("msg")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown error")
                    .to_string();
                Err(GatewayError::Rejected(reason))
            }
        }
    }
}

impl OrderPlacer for OrderGateway {
    fn place_market_buy<'a>(
        &'a self,
        symbol: &'a str,
        quote_amount: Decimal,
    ) -> BoxFuture<'a, GatewayResult<OrderAck>> {
        Box::pin(self.submit(symbol, quote_amount))
    }
}

/// Mock gateway for testing.
///
/// Records every placement call and returns a scripted result, optionally
/// after a delay so tests can hold a call in flight.
#[derive(Debug)]
pub struct MockGateway {
    calls: parking_lot::Mutex<Vec<(String, Decimal)>>,
    next_result: parking_lot::Mutex<GatewayResult<OrderAck>>,
    delay: parking_lot::Mutex<Option<Duration>>,
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGateway {
    /// Create a mock that acknowledges with order id "1".
    pub fn new() -> Self {
        Self {
            calls: parking_lot::Mutex::new(Vec::new()),
            next_result: parking_lot::Mutex::new(Ok(OrderAck {
                order_id: "1".to_string(),
            })),
            delay: parking_lot::Mutex::new(None),
        }
    }

    /// Script the result returned by subsequent calls.
    pub fn set_next_result(&self, result: GatewayResult<OrderAck>) {
        *self.next_result.lock() = result;
    }

    /// Hold subsequent calls in flight for `delay` before resolving.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock() = Some(delay);
    }

    /// Recorded calls, in order.
    pub fn calls(&self) -> Vec<(String, Decimal)> {
        self.calls.lock().clone()
    }

    /// Number of placement calls made.
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

impl OrderPlacer for MockGateway {
    fn place_market_buy<'a>(
        &'a self,
        symbol: &'a str,
        quote_amount: Decimal,
    ) -> BoxFuture<'a, GatewayResult<OrderAck>> {
        Box::pin(async move {
            self.calls.lock().push((symbol.to_string(), quote_amount));
            let delay = *self.delay.lock();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            self.next_result.lock().clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_gateway_rejects_empty_symbol() {
        let gateway = OrderGateway::new(
            "https://api.invalid",
            ApiCredentials {
                api_key: "key".to_string(),
                api_secret: "secret".to_string(),
            },
        )
        .unwrap();

        let result = gateway.place_market_buy("", dec!(1)).await;
        assert!(matches!(result, Err(GatewayError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_gateway_rejects_non_positive_amount() {
        let gateway = OrderGateway::new(
            "https://api.invalid",
            ApiCredentials {
                api_key: "key".to_string(),
                api_secret: "secret".to_string(),
            },
        )
        .unwrap();

        let result = gateway.place_market_buy("ABCUSDT", dec!(0)).await;
        assert!(matches!(result, Err(GatewayError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_mock_gateway_records_calls() {
        let mock = MockGateway::new();
        let ack = mock.place_market_buy("ABCUSDT", dec!(5)).await.unwrap();
        assert_eq!(ack.order_id, "1");
        assert_eq!(mock.calls(), vec![("ABCUSDT".to_string(), dec!(5))]);
    }
}
