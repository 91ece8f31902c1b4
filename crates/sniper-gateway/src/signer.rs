//! HMAC-SHA256 request signing.
//!
//! MEXC signs the canonically-ordered query string with the account secret;
//! the hex digest is appended as the `signature` parameter.

use crate::error::{GatewayError, GatewayResult};
use hmac::{Hmac, Mac};
use rust_decimal::Decimal;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Build the canonical query string for a market buy.
///
/// Parameter order is fixed; the signature is computed over exactly this
/// string, so it must match what is sent on the wire byte for byte.
pub fn canonical_query(symbol: &str, quote_amount: Decimal, timestamp_ms: i64) -> String {
    format!(
        "symbol={symbol}&side=BUY&type=MARKET&quoteOrderQty={quote_amount}&timestamp={timestamp_ms}"
    )
}

/// Sign `query` with `secret`, returning the lowercase hex digest.
pub fn sign_query(secret: &str, query: &str) -> GatewayResult<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| GatewayError::Signing(e.to_string()))?;
    mac.update(query.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_canonical_query_order() {
        let query = canonical_query("ABCUSDT", dec!(5.0), 1_700_000_000_000);
        assert_eq!(
            query,
            "symbol=ABCUSDT&side=BUY&type=MARKET&quoteOrderQty=5.0&timestamp=1700000000000"
        );
    }

    #[test]
    fn test_sign_query_known_vector() {
        let query = canonical_query("ABCUSDT", dec!(5.0), 1_700_000_000_000);
        let sig = sign_query("test-secret", &query).unwrap();
        assert_eq!(
            sig,
            "9257676d0ce78fa6c7f73999fc37354f6396ac6f560010d7f06b64790d724d57"
        );
    }

    #[test]
    fn test_sign_query_depends_on_secret() {
        let query = canonical_query("ABCUSDT", dec!(5.0), 1_700_000_000_000);
        let a = sign_query("test-secret", &query).unwrap();
        let b = sign_query("other-secret", &query).unwrap();
        assert_ne!(a, b);
        assert_eq!(a.len(), 64);
        assert_eq!(b.len(), 64);
    }
}
