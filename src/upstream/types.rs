//! Upstream payload and error types

use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

/// Raw per-asset fields from the batched price endpoint
///
/// Every field is optional; the transformer defaults missing numerics to 0.
/// `high_24h`/`low_24h` are absent from the simple-price endpoint but kept
/// for sources that do supply a true intraday range.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct RawAssetPrice {
    #[serde(default)]
    pub usd: Option<f64>,
    #[serde(default)]
    pub usd_24h_change: Option<f64>,
    #[serde(default)]
    pub usd_24h_vol: Option<f64>,
    #[serde(default)]
    pub usd_market_cap: Option<f64>,
    #[serde(default)]
    pub high_24h: Option<f64>,
    #[serde(default)]
    pub low_24h: Option<f64>,
}

/// Map of upstream asset id to raw fields, as returned by one batched call
pub type RawPrices = HashMap<String, RawAssetPrice>;

/// Classified fetch failures
///
/// Terminal variants abandon the attempt cycle immediately; the rest are
/// retried until the attempt budget runs out. Callers treat every variant as
/// "use the cache chain", never as a hard error.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// No API key configured; no call is attempted
    #[error("no upstream API key configured")]
    MissingApiKey,
    /// HTTP 429 from upstream
    #[error("upstream rate limited (HTTP 429)")]
    RateLimited,
    /// HTTP 401/403 from upstream; a configuration problem, not a blip
    #[error("upstream auth failure (HTTP {0})")]
    AuthFailed(u16),
    /// Request exceeded its timeout
    #[error("upstream request timed out")]
    Timeout,
    /// Other transport or server-side failure
    #[error("upstream error: {0}")]
    Upstream(String),
    /// Retry budget exhausted; wraps the final failure
    #[error("retry budget exhausted after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: String },
}

impl FetchError {
    /// Whether this failure ends the attempt cycle immediately
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            FetchError::MissingApiKey
                | FetchError::RateLimited
                | FetchError::AuthFailed(_)
                | FetchError::Exhausted { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_price_deserialize() {
        let json = r#"{
            "usd": 50000.0,
            "usd_24h_change": 3.2,
            "usd_24h_vol": 1000000000.0,
            "usd_market_cap": 1000000000000.0
        }"#;

        let raw: RawAssetPrice = serde_json::from_str(json).unwrap();
        assert_eq!(raw.usd, Some(50000.0));
        assert_eq!(raw.usd_24h_change, Some(3.2));
        assert!(raw.high_24h.is_none());
    }

    #[test]
    fn test_raw_price_missing_fields() {
        let raw: RawAssetPrice = serde_json::from_str(r#"{"usd": 1.0}"#).unwrap();
        assert_eq!(raw.usd, Some(1.0));
        assert!(raw.usd_24h_change.is_none());
        assert!(raw.usd_market_cap.is_none());
    }

    #[test]
    fn test_raw_prices_map() {
        let json = r#"{
            "bitcoin": {"usd": 50000.0},
            "ethereum": {"usd": 3000.0}
        }"#;

        let prices: RawPrices = serde_json::from_str(json).unwrap();
        assert_eq!(prices.len(), 2);
        assert_eq!(prices["bitcoin"].usd, Some(50000.0));
    }

    #[test]
    fn test_terminal_classification() {
        assert!(FetchError::MissingApiKey.is_terminal());
        assert!(FetchError::RateLimited.is_terminal());
        assert!(FetchError::AuthFailed(401).is_terminal());
        assert!(!FetchError::Timeout.is_terminal());
        assert!(!FetchError::Upstream("503".to_string()).is_terminal());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            FetchError::AuthFailed(403).to_string(),
            "upstream auth failure (HTTP 403)"
        );
        let err = FetchError::Exhausted {
            attempts: 3,
            last: "upstream request timed out".to_string(),
        };
        assert!(err.to_string().contains("after 3 attempts"));
    }
}
