//! CoinGecko client for batched price fetching
//!
//! Requests price, 24h change, 24h volume, and market cap for every tracked
//! asset in a single `simple/price` call. Retryable failures back off
//! exponentially; rate-limit and auth failures abandon the cycle immediately.

use super::types::{FetchError, RawPrices};
use super::MarketDataSource;
use crate::assets;
use crate::config::UpstreamConfig;
use crate::telemetry;
use async_trait::async_trait;
use reqwest::Client;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// CoinGecko API base URL
pub const COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";

/// Header carrying the request-level API key
const API_KEY_HEADER: &str = "x-cg-demo-api-key";

/// Configuration for the CoinGecko client
#[derive(Debug, Clone)]
pub struct CoinGeckoConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Request-level API key; no key means no call is attempted
    pub api_key: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
    /// Attempt budget for one fetch cycle
    pub max_attempts: u32,
    /// Backoff unit; attempt n sleeps `backoff_base * 2^n`
    pub backoff_base: Duration,
}

impl Default for CoinGeckoConfig {
    fn default() -> Self {
        Self {
            base_url: COINGECKO_API_URL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(20),
            max_attempts: 3,
            backoff_base: Duration::from_secs(1),
        }
    }
}

impl CoinGeckoConfig {
    /// Build from the service configuration
    pub fn from_config(config: &UpstreamConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            api_key: config.resolve_api_key(),
            timeout: config.timeout(),
            max_attempts: config.max_attempts,
            backoff_base: Duration::from_secs(1),
        }
    }
}

/// Client for CoinGecko's simple-price endpoint
pub struct CoinGeckoClient {
    config: CoinGeckoConfig,
    client: Client,
}

impl CoinGeckoClient {
    /// Create a new client with default configuration
    pub fn new() -> Self {
        Self::with_config(CoinGeckoConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: CoinGeckoConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    /// Perform one batched request, classifying any failure
    async fn fetch_once(&self, api_key: &str) -> Result<RawPrices, FetchError> {
        let url = format!("{}/simple/price", self.config.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("ids", assets::ids_param().as_str()),
                ("vs_currencies", "usd"),
                ("include_24hr_change", "true"),
                ("include_24hr_vol", "true"),
                ("include_market_cap", "true"),
            ])
            .header(API_KEY_HEADER, api_key)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        match status.as_u16() {
            429 => return Err(FetchError::RateLimited),
            401 | 403 => return Err(FetchError::AuthFailed(status.as_u16())),
            _ if !status.is_success() => {
                return Err(FetchError::Upstream(format!("HTTP {}", status)));
            }
            _ => {}
        }

        response
            .json::<RawPrices>()
            .await
            .map_err(|e| FetchError::Upstream(format!("Malformed payload: {}", e)))
    }
}

impl Default for CoinGeckoClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MarketDataSource for CoinGeckoClient {
    async fn fetch_prices(&self) -> Result<RawPrices, FetchError> {
        let Some(api_key) = self.config.api_key.clone() else {
            tracing::warn!("No upstream API key configured, skipping fetch");
            return Err(FetchError::MissingApiKey);
        };

        retry_fetch(
            self.config.max_attempts,
            self.config.backoff_base,
            |attempt| {
                let api_key = api_key.clone();
                async move {
                    tracing::debug!(attempt, "Fetching prices from CoinGecko");
                    self.fetch_once(&api_key).await
                }
            },
        )
        .await
    }
}

/// Map a reqwest transport error onto the fetch taxonomy
fn classify_transport_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Upstream(e.to_string())
    }
}

/// Run an operation under the bounded retry policy
///
/// Attempt n sleeps `backoff_base * 2^n` after a retryable failure (2s, 4s,
/// 8s with the 1s default), then the cycle signals fallback via `Exhausted`.
/// Terminal failures short-circuit without sleeping.
pub(crate) async fn retry_fetch<F, Fut>(
    max_attempts: u32,
    backoff_base: Duration,
    mut op: F,
) -> Result<RawPrices, FetchError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<RawPrices, FetchError>>,
{
    let mut last_error = None;

    for attempt in 1..=max_attempts {
        telemetry::record_fetch_attempt();

        match op(attempt).await {
            Ok(payload) => {
                tracing::info!(attempt, assets = payload.len(), "Upstream fetch succeeded");
                return Ok(payload);
            }
            Err(e) if e.is_terminal() => {
                if let FetchError::AuthFailed(status) = e {
                    tracing::error!(status, "Upstream auth failure, check API key configuration");
                } else {
                    tracing::warn!(attempt, error = %e, "Terminal upstream failure, using fallback");
                }
                telemetry::record_fetch_failure();
                return Err(e);
            }
            Err(e) => {
                let delay = backoff_base * 2u32.pow(attempt);
                tracing::warn!(
                    attempt,
                    error = %e,
                    delay_ms = delay.as_millis() as u64,
                    "Upstream fetch failed, backing off"
                );
                telemetry::record_fetch_failure();
                sleep(delay).await;
                last_error = Some(e);
            }
        }
    }

    Err(FetchError::Exhausted {
        attempts: max_attempts,
        last: last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "no attempts made".to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::Instant;

    #[test]
    fn test_client_creation() {
        let client = CoinGeckoClient::new();
        assert_eq!(client.config.base_url, COINGECKO_API_URL);
        assert_eq!(client.config.max_attempts, 3);
    }

    #[test]
    fn test_config_default() {
        let config = CoinGeckoConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(20));
        assert_eq!(config.backoff_base, Duration::from_secs(1));
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_from_service_config() {
        let upstream = UpstreamConfig {
            base_url: "https://pro.example.com/v3".to_string(),
            api_key: Some("CG-key".to_string()),
            timeout_secs: 10,
            max_attempts: 5,
        };

        let config = CoinGeckoConfig::from_config(&upstream);
        assert_eq!(config.base_url, "https://pro.example.com/v3");
        assert_eq!(config.api_key, Some("CG-key".to_string()));
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.max_attempts, 5);
    }

    #[tokio::test]
    async fn test_missing_api_key_skips_call() {
        let client = CoinGeckoClient::with_config(CoinGeckoConfig {
            // Unroutable base URL: a request would fail loudly if attempted
            base_url: "http://invalid.localhost.test:1".to_string(),
            api_key: None,
            ..Default::default()
        });

        let result = client.fetch_prices().await;
        assert!(matches!(result, Err(FetchError::MissingApiKey)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_exhaustion_timing() {
        let attempts = AtomicU32::new(0);
        let start = Instant::now();

        let result = retry_fetch(3, Duration::from_secs(1), |_| {
            attempts.fetch_add(1, Ordering::SeqCst);
            async { Err(FetchError::Timeout) }
        })
        .await;

        // Exactly 3 attempts, backoff 2s + 4s + 8s, then fallback signal
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
        assert_eq!(start.elapsed(), Duration::from_secs(14));
        assert!(matches!(
            result,
            Err(FetchError::Exhausted { attempts: 3, .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_terminal_failure_short_circuits() {
        let attempts = AtomicU32::new(0);
        let start = Instant::now();

        let result = retry_fetch(3, Duration::from_secs(1), |_| {
            attempts.fetch_add(1, Ordering::SeqCst);
            async { Err(FetchError::RateLimited) }
        })
        .await;

        assert_eq!(attempts.load(Ordering::SeqCst), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
        assert!(matches!(result, Err(FetchError::RateLimited)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_auth_failure_short_circuits() {
        let result = retry_fetch(3, Duration::from_secs(1), |_| async {
            Err(FetchError::AuthFailed(401))
        })
        .await;

        assert!(matches!(result, Err(FetchError::AuthFailed(401))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_recovers_after_transient_failure() {
        let attempts = AtomicU32::new(0);

        let result = retry_fetch(3, Duration::from_secs(1), |attempt| {
            attempts.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt < 2 {
                    Err(FetchError::Timeout)
                } else {
                    Ok(HashMap::new())
                }
            }
        })
        .await;

        assert!(result.is_ok());
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }
}
