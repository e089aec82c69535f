//! Upstream market-data source
//!
//! One batched HTTP call per fetch cycle, with bounded retries, exponential
//! backoff, and failure classification. Failures never escape as panics;
//! callers always get a payload or a classified `FetchError`.

mod coingecko;
mod types;

pub use coingecko::{CoinGeckoClient, CoinGeckoConfig, COINGECKO_API_URL};
pub use types::{FetchError, RawAssetPrice, RawPrices};

use async_trait::async_trait;

/// Trait for batched market-data sources
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Fetch raw fields for all tracked assets in one call cycle
    async fn fetch_prices(&self) -> Result<RawPrices, FetchError>;
}
