//! Ticker types

use serde::{Deserialize, Serialize};

/// Coarse market sentiment derived from 24h change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sentiment {
    Bullish,
    Bearish,
    Neutral,
}

/// One normalized market snapshot for a single asset
///
/// Field names follow the legacy wire format consumers already parse
/// (`marketCap` camelCase, the rest snake_case).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticker {
    /// Short uppercase identifier (e.g. "BTC")
    pub symbol: String,
    /// Human-readable asset name
    pub name: String,
    /// Current price in the reference currency
    pub price: f64,
    /// 24-hour percent change (signed)
    pub change: f64,
    /// 24-hour volume
    pub volume: f64,
    /// Market capitalization
    #[serde(rename = "marketCap")]
    pub market_cap: f64,
    /// 24-hour volume, duplicated under the legacy field name
    pub volume_24h: f64,
    /// 24-hour high; upstream-supplied or synthesized. `low_24h <= price <=
    /// high_24h` is a target, not a guarantee, because of synthesis jitter.
    pub high_24h: f64,
    /// 24-hour low; see `high_24h`
    pub low_24h: f64,
    /// Derived sentiment label
    pub sentiment: Sentiment,
}

/// The full ordered set of tickers from one fetch cycle, in canonical
/// tracked-asset order
pub type Snapshot = Vec<Ticker>;
