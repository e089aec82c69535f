//! Raw payload → snapshot transformer
//!
//! Pure field mapping plus two derivations: a sentiment label from 24h
//! change, and a synthesized 24h range when upstream supplies none. The
//! synthesized range back-solves the price 24h ago from the percent change
//! and does not reflect the true intraday extremes; it is a deliberate
//! approximation, kept for wire compatibility with the legacy endpoint.

use super::types::{Sentiment, Snapshot, Ticker};
use crate::assets::TRACKED_ASSETS;
use crate::upstream::RawPrices;
use rand::Rng;

/// Percent-change threshold separating Bullish/Bearish from Neutral
pub const SENTIMENT_THRESHOLD_PCT: f64 = 2.0;

/// Jitter band applied to a synthesized range, as fractions of price
const JITTER_MIN: f64 = 0.005;
const JITTER_MAX: f64 = 0.02;

/// Derive a sentiment label from the 24h percent change
///
/// Strict comparisons: exactly ±2.0 is Neutral.
pub fn sentiment_for(change: f64) -> Sentiment {
    if change > SENTIMENT_THRESHOLD_PCT {
        Sentiment::Bullish
    } else if change < -SENTIMENT_THRESHOLD_PCT {
        Sentiment::Bearish
    } else {
        Sentiment::Neutral
    }
}

/// Synthesize a pre-jitter (low, high) pair from price and 24h change
///
/// `change >= 0` treats the current price as the approximate high and
/// back-solves the low; `change < 0` does the opposite. A change at or below
/// -100% would make the divisor non-positive, so it degenerates to a flat
/// range at the current price.
pub fn derived_range(price: f64, change: f64) -> (f64, f64) {
    let base = if change <= -100.0 {
        price
    } else {
        price / (1.0 + change / 100.0)
    };

    if change >= 0.0 {
        (base, price)
    } else {
        (price, base)
    }
}

/// Expand a synthesized range outward by a small random jitter
///
/// Avoids degenerate high == low == price output when change is 0.
fn jittered_range(price: f64, change: f64, rng: &mut impl Rng) -> (f64, f64) {
    let (low, high) = derived_range(price, change);
    let up: f64 = rng.random_range(JITTER_MIN..=JITTER_MAX);
    let down: f64 = rng.random_range(JITTER_MIN..=JITTER_MAX);
    (low * (1.0 - down), high * (1.0 + up))
}

/// Transform a raw upstream payload into an ordered snapshot
///
/// Iterates the canonical tracked-asset list, so output order is fixed and
/// independent of upstream response order. Assets absent from the payload
/// are silently omitted; missing numeric fields default to 0.
pub fn transform_with_rng(raw: &RawPrices, rng: &mut impl Rng) -> Snapshot {
    let mut tickers = Vec::with_capacity(TRACKED_ASSETS.len());

    for asset in TRACKED_ASSETS {
        let Some(fields) = raw.get(asset.id) else {
            continue;
        };

        let price = fields.usd.unwrap_or(0.0);
        let change = fields.usd_24h_change.unwrap_or(0.0);
        let volume = fields.usd_24h_vol.unwrap_or(0.0);
        let market_cap = fields.usd_market_cap.unwrap_or(0.0);

        let (low_24h, high_24h) = match (fields.low_24h, fields.high_24h) {
            (Some(low), Some(high)) => (low, high),
            _ => jittered_range(price, change, rng),
        };

        tickers.push(Ticker {
            symbol: asset.symbol.to_string(),
            name: asset.name.to_string(),
            price,
            change,
            volume,
            market_cap,
            volume_24h: volume,
            high_24h,
            low_24h,
            sentiment: sentiment_for(change),
        });
    }

    tickers
}

/// Transform with the thread-local RNG
pub fn transform(raw: &RawPrices) -> Snapshot {
    transform_with_rng(raw, &mut rand::rng())
}
