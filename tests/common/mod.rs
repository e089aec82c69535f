//! Shared test fixtures

// Not every test binary exercises every fixture
#![allow(dead_code)]

use async_trait::async_trait;
use price_relay::broadcast::{Broadcaster, SubscriberRegistry};
use price_relay::cache::{FileStore, PriceCache};
use price_relay::service::PriceService;
use price_relay::upstream::{FetchError, MarketDataSource, RawAssetPrice, RawPrices};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

/// Upstream source with a fixed outcome and a call counter
pub struct MockSource {
    calls: AtomicUsize,
    fail: bool,
}

impl MockSource {
    pub fn ok() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: true,
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn payload() -> RawPrices {
        let mut payload = HashMap::new();
        payload.insert(
            "bitcoin".to_string(),
            RawAssetPrice {
                usd: Some(50000.0),
                usd_24h_change: Some(3.2),
                usd_24h_vol: Some(1e9),
                usd_market_cap: Some(1e12),
                ..Default::default()
            },
        );
        payload.insert(
            "ethereum".to_string(),
            RawAssetPrice {
                usd: Some(3000.0),
                usd_24h_change: Some(-2.5),
                usd_24h_vol: Some(5e8),
                usd_market_cap: Some(4e11),
                ..Default::default()
            },
        );
        payload
    }
}

#[async_trait]
impl MarketDataSource for MockSource {
    async fn fetch_prices(&self) -> Result<RawPrices, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(FetchError::Timeout)
        } else {
            Ok(Self::payload())
        }
    }
}

/// A fully wired service over a temp cache directory and mock source
pub struct Harness {
    pub service: Arc<PriceService>,
    pub source: Arc<MockSource>,
    pub registry: Arc<SubscriberRegistry>,
    _dir: TempDir,
}

pub fn harness(source: MockSource) -> Harness {
    let dir = TempDir::new().unwrap();
    let cache = PriceCache::new(
        FileStore::new(dir.path()),
        chrono::Duration::minutes(10),
        chrono::Duration::minutes(30),
    );
    let registry = Arc::new(SubscriberRegistry::new(16));
    let source = Arc::new(source);
    let service = Arc::new(PriceService::new(
        cache,
        source.clone(),
        Broadcaster::new(registry.clone()),
    ));

    Harness {
        service,
        source,
        registry,
        _dir: dir,
    }
}
