//! Price service orchestration
//!
//! Ties the cache chain, the upstream fetcher, and the broadcaster together
//! behind one operation: `get_prices`. Callers always receive a valid
//! snapshot; upstream failures degrade through stale tiers down to a
//! hard-coded minimal snapshot, flagged by the response envelope.

use crate::broadcast::Broadcaster;
use crate::cache::PriceCache;
use crate::ticker::{fallback_snapshot, transform, Snapshot};
use crate::upstream::{FetchError, MarketDataSource};
use chrono::Utc;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Uniform response envelope for price consumers
///
/// `success` is always true: a degraded answer is still an answer. The
/// flags let consumers distinguish fresh, cached, stale, and placeholder
/// data without failing the request.
#[derive(Debug, Clone, Serialize)]
pub struct PriceResponse {
    pub success: bool,
    pub data: Snapshot,
    pub cached: bool,
    pub stale: bool,
    pub fallback: bool,
}

impl PriceResponse {
    fn fresh(data: Snapshot) -> Self {
        Self {
            success: true,
            data,
            cached: false,
            stale: false,
            fallback: false,
        }
    }

    fn cached(data: Snapshot) -> Self {
        Self {
            success: true,
            data,
            cached: true,
            stale: false,
            fallback: false,
        }
    }

    fn stale(data: Snapshot) -> Self {
        Self {
            success: true,
            data,
            cached: true,
            stale: true,
            fallback: false,
        }
    }

    fn fallback(data: Snapshot) -> Self {
        Self {
            success: true,
            data,
            cached: false,
            stale: false,
            fallback: true,
        }
    }
}

/// Orchestrates fetch, cache, and broadcast for the tracked asset set
///
/// Constructed once at process start; every dependency is injected so tests
/// can run isolated instances with mock sources and temp cache directories.
pub struct PriceService {
    cache: PriceCache,
    source: Arc<dyn MarketDataSource>,
    broadcaster: Broadcaster,
    // Single-flight guard: concurrent cache misses collapse into one fetch
    fetch_lock: Mutex<()>,
    // Completed-flight counter. A successful flight leaves a fresh cache
    // entry; a failed one only advances this, so queued waiters can tell a
    // flight finished and inherit its outcome instead of fetching again.
    flights: AtomicU64,
}

impl PriceService {
    /// Create a service over the given cache, source, and broadcaster
    pub fn new(cache: PriceCache, source: Arc<dyn MarketDataSource>, broadcaster: Broadcaster) -> Self {
        Self {
            cache,
            source,
            broadcaster,
            fetch_lock: Mutex::new(()),
            flights: AtomicU64::new(0),
        }
    }

    /// Warm the memory mirror from the durable record at startup
    pub async fn warm_cache(&self) -> bool {
        self.cache.warm(Utc::now()).await
    }

    /// Get the current snapshot, fetching upstream only on a full cache miss
    ///
    /// Chain: durable-fresh, memory-fresh, fetch (single-flight), then
    /// durable-stale, memory-stale, and finally the minimal fallback
    /// snapshot. Never returns an error.
    pub async fn get_prices(&self) -> PriceResponse {
        if let Some((entry, tier)) = self.cache.read_fresh(Utc::now()).await {
            tracing::debug!(?tier, "Serving fresh cached prices");
            return PriceResponse::cached(entry.tickers);
        }

        let observed_flight = self.flights.load(Ordering::Acquire);
        let _guard = self.fetch_lock.lock().await;

        // Another request may have completed the fetch while we waited
        if let Some((entry, tier)) = self.cache.read_fresh(Utc::now()).await {
            tracing::debug!(?tier, "Fetch already completed by concurrent request");
            return PriceResponse::cached(entry.tickers);
        }

        // A flight finished while we queued but left nothing fresh: it
        // failed, and its outcome covers every waiter of that flight
        if self.flights.load(Ordering::Acquire) != observed_flight {
            tracing::debug!("Inheriting failed fetch from concurrent request");
            return self.degraded().await;
        }

        let outcome = self.refresh().await;
        self.flights.fetch_add(1, Ordering::Release);

        match outcome {
            Ok(snapshot) => PriceResponse::fresh(snapshot),
            Err(e) => {
                tracing::warn!(error = %e, "Upstream fetch failed, trying stale tiers");
                self.degraded().await
            }
        }
    }

    /// Serve the best degraded answer: a usable stale tier, else the
    /// minimal hard-coded snapshot
    async fn degraded(&self) -> PriceResponse {
        if let Some((entry, tier)) = self.cache.read_stale(Utc::now()).await {
            tracing::info!(
                ?tier,
                age_secs = entry.age(Utc::now()).num_seconds(),
                "Serving stale cached prices"
            );
            return PriceResponse::stale(entry.tickers);
        }

        tracing::warn!("No usable cache at any tier, serving minimal fallback");
        PriceResponse::fallback(fallback_snapshot())
    }

    /// Fetch, transform, persist, and broadcast one fresh snapshot
    async fn refresh(&self) -> Result<Snapshot, FetchError> {
        let raw = self.source.fetch_prices().await?;
        let snapshot = transform(&raw);

        if snapshot.is_empty() {
            // A payload with no tracked assets is indistinguishable from an
            // upstream outage for our consumers
            return Err(FetchError::Upstream(
                "payload contained no tracked assets".to_string(),
            ));
        }

        let now = Utc::now();
        if let Err(e) = self.cache.store(snapshot.clone(), now).await {
            tracing::error!(error = %e, "Failed to persist snapshot, serving it anyway");
        }

        self.broadcaster.broadcast(&snapshot, now).await;
        Ok(snapshot)
    }

    /// Periodically refresh so subscribers keep receiving fresh snapshots
    ///
    /// Each tick goes through `get_prices`, so a still-fresh cache results in
    /// no upstream call and no broadcast.
    pub async fn run_refresh_loop(self: Arc<Self>, period: std::time::Duration) {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            interval.tick().await;
            let response = self.get_prices().await;
            tracing::debug!(
                tickers = response.data.len(),
                cached = response.cached,
                stale = response.stale,
                fallback = response.fallback,
                "Scheduled refresh"
            );
        }
    }
}
