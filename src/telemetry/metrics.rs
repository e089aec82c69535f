//! Prometheus metrics

use crate::cache::CacheTier;
use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint on the given port
pub(super) fn init_metrics(port: u16) -> anyhow::Result<()> {
    PrometheusBuilder::new()
        .with_http_listener(([0, 0, 0, 0], port))
        .install()
        .map_err(|e| anyhow::anyhow!("Failed to start metrics exporter: {}", e))?;

    tracing::info!(port, "Metrics exporter listening");
    Ok(())
}

/// Count one upstream fetch attempt
pub fn record_fetch_attempt() {
    counter!("pricerelay_fetch_attempts_total").increment(1);
}

/// Count one classified upstream fetch failure
pub fn record_fetch_failure() {
    counter!("pricerelay_fetch_failures_total").increment(1);
}

/// Count a cache hit, labeled by the tier that satisfied it
pub fn record_cache_hit(tier: CacheTier) {
    let tier_label = match tier {
        CacheTier::FileFresh => "file_fresh",
        CacheTier::MemoryFresh => "memory_fresh",
        CacheTier::FileStale => "file_stale",
        CacheTier::MemoryStale => "memory_stale",
    };
    counter!("pricerelay_cache_hits_total", "tier" => tier_label).increment(1);
}

/// Count one broadcast and how many subscribers received it
pub fn record_broadcast(delivered: usize) {
    counter!("pricerelay_broadcasts_total").increment(1);
    counter!("pricerelay_broadcast_deliveries_total").increment(delivered as u64);
}

/// Track the current subscriber count
pub fn set_subscriber_count(count: usize) {
    gauge!("pricerelay_subscribers").set(count as f64);
}
