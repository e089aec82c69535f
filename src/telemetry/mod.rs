//! Telemetry module
//!
//! Structured logging and Prometheus metrics

mod logging;
mod metrics;

pub use logging::init_logging;
pub use metrics::{
    record_broadcast, record_cache_hit, record_fetch_attempt, record_fetch_failure,
    set_subscriber_count,
};

use crate::config::TelemetryConfig;

/// Guard that cleans up telemetry on drop
pub struct TelemetryGuard {
    _priv: (),
}

/// Initialize all telemetry subsystems
pub fn init_telemetry(config: &TelemetryConfig) -> anyhow::Result<TelemetryGuard> {
    init_logging(&config.log_level)?;
    metrics::init_metrics(config.metrics_port)?;

    Ok(TelemetryGuard { _priv: () })
}
