//! price-relay: Real-time crypto price cache and WebSocket broadcast service
//!
//! This library provides the core components for:
//! - Batched price fetching from a CoinGecko-style market-data API
//! - Bounded retries with exponential backoff and failure classification
//! - Normalization of raw upstream payloads into ticker snapshots
//! - A two-tier cache (durable file record + in-process memory mirror)
//! - Degraded-but-successful serving via a uniform response envelope
//! - Snapshot fan-out to connected WebSocket subscribers
//! - Full observability stack

pub mod assets;
pub mod broadcast;
pub mod cache;
pub mod cli;
pub mod config;
pub mod server;
pub mod service;
pub mod telemetry;
pub mod ticker;
pub mod upstream;
