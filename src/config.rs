//! Configuration types for price-relay

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
}

/// Upstream market-data API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL of the market-data API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key sent as a request header. Falls back to the
    /// COINGECKO_API_KEY environment variable when unset.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Per-request timeout (seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Attempt budget for one fetch cycle
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

fn default_base_url() -> String {
    "https://api.coingecko.com/api/v3".to_string()
}
fn default_timeout_secs() -> u64 {
    20
}
fn default_max_attempts() -> u32 {
    3
}

impl UpstreamConfig {
    /// Resolve the API key from config or environment
    pub fn resolve_api_key(&self) -> Option<String> {
        self.resolve_api_key_with(std::env::var("COINGECKO_API_KEY").ok())
    }

    // Resolution against an explicit environment value, so tests never
    // read or mutate the process environment
    fn resolve_api_key_with(&self, env_key: Option<String>) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| env_key.filter(|k| !k.is_empty()))
    }

    /// Request timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Two-tier cache configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Directory holding durable cache records
    #[serde(default = "default_cache_dir")]
    pub dir: PathBuf,

    /// Primary freshness window (seconds)
    #[serde(default = "default_fresh_ttl_secs")]
    pub fresh_ttl_secs: u64,

    /// Outer stale-but-usable window (seconds)
    #[serde(default = "default_stale_ttl_secs")]
    pub stale_ttl_secs: u64,
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("./cache")
}
fn default_fresh_ttl_secs() -> u64 {
    600 // 10 minutes
}
fn default_stale_ttl_secs() -> u64 {
    1800 // 30 minutes
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: default_cache_dir(),
            fresh_ttl_secs: 600,
            stale_ttl_secs: 1800,
        }
    }
}

/// WebSocket server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address for the subscriber endpoint
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Interval between scheduled snapshot refreshes (seconds)
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,

    /// Per-subscriber outbound frame buffer
    #[serde(default = "default_subscriber_buffer")]
    pub subscriber_buffer: usize,
}

fn default_bind_addr() -> String {
    "0.0.0.0:8081".to_string()
}
fn default_refresh_interval_secs() -> u64 {
    300
}
fn default_subscriber_buffer() -> usize {
    64
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            refresh_interval_secs: 300,
            subscriber_buffer: 64,
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    pub metrics_port: u16,
    pub log_level: String,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}
