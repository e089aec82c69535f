//! CLI interface for price-relay
//!
//! Provides subcommands for:
//! - `serve`: Run the refresh loop and subscriber endpoint
//! - `fetch`: One-shot snapshot to stdout
//! - `status`: Show current state
//! - `config`: Show configuration

mod fetch;
mod serve;

pub use fetch::FetchArgs;
pub use serve::ServeArgs;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "price-relay")]
#[command(about = "Real-time crypto price cache and WebSocket broadcast service")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the refresh loop and subscriber endpoint
    Serve(ServeArgs),
    /// Fetch one snapshot and print it
    Fetch(FetchArgs),
    /// Show current state
    Status,
    /// Show configuration
    Config,
}
