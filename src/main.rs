use clap::Parser;
use price_relay::cli::{Cli, Commands};
use price_relay::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&cli.config).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
        eprintln!("Using default configuration");
        toml::from_str(include_str!("../config.toml.example")).expect("Invalid default config")
    });

    // Initialize telemetry
    let _guard = price_relay::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Serve(args) => {
            tracing::info!("Starting price relay service");
            args.execute(&config).await?;
        }
        Commands::Fetch(args) => {
            args.execute(&config).await?;
        }
        Commands::Status => {
            println!("price-relay status");
            println!("  Tracked assets: {}", price_relay::assets::TRACKED_ASSETS.len());
            println!("  Status: Not running");
        }
        Commands::Config => {
            println!("Current configuration:");
            println!("  Upstream: {}", config.upstream.base_url);
            println!(
                "  API key: {}",
                if config.upstream.resolve_api_key().is_some() {
                    "configured"
                } else {
                    "missing"
                }
            );
            println!(
                "  Cache: {} (fresh {}s, stale {}s)",
                config.cache.dir.display(),
                config.cache.fresh_ttl_secs,
                config.cache.stale_ttl_secs
            );
            println!(
                "  Server: {} (refresh every {}s)",
                config.server.bind_addr, config.server.refresh_interval_secs
            );
        }
    }

    Ok(())
}
