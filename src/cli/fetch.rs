//! Fetch command implementation

use crate::assets;
use crate::broadcast::{Broadcaster, SubscriberRegistry};
use crate::cache::PriceCache;
use crate::config::Config;
use crate::service::PriceService;
use crate::upstream::{CoinGeckoClient, CoinGeckoConfig};
use clap::Args;
use std::sync::Arc;

#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Pretty-print the JSON output
    #[arg(short, long)]
    pub pretty: bool,
}

impl FetchArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        assets::validate_assets()?;

        let registry = Arc::new(SubscriberRegistry::default());
        let source = Arc::new(CoinGeckoClient::with_config(CoinGeckoConfig::from_config(
            &config.upstream,
        )));
        let service = PriceService::new(
            PriceCache::from_config(&config.cache),
            source,
            Broadcaster::new(registry),
        );

        service.warm_cache().await;
        let response = service.get_prices().await;

        let json = if self.pretty {
            serde_json::to_string_pretty(&response)?
        } else {
            serde_json::to_string(&response)?
        };
        println!("{}", json);

        Ok(())
    }
}
