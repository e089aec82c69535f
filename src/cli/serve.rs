//! Serve command implementation

use crate::assets;
use crate::broadcast::{Broadcaster, SubscriberRegistry};
use crate::cache::PriceCache;
use crate::config::Config;
use crate::server::WsServer;
use crate::service::PriceService;
use crate::upstream::{CoinGeckoClient, CoinGeckoConfig};
use clap::Args;
use std::sync::Arc;
use std::time::Duration;

#[derive(Args, Debug)]
pub struct ServeArgs {}

impl ServeArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        assets::validate_assets()?;

        let registry = Arc::new(SubscriberRegistry::new(config.server.subscriber_buffer));
        let source = Arc::new(CoinGeckoClient::with_config(CoinGeckoConfig::from_config(
            &config.upstream,
        )));
        let service = Arc::new(PriceService::new(
            PriceCache::from_config(&config.cache),
            source,
            Broadcaster::new(registry.clone()),
        ));

        if service.warm_cache().await {
            tracing::info!("Serving warmed cache until first refresh");
        }

        let refresh = tokio::spawn(
            service
                .clone()
                .run_refresh_loop(Duration::from_secs(config.server.refresh_interval_secs)),
        );

        let server = WsServer::new(config.server.bind_addr.clone(), registry, service);
        let result = server.run().await;

        refresh.abort();
        result
    }
}
