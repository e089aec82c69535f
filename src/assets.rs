//! Canonical tracked-asset table
//!
//! Maps upstream asset identifiers to display symbols and names. The table's
//! iteration order is the snapshot order every consumer sees, so entries are
//! kept in rough market-cap order and never reordered casually.

/// One tracked asset: upstream id plus display metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackedAsset {
    /// Upstream identifier (CoinGecko id)
    pub id: &'static str,
    /// Short uppercase symbol
    pub symbol: &'static str,
    /// Human-readable name
    pub name: &'static str,
}

/// The full tracked-asset list, in canonical snapshot order
pub const TRACKED_ASSETS: &[TrackedAsset] = &[
    TrackedAsset { id: "bitcoin", symbol: "BTC", name: "Bitcoin" },
    TrackedAsset { id: "ethereum", symbol: "ETH", name: "Ethereum" },
    TrackedAsset { id: "tether", symbol: "USDT", name: "Tether" },
    TrackedAsset { id: "binancecoin", symbol: "BNB", name: "BNB" },
    TrackedAsset { id: "solana", symbol: "SOL", name: "Solana" },
    TrackedAsset { id: "usd-coin", symbol: "USDC", name: "USD Coin" },
    TrackedAsset { id: "ripple", symbol: "XRP", name: "XRP" },
    TrackedAsset { id: "cardano", symbol: "ADA", name: "Cardano" },
    TrackedAsset { id: "dogecoin", symbol: "DOGE", name: "Dogecoin" },
    TrackedAsset { id: "avalanche-2", symbol: "AVAX", name: "Avalanche" },
    TrackedAsset { id: "tron", symbol: "TRX", name: "TRON" },
    TrackedAsset { id: "the-open-network", symbol: "TON", name: "Toncoin" },
    TrackedAsset { id: "polkadot", symbol: "DOT", name: "Polkadot" },
    TrackedAsset { id: "chainlink", symbol: "LINK", name: "Chainlink" },
    TrackedAsset { id: "matic-network", symbol: "MATIC", name: "Polygon" },
    TrackedAsset { id: "wrapped-bitcoin", symbol: "WBTC", name: "Wrapped Bitcoin" },
    TrackedAsset { id: "shiba-inu", symbol: "SHIB", name: "Shiba Inu" },
    TrackedAsset { id: "dai", symbol: "DAI", name: "Dai" },
    TrackedAsset { id: "litecoin", symbol: "LTC", name: "Litecoin" },
    TrackedAsset { id: "bitcoin-cash", symbol: "BCH", name: "Bitcoin Cash" },
    TrackedAsset { id: "uniswap", symbol: "UNI", name: "Uniswap" },
    TrackedAsset { id: "cosmos", symbol: "ATOM", name: "Cosmos Hub" },
    TrackedAsset { id: "leo-token", symbol: "LEO", name: "LEO Token" },
    TrackedAsset { id: "ethereum-classic", symbol: "ETC", name: "Ethereum Classic" },
    TrackedAsset { id: "stellar", symbol: "XLM", name: "Stellar" },
    TrackedAsset { id: "okb", symbol: "OKB", name: "OKB" },
    TrackedAsset { id: "monero", symbol: "XMR", name: "Monero" },
    TrackedAsset { id: "kaspa", symbol: "KAS", name: "Kaspa" },
    TrackedAsset { id: "filecoin", symbol: "FIL", name: "Filecoin" },
    TrackedAsset { id: "hedera-hashgraph", symbol: "HBAR", name: "Hedera" },
    TrackedAsset { id: "internet-computer", symbol: "ICP", name: "Internet Computer" },
    TrackedAsset { id: "crypto-com-chain", symbol: "CRO", name: "Cronos" },
    TrackedAsset { id: "aptos", symbol: "APT", name: "Aptos" },
    TrackedAsset { id: "arbitrum", symbol: "ARB", name: "Arbitrum" },
    TrackedAsset { id: "vechain", symbol: "VET", name: "VeChain" },
    TrackedAsset { id: "near", symbol: "NEAR", name: "NEAR Protocol" },
    TrackedAsset { id: "optimism", symbol: "OP", name: "Optimism" },
    TrackedAsset { id: "maker", symbol: "MKR", name: "Maker" },
    TrackedAsset { id: "aave", symbol: "AAVE", name: "Aave" },
    TrackedAsset { id: "quant-network", symbol: "QNT", name: "Quant" },
    TrackedAsset { id: "the-graph", symbol: "GRT", name: "The Graph" },
    TrackedAsset { id: "algorand", symbol: "ALGO", name: "Algorand" },
    TrackedAsset { id: "stacks", symbol: "STX", name: "Stacks" },
    TrackedAsset { id: "multiversx-egld", symbol: "EGLD", name: "MultiversX" },
    TrackedAsset { id: "the-sandbox", symbol: "SAND", name: "The Sandbox" },
    TrackedAsset { id: "decentraland", symbol: "MANA", name: "Decentraland" },
    TrackedAsset { id: "axie-infinity", symbol: "AXS", name: "Axie Infinity" },
    TrackedAsset { id: "theta-token", symbol: "THETA", name: "Theta Network" },
    TrackedAsset { id: "tezos", symbol: "XTZ", name: "Tezos" },
    TrackedAsset { id: "immutable-x", symbol: "IMX", name: "Immutable" },
    TrackedAsset { id: "fantom", symbol: "FTM", name: "Fantom" },
    TrackedAsset { id: "render-token", symbol: "RNDR", name: "Render" },
    TrackedAsset { id: "injective-protocol", symbol: "INJ", name: "Injective" },
    TrackedAsset { id: "eos", symbol: "EOS", name: "EOS" },
    TrackedAsset { id: "flow", symbol: "FLOW", name: "Flow" },
    TrackedAsset { id: "gala", symbol: "GALA", name: "Gala" },
    TrackedAsset { id: "chiliz", symbol: "CHZ", name: "Chiliz" },
    TrackedAsset { id: "klay-token", symbol: "KLAY", name: "Klaytn" },
    TrackedAsset { id: "sui", symbol: "SUI", name: "Sui" },
    TrackedAsset { id: "sei-network", symbol: "SEI", name: "Sei" },
    TrackedAsset { id: "thorchain", symbol: "RUNE", name: "THORChain" },
    TrackedAsset { id: "curve-dao-token", symbol: "CRV", name: "Curve DAO" },
    TrackedAsset { id: "pancakeswap-token", symbol: "CAKE", name: "PancakeSwap" },
    TrackedAsset { id: "mina-protocol", symbol: "MINA", name: "Mina" },
    TrackedAsset { id: "neo", symbol: "NEO", name: "NEO" },
    TrackedAsset { id: "iota", symbol: "IOTA", name: "IOTA" },
    TrackedAsset { id: "bitcoin-sv", symbol: "BSV", name: "Bitcoin SV" },
    TrackedAsset { id: "kucoin-shares", symbol: "KCS", name: "KuCoin Token" },
    TrackedAsset { id: "zcash", symbol: "ZEC", name: "Zcash" },
    TrackedAsset { id: "dash", symbol: "DASH", name: "Dash" },
    TrackedAsset { id: "gatechain-token", symbol: "GT", name: "Gate Token" },
    TrackedAsset { id: "trust-wallet-token", symbol: "TWT", name: "Trust Wallet Token" },
    TrackedAsset { id: "conflux-token", symbol: "CFX", name: "Conflux" },
    TrackedAsset { id: "pepe", symbol: "PEPE", name: "Pepe" },
    TrackedAsset { id: "floki", symbol: "FLOKI", name: "FLOKI" },
    TrackedAsset { id: "bonk", symbol: "BONK", name: "Bonk" },
    TrackedAsset { id: "rocket-pool", symbol: "RPL", name: "Rocket Pool" },
    TrackedAsset { id: "havven", symbol: "SNX", name: "Synthetix" },
    TrackedAsset { id: "compound-governance-token", symbol: "COMP", name: "Compound" },
    TrackedAsset { id: "1inch", symbol: "1INCH", name: "1inch" },
    TrackedAsset { id: "nexo", symbol: "NEXO", name: "Nexo" },
    TrackedAsset { id: "enjincoin", symbol: "ENJ", name: "Enjin Coin" },
    TrackedAsset { id: "basic-attention-token", symbol: "BAT", name: "Basic Attention Token" },
    TrackedAsset { id: "zilliqa", symbol: "ZIL", name: "Zilliqa" },
    TrackedAsset { id: "loopring", symbol: "LRC", name: "Loopring" },
    TrackedAsset { id: "celestia", symbol: "TIA", name: "Celestia" },
    TrackedAsset { id: "waves", symbol: "WAVES", name: "Waves" },
    TrackedAsset { id: "kava", symbol: "KAVA", name: "Kava" },
    TrackedAsset { id: "harmony", symbol: "ONE", name: "Harmony" },
    TrackedAsset { id: "qtum", symbol: "QTUM", name: "Qtum" },
    TrackedAsset { id: "ravencoin", symbol: "RVN", name: "Ravencoin" },
    TrackedAsset { id: "ankr", symbol: "ANKR", name: "Ankr" },
    TrackedAsset { id: "fetch-ai", symbol: "FET", name: "Fetch.ai" },
    TrackedAsset { id: "ocean-protocol", symbol: "OCEAN", name: "Ocean Protocol" },
    TrackedAsset { id: "dydx", symbol: "DYDX", name: "dYdX" },
    TrackedAsset { id: "arweave", symbol: "AR", name: "Arweave" },
    TrackedAsset { id: "helium", symbol: "HNT", name: "Helium" },
    TrackedAsset { id: "worldcoin-wld", symbol: "WLD", name: "Worldcoin" },
    TrackedAsset { id: "blur", symbol: "BLUR", name: "Blur" },
    TrackedAsset { id: "lido-dao", symbol: "LDO", name: "Lido DAO" },
    TrackedAsset { id: "osmosis", symbol: "OSMO", name: "Osmosis" },
    TrackedAsset { id: "terra-luna-2", symbol: "LUNA", name: "Terra" },
];

/// Validate the tracked-asset table at startup
///
/// A malformed table is a programmer error and fails fast rather than
/// producing corrupt snapshots per request.
pub fn validate_assets() -> anyhow::Result<()> {
    if TRACKED_ASSETS.is_empty() {
        anyhow::bail!("Tracked asset table is empty");
    }

    let mut ids = std::collections::HashSet::new();
    let mut symbols = std::collections::HashSet::new();

    for asset in TRACKED_ASSETS {
        if asset.id.is_empty() || asset.symbol.is_empty() || asset.name.is_empty() {
            anyhow::bail!("Tracked asset with empty field: {:?}", asset);
        }
        if asset.symbol != asset.symbol.to_uppercase() {
            anyhow::bail!("Asset symbol not uppercase: {}", asset.symbol);
        }
        if !ids.insert(asset.id) {
            anyhow::bail!("Duplicate asset id: {}", asset.id);
        }
        if !symbols.insert(asset.symbol) {
            anyhow::bail!("Duplicate asset symbol: {}", asset.symbol);
        }
    }

    Ok(())
}

/// Comma-joined id list for the batched upstream request
pub fn ids_param() -> String {
    TRACKED_ASSETS
        .iter()
        .map(|a| a.id)
        .collect::<Vec<_>>()
        .join(",")
}

/// Look up a tracked asset by upstream id
pub fn asset_by_id(id: &str) -> Option<&'static TrackedAsset> {
    TRACKED_ASSETS.iter().find(|a| a.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_valid() {
        validate_assets().unwrap();
    }

    #[test]
    fn test_table_size() {
        // On the order of 100 tracked assets
        assert!(TRACKED_ASSETS.len() >= 90);
    }

    #[test]
    fn test_bitcoin_first() {
        assert_eq!(TRACKED_ASSETS[0].id, "bitcoin");
        assert_eq!(TRACKED_ASSETS[0].symbol, "BTC");
    }

    #[test]
    fn test_ids_param_contains_all() {
        let param = ids_param();
        assert!(param.starts_with("bitcoin,ethereum,"));
        assert_eq!(param.matches(',').count(), TRACKED_ASSETS.len() - 1);
    }

    #[test]
    fn test_asset_by_id() {
        let eth = asset_by_id("ethereum").unwrap();
        assert_eq!(eth.symbol, "ETH");
        assert_eq!(eth.name, "Ethereum");
        assert!(asset_by_id("not-an-asset").is_none());
    }
}
