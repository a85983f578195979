use async_trait::async_trait;
use models::{AssetPrice, FallbackPrices, OraclePrices, PriceSource};
use std::sync::Arc;

use crate::error::{ChainError, Result};
use crate::rpc::RpcClient;
use crate::units::{decode_word, format_units};

/// Selector of the oracle's `read() returns (uint256 val, uint256 age)`.
pub const READ_SELECTOR: &str = "0x57de26a4";

const PRICE_DECIMALS: u32 = 18;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Asset {
    Eth,
    Btc,
}

impl Asset {
    pub fn symbol(&self) -> &'static str {
        match self {
            Asset::Eth => "ETH",
            Asset::Btc => "BTC",
        }
    }
}

#[async_trait]
pub trait PriceOracle: Send + Sync {
    /// USD price of `asset`.
    async fn read_price(&self, asset: Asset) -> Result<f64>;
}

/// Reads prices from two on-chain oracle contracts exposing `read()`.
pub struct ChronicleOracle {
    rpc: Arc<RpcClient>,
    eth_address: String,
    btc_address: String,
}

impl ChronicleOracle {
    pub fn new(rpc: Arc<RpcClient>, eth_address: impl Into<String>, btc_address: impl Into<String>) -> Self {
        Self {
            rpc,
            eth_address: eth_address.into(),
            btc_address: btc_address.into(),
        }
    }

    fn address(&self, asset: Asset) -> &str {
        match asset {
            Asset::Eth => &self.eth_address,
            Asset::Btc => &self.btc_address,
        }
    }
}

#[async_trait]
impl PriceOracle for ChronicleOracle {
    async fn read_price(&self, asset: Asset) -> Result<f64> {
        let data = self.rpc.eth_call(self.address(asset), READ_SELECTOR).await?;
        let value = decode_word(&data, 0)?;
        let age = decode_word(&data, 1)?;

        let formatted = format_units(value, PRICE_DECIMALS);
        let price: f64 = formatted
            .parse()
            .map_err(|_| ChainError::InvalidResponse(formatted.clone()))?;

        tracing::debug!(asset = asset.symbol(), price, age = %age, "Oracle price read");
        Ok(price)
    }
}

async fn price_or_fallback(oracle: &dyn PriceOracle, asset: Asset, fallback: f64) -> AssetPrice {
    match oracle.read_price(asset).await {
        Ok(usd) => AssetPrice {
            usd,
            source: PriceSource::Oracle,
        },
        Err(e) => {
            tracing::error!("Error calling {} oracle: {}", asset.symbol(), e);
            AssetPrice {
                usd: fallback,
                source: PriceSource::Fallback,
            }
        }
    }
}

/// Reads both prices concurrently. Each read falls back independently; this never fails.
pub async fn resolve_prices(oracle: &dyn PriceOracle, fallback: FallbackPrices) -> OraclePrices {
    let (eth, btc) = tokio::join!(
        price_or_fallback(oracle, Asset::Eth, fallback.eth),
        price_or_fallback(oracle, Asset::Btc, fallback.btc),
    );
    OraclePrices { eth, btc }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::tests::spawn_rpc;
    use serde_json::json;
    use std::time::Duration;

    struct FixedOracle {
        eth: Option<f64>,
        btc: Option<f64>,
    }

    #[async_trait]
    impl PriceOracle for FixedOracle {
        async fn read_price(&self, asset: Asset) -> Result<f64> {
            let price = match asset {
                Asset::Eth => self.eth,
                Asset::Btc => self.btc,
            };
            price.ok_or_else(|| ChainError::InvalidResponse("unavailable".to_string()))
        }
    }

    #[tokio::test]
    async fn test_both_failures_use_fallbacks() {
        let oracle = FixedOracle { eth: None, btc: None };
        let prices = resolve_prices(&oracle, FallbackPrices::default()).await;
        assert_eq!(prices.eth.usd, 2000.0);
        assert_eq!(prices.btc.usd, 30000.0);
        assert_eq!(prices.eth.source, PriceSource::Fallback);
        assert_eq!(prices.btc.source, PriceSource::Fallback);
    }

    #[tokio::test]
    async fn test_fallback_is_per_asset() {
        let oracle = FixedOracle { eth: Some(3125.5), btc: None };
        let prices = resolve_prices(&oracle, FallbackPrices::default()).await;
        assert_eq!(prices.eth.usd, 3125.5);
        assert_eq!(prices.eth.source, PriceSource::Oracle);
        assert_eq!(prices.btc.usd, 30000.0);
    }

    #[tokio::test]
    async fn test_chronicle_decodes_fixed_point_price() {
        let url = spawn_rpc(|body| {
            let to = body["params"][0]["to"].as_str().unwrap_or_default().to_string();
            let price: u128 = if to == "0xeth" { 2_512_250_000_000_000_000_000 } else { 0 };
            json!({
                "jsonrpc": "2.0",
                "id": body["id"],
                "result": format!("0x{:064x}{:064x}", price, 1_700_000_000u128),
            })
        })
        .await;

        let rpc = Arc::new(RpcClient::new(&url, Duration::from_secs(5)).unwrap());
        let oracle = ChronicleOracle::new(rpc, "0xeth", "0xbtc");
        assert_eq!(oracle.read_price(Asset::Eth).await.unwrap(), 2512.25);
        assert_eq!(oracle.read_price(Asset::Btc).await.unwrap(), 0.0);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_falls_back() {
        // Nothing listens on port 9 locally
        let rpc = Arc::new(RpcClient::new("http://127.0.0.1:9/", Duration::from_millis(500)).unwrap());
        let oracle = ChronicleOracle::new(rpc, "0xeth", "0xbtc");
        let prices = resolve_prices(&oracle, FallbackPrices::default()).await;
        assert_eq!(prices.eth.usd, 2000.0);
        assert_eq!(prices.btc.usd, 30000.0);
    }
}
