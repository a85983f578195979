use async_trait::async_trait;
use std::sync::Arc;

use crate::error::Result;
use crate::rpc::RpcClient;

/// Source of native-token balances for a connected wallet.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Balance of `address` in the smallest unit (wei).
    async fn get_balance(&self, address: &str) -> Result<u128>;
}

/// Wallet provider answering from the chain's `eth_getBalance`.
pub struct RpcWalletProvider {
    rpc: Arc<RpcClient>,
}

impl RpcWalletProvider {
    pub fn new(rpc: Arc<RpcClient>) -> Self {
        Self { rpc }
    }
}

#[async_trait]
impl WalletProvider for RpcWalletProvider {
    async fn get_balance(&self, address: &str) -> Result<u128> {
        self.rpc.get_balance(address).await
    }
}
