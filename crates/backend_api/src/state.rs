use anyhow::{Context, Result};
use chain_client::{ChronicleOracle, PriceOracle, RpcClient, RpcWalletProvider, WalletProvider};
use dashboard_engine::{FinancialDataSource, RandomFinancialDataGenerator};
use models::{FallbackPrices, Settings};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use utils::{JsonFileStore, MemoryStore, SnapshotStore};

use crate::connect::ConnectionBoard;

/// Everything the handlers share: injected collaborators plus the live connection board.
pub struct AppState {
    pub store: Arc<dyn SnapshotStore>,
    pub source: Arc<dyn FinancialDataSource>,
    pub wallet: Arc<dyn WalletProvider>,
    pub oracle: Arc<dyn PriceOracle>,
    pub fallback_prices: FallbackPrices,
    pub connect_delay: Duration,
    pub calculation_delay: Duration,
    board: RwLock<Arc<ConnectionBoard>>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn SnapshotStore>,
        source: Arc<dyn FinancialDataSource>,
        wallet: Arc<dyn WalletProvider>,
        oracle: Arc<dyn PriceOracle>,
        settings: &Settings,
    ) -> Self {
        let connect_delay = Duration::from_millis(settings.connect_delay_ms);
        let board = ConnectionBoard::new(store.clone(), source.clone(), connect_delay);
        Self {
            store,
            source,
            wallet,
            oracle,
            fallback_prices: settings.fallback_prices,
            connect_delay,
            calculation_delay: Duration::from_millis(settings.calculation_delay_ms),
            board: RwLock::new(Arc::new(board)),
        }
    }

    /// Wires the production collaborators described by `settings`:
    /// the random mock source, a JSON-file or in-memory store, and the chain RPC.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let store: Arc<dyn SnapshotStore> = match &settings.store.path {
            Some(path) => Arc::new(JsonFileStore::open(path)),
            None => Arc::new(MemoryStore::new()),
        };

        let rpc = RpcClient::new(
            &settings.chain.rpc_url,
            Duration::from_millis(settings.chain.timeout_ms),
        )
        .with_context(|| format!("Creating RPC client for {}", settings.chain.rpc_url))?;
        let rpc = Arc::new(rpc);

        let oracle = ChronicleOracle::new(
            rpc.clone(),
            settings.chain.eth_oracle.clone(),
            settings.chain.btc_oracle.clone(),
        );

        Ok(Self::new(
            store,
            Arc::new(RandomFinancialDataGenerator),
            Arc::new(RpcWalletProvider::new(rpc)),
            Arc::new(oracle),
            settings,
        ))
    }

    pub fn board(&self) -> Arc<ConnectionBoard> {
        self.board.read().clone()
    }

    /// Replaces the board with fresh idle flows and tears the old one down.
    pub fn reset_board(&self) -> Arc<ConnectionBoard> {
        let fresh = Arc::new(ConnectionBoard::new(
            self.store.clone(),
            self.source.clone(),
            self.connect_delay,
        ));
        let previous = std::mem::replace(&mut *self.board.write(), fresh.clone());
        previous.teardown();
        fresh
    }
}
