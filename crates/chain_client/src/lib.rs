//! Blockchain access for Plutus: a small JSON-RPC client, the price oracles
//! read by the net worth view and the wallet balance provider used when a
//! web3 wallet is connected.

pub mod error;
pub mod oracle;
pub mod rpc;
pub mod units;
pub mod wallet;

pub use error::{ChainError, Result};
pub use oracle::{resolve_prices, Asset, ChronicleOracle, PriceOracle};
pub use rpc::RpcClient;
pub use units::{format_ether, format_units};
pub use wallet::{RpcWalletProvider, WalletProvider};
