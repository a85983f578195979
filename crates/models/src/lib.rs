use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// Snapshot models
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FinancialData {
	pub due_date: NaiveDate,
	pub total_credit_limit: i64,
	pub interest_rate: f64,
	pub credit_rating: u16,
	pub credit_card_balance_history: Vec<i64>,
	pub on_time_payments: u8,
	pub late_payments: u8,
	pub credit_score_history: Vec<u16>,
	pub suggested_budget: i64,
}

/// One generated bundle of mock bank, card and credit figures.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSnapshot {
	pub bank_accounts: BTreeMap<String, i64>,
	pub total_bank_balance: i64,
	pub credit_cards: BTreeMap<String, i64>,
	pub total_card_balance: i64,
	pub financial_data: FinancialData,
}

/// Wallet balances as persisted after a web3 connection.
/// `eth_balance` keeps full wei precision, `btc_balance` is a placeholder sample.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WalletBalanceRecord {
	pub eth_balance: String,
	pub btc_balance: String,
}

// Connection models
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionKind {
	Bank,
	CreditCard,
	Web3,
}

impl ConnectionKind {
	pub fn label(&self) -> &'static str {
		match self {
			ConnectionKind::Bank => "bank",
			ConnectionKind::CreditCard => "credit_card",
			ConnectionKind::Web3 => "web3",
		}
	}
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ConnectionState {
	Idle,
	Loading,
	Connected { balance: ConnectedBalance },
}

impl ConnectionState {
	pub fn is_loading(&self) -> bool {
		matches!(self, ConnectionState::Loading)
	}

	pub fn is_connected(&self) -> bool {
		matches!(self, ConnectionState::Connected { .. })
	}
}

/// Figure shown on a connected card: a currency total or the formatted ether balance.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum ConnectedBalance {
	Amount(i64),
	Ether(String),
}

// View output models
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AccountBalance {
	pub name: String,
	pub balance: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct HomeSummary {
	pub bank_accounts: Vec<AccountBalance>,
	pub credit_cards: Vec<AccountBalance>,
	pub total_bank_balance: f64,
	pub total_credit_card_balance: f64,
	pub available_liquidity: f64,
	pub financial_data: Option<FinancialData>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PriceSource {
	Oracle,
	Fallback,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct AssetPrice {
	pub usd: f64,
	pub source: PriceSource,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct OraclePrices {
	pub eth: AssetPrice,
	pub btc: AssetPrice,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct NetWorthSummary {
	pub bank_balance: f64,
	pub credit_card_debt: f64,
	pub eth_balance: f64,
	pub btc_balance: f64,
	pub eth_price: f64,
	pub btc_price: f64,
	pub prices: OraclePrices,
	pub eth_value: f64,
	pub btc_value: f64,
	pub total_crypto_holding: f64,
	pub total_net_worth: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SpendingPowerSummary {
	pub bank_balance: f64,
	pub credit_card_debt: f64,
	pub available_liquidity: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum CreditScoreEffect {
	Negative,
	#[serde(rename = "Slightly Negative")]
	SlightlyNegative,
	Neutral,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SpendingOption {
	pub name: String,
	/// Annual rate in percent.
	pub interest_rate: f64,
	pub credit_score_effect: CreditScoreEffect,
	/// Term in months.
	pub duration: u32,
	pub total_amount: f64,
	pub executable: bool,
}

// Settings models
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ServerSettings {
	pub host: String,
	pub port: u16,
}

impl Default for ServerSettings {
	fn default() -> Self {
		Self { host: "127.0.0.1".to_string(), port: 3000 }
	}
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct StoreSettings {
	/// JSON file backing the snapshot store; in-memory when absent.
	pub path: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ChainSettings {
	pub rpc_url: String,
	pub eth_oracle: String,
	pub btc_oracle: String,
	pub timeout_ms: u64,
}

impl Default for ChainSettings {
	fn default() -> Self {
		Self {
			rpc_url: "https://rpc.cardona.zkevm-rpc.com".to_string(),
			eth_oracle: "0xBFD8FDF3aa1A0034eb978fD94e2834e2fB75e34A".to_string(),
			btc_oracle: "0x45d004941e10b75f0Dd27a6f89A312Aa004975cb".to_string(),
			timeout_ms: 5000,
		}
	}
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct FallbackPrices {
	pub eth: f64,
	pub btc: f64,
}

impl Default for FallbackPrices {
	fn default() -> Self {
		Self { eth: 2000.0, btc: 30000.0 }
	}
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
	pub server: ServerSettings,
	pub store: StoreSettings,
	pub connect_delay_ms: u64,
	pub calculation_delay_ms: u64,
	pub chain: ChainSettings,
	pub fallback_prices: FallbackPrices,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			server: ServerSettings::default(),
			store: StoreSettings::default(),
			connect_delay_ms: 2500,
			calculation_delay_ms: 2000,
			chain: ChainSettings::default(),
			fallback_prices: FallbackPrices::default(),
		}
	}
}
