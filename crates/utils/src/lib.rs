pub mod keys;
pub mod parsing;
pub mod store;

// Re-export commonly used items
pub use crate::parsing::{parse_amount, parse_balance_map, parse_financial_data};
pub use crate::store::{
    persist_bank_accounts, persist_credit_cards, persist_wallet_balances, JsonFileStore,
    MemoryStore, SnapshotStore, StoreError,
};
