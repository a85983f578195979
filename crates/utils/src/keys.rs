//! Keys under which snapshot fields are persisted.

pub const BANK_ACCOUNTS: &str = "bankAccounts";
pub const TOTAL_BANK_BALANCE: &str = "totalBankBalance";
pub const CREDIT_CARDS: &str = "creditCards";
pub const TOTAL_CREDIT_CARD_DEBT: &str = "totalCreditCardDebt";
pub const FINANCIAL_DATA: &str = "financialData";
pub const ETH_BALANCE: &str = "ethBalance";
pub const BTC_BALANCE: &str = "btcBalance";
