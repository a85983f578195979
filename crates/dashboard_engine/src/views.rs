use models::{
    AccountBalance, CreditScoreEffect, HomeSummary, NetWorthSummary, OraclePrices,
    SpendingOption, SpendingPowerSummary,
};
use std::collections::BTreeMap;
use thiserror::Error;
use utils::{keys, parse_amount, parse_balance_map, parse_financial_data, SnapshotStore};

#[derive(Debug, Error, PartialEq)]
pub enum ViewError {
    #[error("Spend amount must be a positive number, got {0}")]
    InvalidAmount(f64),
}

pub(crate) fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Stored totals consumed by the net worth and spending power views.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BalanceReading {
    pub bank_balance: f64,
    pub credit_card_debt: f64,
    pub eth_balance: f64,
    pub btc_balance: f64,
}

impl BalanceReading {
    pub fn from_store(store: &dyn SnapshotStore) -> Self {
        Self {
            bank_balance: parse_amount(store.get(keys::TOTAL_BANK_BALANCE).as_deref()),
            credit_card_debt: parse_amount(store.get(keys::TOTAL_CREDIT_CARD_DEBT).as_deref()),
            eth_balance: parse_amount(store.get(keys::ETH_BALANCE).as_deref()),
            btc_balance: parse_amount(store.get(keys::BTC_BALANCE).as_deref()),
        }
    }

    pub fn available_liquidity(&self) -> f64 {
        self.bank_balance - self.credit_card_debt
    }
}

fn to_account_list(map: BTreeMap<String, f64>) -> Vec<AccountBalance> {
    map.into_iter()
        .map(|(name, balance)| AccountBalance {
            name,
            balance: round2(balance),
        })
        .collect()
}

/// Account-level view built from the stored `bankAccounts` / `creditCards` maps.
pub fn home_summary(store: &dyn SnapshotStore) -> HomeSummary {
    let bank_accounts = parse_balance_map(store.get(keys::BANK_ACCOUNTS).as_deref());
    let credit_cards = parse_balance_map(store.get(keys::CREDIT_CARDS).as_deref());

    let total_bank_balance: f64 = bank_accounts.values().sum();
    let total_credit_card_balance: f64 = credit_cards.values().sum();
    let available_liquidity = total_bank_balance - total_credit_card_balance;

    HomeSummary {
        bank_accounts: to_account_list(bank_accounts),
        credit_cards: to_account_list(credit_cards),
        total_bank_balance: round2(total_bank_balance),
        total_credit_card_balance: round2(total_credit_card_balance),
        available_liquidity: round2(available_liquidity),
        financial_data: parse_financial_data(store.get(keys::FINANCIAL_DATA).as_deref()),
    }
}

pub fn net_worth_summary(reading: &BalanceReading, prices: OraclePrices) -> NetWorthSummary {
    let eth_price = prices.eth.usd;
    let btc_price = prices.btc.usd;

    let eth_value = reading.eth_balance * eth_price;
    let btc_value = reading.btc_balance * btc_price;
    let total_crypto_holding = eth_value + btc_value;
    let total_net_worth = reading.bank_balance - reading.credit_card_debt + total_crypto_holding;

    NetWorthSummary {
        bank_balance: round2(reading.bank_balance),
        credit_card_debt: round2(reading.credit_card_debt),
        eth_balance: reading.eth_balance,
        btc_balance: reading.btc_balance,
        eth_price,
        btc_price,
        prices,
        eth_value: round2(eth_value),
        btc_value: round2(btc_value),
        total_crypto_holding: round2(total_crypto_holding),
        total_net_worth: round2(total_net_worth),
    }
}

pub fn spending_power_summary(store: &dyn SnapshotStore) -> SpendingPowerSummary {
    let reading = BalanceReading::from_store(store);
    SpendingPowerSummary {
        bank_balance: round2(reading.bank_balance),
        credit_card_debt: round2(reading.credit_card_debt),
        available_liquidity: round2(reading.available_liquidity()),
    }
}

struct FinancingTerms {
    name: &'static str,
    interest_rate: f64,
    credit_score_effect: CreditScoreEffect,
    duration: u32,
    /// Share of the annual rate charged over the whole term.
    term_factor: f64,
    executable: bool,
}

const FINANCING_OPTIONS: [FinancingTerms; 3] = [
    FinancingTerms {
        name: "Credit Card",
        interest_rate: 18.9,
        credit_score_effect: CreditScoreEffect::Negative,
        duration: 12,
        term_factor: 1.0,
        executable: false,
    },
    FinancingTerms {
        name: "Bank Loan",
        interest_rate: 9.5,
        credit_score_effect: CreditScoreEffect::SlightlyNegative,
        duration: 24,
        term_factor: 2.0,
        executable: false,
    },
    FinancingTerms {
        name: "Crypto Staking",
        interest_rate: 5.0,
        credit_score_effect: CreditScoreEffect::Neutral,
        duration: 6,
        term_factor: 0.5,
        executable: true,
    },
];

/// Projects the total repaid for `amount` under each financing option:
/// `amount * (1 + rate * term_factor)`.
pub fn spending_options(amount: f64) -> Result<Vec<SpendingOption>, ViewError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(ViewError::InvalidAmount(amount));
    }

    Ok(FINANCING_OPTIONS
        .iter()
        .map(|terms| SpendingOption {
            name: terms.name.to_string(),
            interest_rate: terms.interest_rate,
            credit_score_effect: terms.credit_score_effect,
            duration: terms.duration,
            total_amount: round2(amount * (1.0 + terms.interest_rate / 100.0 * terms.term_factor)),
            executable: terms.executable,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::{AssetPrice, PriceSource};
    use utils::MemoryStore;

    fn fallback_prices() -> OraclePrices {
        OraclePrices {
            eth: AssetPrice { usd: 2000.0, source: PriceSource::Fallback },
            btc: AssetPrice { usd: 30000.0, source: PriceSource::Fallback },
        }
    }

    fn seeded_store() -> MemoryStore {
        let store = MemoryStore::new();
        store
            .set(keys::BANK_ACCOUNTS, r#"{"Chase Bank Co.":1400,"Bank of America":1100}"#.to_string())
            .unwrap();
        store.set(keys::TOTAL_BANK_BALANCE, "2500".to_string()).unwrap();
        store
            .set(keys::CREDIT_CARDS, r#"{"American Express":2000,"Chase Freedom Flex":1700}"#.to_string())
            .unwrap();
        store.set(keys::TOTAL_CREDIT_CARD_DEBT, "3700".to_string()).unwrap();
        store.set(keys::ETH_BALANCE, "1.5".to_string()).unwrap();
        store.set(keys::BTC_BALANCE, "0.1".to_string()).unwrap();
        store
    }

    #[test]
    fn test_home_summary_totals() {
        let summary = home_summary(&seeded_store());
        assert_eq!(summary.bank_accounts.len(), 2);
        assert_eq!(summary.total_bank_balance, 2500.0);
        assert_eq!(summary.total_credit_card_balance, 3700.0);
        assert_eq!(summary.available_liquidity, -1200.0);
        assert!(summary.financial_data.is_none());
    }

    #[test]
    fn test_home_summary_on_empty_store() {
        let store = MemoryStore::new();
        let summary = home_summary(&store);
        assert!(summary.bank_accounts.is_empty());
        assert!(summary.credit_cards.is_empty());
        assert_eq!(summary.total_bank_balance, 0.0);
        assert_eq!(summary.available_liquidity, 0.0);
    }

    #[test]
    fn test_home_summary_with_malformed_entries() {
        let store = MemoryStore::new();
        store.set(keys::BANK_ACCOUNTS, "{oops".to_string()).unwrap();
        store.set(keys::CREDIT_CARDS, "null".to_string()).unwrap();
        store.set(keys::FINANCIAL_DATA, "garbage".to_string()).unwrap();

        let summary = home_summary(&store);
        assert!(summary.bank_accounts.is_empty());
        assert_eq!(summary.total_bank_balance, 0.0);
        assert!(summary.financial_data.is_none());
    }

    #[test]
    fn test_reading_twice_is_identical() {
        let store = seeded_store();
        assert_eq!(home_summary(&store), home_summary(&store));
        assert_eq!(spending_power_summary(&store), spending_power_summary(&store));
        let reading = BalanceReading::from_store(&store);
        assert_eq!(
            net_worth_summary(&reading, fallback_prices()),
            net_worth_summary(&BalanceReading::from_store(&store), fallback_prices())
        );
    }

    #[test]
    fn test_net_worth_with_fallback_prices() {
        let reading = BalanceReading::from_store(&seeded_store());
        let summary = net_worth_summary(&reading, fallback_prices());

        assert_eq!(summary.eth_price, 2000.0);
        assert_eq!(summary.btc_price, 30000.0);
        assert_eq!(summary.eth_value, 3000.0);
        assert_eq!(summary.btc_value, 3000.0);
        assert_eq!(summary.total_crypto_holding, 6000.0);
        // 2500 - 3700 + 6000
        assert_eq!(summary.total_net_worth, 4800.0);
    }

    #[test]
    fn test_net_worth_without_any_data() {
        let reading = BalanceReading::from_store(&MemoryStore::new());
        let summary = net_worth_summary(&reading, fallback_prices());
        assert_eq!(summary.total_net_worth, 0.0);
        assert_eq!(summary.total_crypto_holding, 0.0);
    }

    #[test]
    fn test_spending_power_liquidity() {
        let summary = spending_power_summary(&seeded_store());
        assert_eq!(summary.bank_balance, 2500.0);
        assert_eq!(summary.credit_card_debt, 3700.0);
        assert_eq!(summary.available_liquidity, -1200.0);
    }

    #[test]
    fn test_spending_options_for_one_thousand() {
        let options = spending_options(1000.0).unwrap();
        let totals: Vec<f64> = options.iter().map(|o| o.total_amount).collect();
        assert_eq!(totals, vec![1189.0, 1190.0, 1025.0]);

        assert_eq!(options[0].duration, 12);
        assert_eq!(options[1].credit_score_effect, CreditScoreEffect::SlightlyNegative);
        assert_eq!(options[2].interest_rate, 5.0);
        assert!(options[2].executable);
        assert!(!options[0].executable);
    }

    #[test]
    fn test_spending_options_reject_bad_amounts() {
        assert_eq!(spending_options(0.0), Err(ViewError::InvalidAmount(0.0)));
        assert!(spending_options(-5.0).is_err());
        assert!(spending_options(f64::NAN).is_err());
        assert!(spending_options(f64::INFINITY).is_err());
    }
}
