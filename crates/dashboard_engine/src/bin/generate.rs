use anyhow::{Context, Result};
use dashboard_engine::{home_summary, FinancialDataSource, RandomFinancialDataGenerator};
use std::env;
use std::path::PathBuf;
use utils::{persist_bank_accounts, persist_credit_cards, JsonFileStore};

fn main() -> Result<()> {
    let store = env::args()
        .position(|a| a == "--store")
        .and_then(|i| env::args().nth(i + 1))
        .unwrap_or_else(|| "store/plutus.json".to_string());
    let bank_only = env::args().any(|a| a == "--bank-only");

    let store_path = PathBuf::from(&store);
    println!(
        "Generating mock snapshot...\n  store    : {}\n  bank only: {}",
        store_path.display(),
        bank_only
    );

    let snapshot = RandomFinancialDataGenerator.generate();
    let store = JsonFileStore::open(&store_path);

    persist_bank_accounts(&store, &snapshot).context("persist bank accounts")?;
    if !bank_only {
        persist_credit_cards(&store, &snapshot).context("persist credit cards")?;
    }

    let summary = home_summary(&store);
    println!(
        "Done. Bank {:.2}, cards {:.2}, liquidity {:.2}",
        summary.total_bank_balance, summary.total_credit_card_balance, summary.available_liquidity
    );
    Ok(())
}
