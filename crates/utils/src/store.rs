use models::{FinancialSnapshot, WalletBalanceRecord};
use parking_lot::RwLock;
use serde_json::Value;
use std::{
    collections::BTreeMap,
    fs,
    io::Write,
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::keys;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

/// String key-value store holding the persisted snapshot fields.
///
/// Reads never fail: a missing key is `None`. Writes are last-write-wins.
pub trait SnapshotStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String) -> Result<(), StoreError>;
}

/// In-process store, lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl SnapshotStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.write().insert(key.to_string(), value);
        Ok(())
    }
}

/// Store backed by a single JSON object file (`{"key": "value", ...}`).
///
/// The whole file is rewritten on every `set`, through a temp file renamed over
/// the store file. A missing or unreadable file opens as an empty store and gets
/// replaced on the next write.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl JsonFileStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries = load_entries(&path);
        tracing::debug!("Opened store at {:?} with {} entries", path, entries.len());
        Self {
            path,
            entries: RwLock::new(entries),
        }
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(io_error(dir))?;

        let formatted = serde_json::to_string_pretty(entries)?;
        let mut temp = NamedTempFile::new_in(dir).map_err(io_error(dir))?;
        temp.write_all(formatted.as_bytes()).map_err(io_error(temp.path()))?;
        temp.as_file().sync_all().map_err(io_error(temp.path()))?;
        temp.persist(&self.path).map_err(|e| StoreError::Io {
            path: self.path.clone(),
            source: e.error,
        })?;
        Ok(())
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> StoreError {
    let path = path.to_path_buf();
    move |source| StoreError::Io { path, source }
}

impl SnapshotStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    /// Memory only changes once the file write succeeded.
    fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let mut entries = self.entries.write();
        let mut staged = entries.clone();
        staged.insert(key.to_string(), value);
        self.flush(&staged)?;
        *entries = staged;
        Ok(())
    }
}

fn load_entries(path: &Path) -> BTreeMap<String, String> {
    let Ok(contents) = fs::read_to_string(path) else {
        return BTreeMap::new();
    };

    match serde_json::from_str::<serde_json::Map<String, Value>>(&contents) {
        Ok(map) => map
            .into_iter()
            .map(|(key, value)| {
                let value = match value {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                (key, value)
            })
            .collect(),
        Err(e) => {
            tracing::warn!("Store file {:?} is not a JSON object ({}), starting empty", path, e);
            BTreeMap::new()
        }
    }
}

/// Persists the bank half of a snapshot: `bankAccounts` and `totalBankBalance`.
pub fn persist_bank_accounts(
    store: &dyn SnapshotStore,
    snapshot: &FinancialSnapshot,
) -> Result<(), StoreError> {
    store.set(keys::BANK_ACCOUNTS, serde_json::to_string(&snapshot.bank_accounts)?)?;
    store.set(keys::TOTAL_BANK_BALANCE, snapshot.total_bank_balance.to_string())
}

/// Persists the card half of a snapshot together with the combined `financialData` record.
pub fn persist_credit_cards(
    store: &dyn SnapshotStore,
    snapshot: &FinancialSnapshot,
) -> Result<(), StoreError> {
    store.set(keys::CREDIT_CARDS, serde_json::to_string(&snapshot.credit_cards)?)?;
    store.set(keys::TOTAL_CREDIT_CARD_DEBT, snapshot.total_card_balance.to_string())?;
    store.set(keys::FINANCIAL_DATA, serde_json::to_string(&snapshot.financial_data)?)
}

pub fn persist_wallet_balances(
    store: &dyn SnapshotStore,
    record: &WalletBalanceRecord,
) -> Result<(), StoreError> {
    store.set(keys::ETH_BALANCE, record.eth_balance.clone())?;
    store.set(keys::BTC_BALANCE, record.btc_balance.clone())
}
