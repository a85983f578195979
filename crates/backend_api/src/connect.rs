//! Connection flows: one `Idle -> Loading -> Connected` machine per account type.
//!
//! Bank and credit-card flows simulate a provider round-trip with a delayed task;
//! the web3 flow asks the wallet provider for the native balance. Every in-flight
//! task belongs to its flow and is aborted when the owning board is torn down.
//!
//! Jobs never write to the store themselves: they hand back a `Settlement` and the
//! flow applies its write under the state lock, only while still `Loading`. A
//! cancelled connection therefore never writes.

use chain_client::{format_ether, WalletProvider};
use dashboard_engine::FinancialDataSource;
use models::{ConnectedBalance, ConnectionKind, ConnectionState, WalletBalanceRecord};
use parking_lot::Mutex;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use utils::{persist_bank_accounts, persist_credit_cards, persist_wallet_balances, SnapshotStore};

use crate::session::IdentitySession;

/// What a finished connect job publishes: the next state and the store write that goes with it.
struct Settlement {
    outcome: ConnectionState,
    commit: Option<Box<dyn FnOnce() + Send>>,
}

impl Settlement {
    fn connected<C>(balance: ConnectedBalance, commit: C) -> Self
    where
        C: FnOnce() + Send + 'static,
    {
        Self {
            outcome: ConnectionState::Connected { balance },
            commit: Some(Box::new(commit)),
        }
    }

    fn revert() -> Self {
        Self {
            outcome: ConnectionState::Idle,
            commit: None,
        }
    }
}

pub struct ConnectionFlow {
    kind: ConnectionKind,
    state: watch::Sender<ConnectionState>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl ConnectionFlow {
    pub fn new(kind: ConnectionKind) -> Self {
        let (state, _) = watch::channel(ConnectionState::Idle);
        Self {
            kind,
            state,
            pending: Mutex::new(None),
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state.borrow().clone()
    }

    /// `Idle -> Loading`. Returns false when the flow already left `Idle`.
    fn begin(&self) -> bool {
        let started = self.state.send_if_modified(|state| {
            if matches!(state, ConnectionState::Idle) {
                *state = ConnectionState::Loading;
                true
            } else {
                false
            }
        });
        if started {
            tracing::debug!(kind = self.kind.label(), "Connection loading");
        }
        started
    }

    /// Leaves `Loading` for the settlement's outcome, running its store write first.
    /// No effect once the flow was cancelled.
    fn settle(&self, settlement: Settlement) {
        let label = self.kind.label();
        let Settlement { outcome, commit } = settlement;
        self.state.send_if_modified(move |state| {
            if !state.is_loading() {
                return false;
            }
            // Runs under the watch lock, so `cancel` cannot interleave
            if let Some(commit) = commit {
                commit();
            }
            tracing::info!(kind = label, outcome = ?outcome, "Connection settled");
            *state = outcome;
            true
        });
    }

    /// Starts `job` in the background if the flow is idle and returns the resulting state.
    fn start<F>(self: &Arc<Self>, job: F) -> ConnectionState
    where
        F: Future<Output = Settlement> + Send + 'static,
    {
        if !self.begin() {
            return self.state();
        }
        self.spawn(job);
        self.state()
    }

    /// Runs `job` for a flow that is already `Loading`, keeping its handle for cancellation.
    fn spawn<F>(self: &Arc<Self>, job: F)
    where
        F: Future<Output = Settlement> + Send + 'static,
    {
        let mut pending = self.pending.lock();
        let flow = Arc::clone(self);
        let handle = tokio::spawn(async move {
            let settlement = job.await;
            flow.settle(settlement);
        });

        // A cancel that ran before the handle was stored found nothing to abort
        if self.state.borrow().is_loading() {
            *pending = Some(handle);
        } else {
            handle.abort();
        }
    }

    /// Aborts any in-flight task; a flow still loading goes back to `Idle`.
    pub fn cancel(&self) {
        let mut pending = self.pending.lock();
        if let Some(handle) = pending.take() {
            handle.abort();
        }
        let label = self.kind.label();
        self.state.send_if_modified(|state| {
            if state.is_loading() {
                tracing::debug!(kind = label, "Connection cancelled");
                *state = ConnectionState::Idle;
                true
            } else {
                false
            }
        });
    }

    /// Waits until the flow is no longer `Loading`.
    pub async fn wait_settled(&self) -> ConnectionState {
        let mut rx = self.state.subscribe();
        let settled = match rx.wait_for(|state| !state.is_loading()).await {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        };
        settled
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ConnectionStatus {
    pub bank: ConnectionState,
    pub credit_card: ConnectionState,
    pub web3: ConnectionState,
}

/// Outcome of a web3 connect attempt.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Web3Outcome {
    pub state: ConnectionState,
    pub auth_required: bool,
}

/// The three connection flows of one dashboard session.
pub struct ConnectionBoard {
    store: Arc<dyn SnapshotStore>,
    source: Arc<dyn FinancialDataSource>,
    connect_delay: Duration,
    bank: Arc<ConnectionFlow>,
    credit_card: Arc<ConnectionFlow>,
    web3: Arc<ConnectionFlow>,
}

impl ConnectionBoard {
    pub fn new(
        store: Arc<dyn SnapshotStore>,
        source: Arc<dyn FinancialDataSource>,
        connect_delay: Duration,
    ) -> Self {
        Self {
            store,
            source,
            connect_delay,
            bank: Arc::new(ConnectionFlow::new(ConnectionKind::Bank)),
            credit_card: Arc::new(ConnectionFlow::new(ConnectionKind::CreditCard)),
            web3: Arc::new(ConnectionFlow::new(ConnectionKind::Web3)),
        }
    }

    pub fn flow(&self, kind: ConnectionKind) -> &Arc<ConnectionFlow> {
        match kind {
            ConnectionKind::Bank => &self.bank,
            ConnectionKind::CreditCard => &self.credit_card,
            ConnectionKind::Web3 => &self.web3,
        }
    }

    pub fn status(&self) -> ConnectionStatus {
        ConnectionStatus {
            bank: self.bank.state(),
            credit_card: self.credit_card.state(),
            web3: self.web3.state(),
        }
    }

    /// Links the mock bank accounts after the connect delay.
    /// Persists `bankAccounts` and `totalBankBalance` only.
    pub fn connect_bank(&self) -> ConnectionState {
        let store = Arc::clone(&self.store);
        let source = Arc::clone(&self.source);
        let delay = self.connect_delay;

        self.bank.start(async move {
            tokio::time::sleep(delay).await;
            let snapshot = source.generate();
            let balance = ConnectedBalance::Amount(snapshot.total_bank_balance);
            Settlement::connected(balance, move || {
                if let Err(e) = persist_bank_accounts(store.as_ref(), &snapshot) {
                    tracing::error!("Failed to persist bank accounts: {}", e);
                }
            })
        })
    }

    /// Links the mock credit cards after the connect delay.
    /// Persists the cards, their total and the combined `financialData` record.
    pub fn connect_credit_card(&self) -> ConnectionState {
        let store = Arc::clone(&self.store);
        let source = Arc::clone(&self.source);
        let delay = self.connect_delay;

        self.credit_card.start(async move {
            tokio::time::sleep(delay).await;
            let snapshot = source.generate();
            let balance = ConnectedBalance::Amount(snapshot.total_card_balance);
            Settlement::connected(balance, move || {
                if let Err(e) = persist_credit_cards(store.as_ref(), &snapshot) {
                    tracing::error!("Failed to persist credit cards: {}", e);
                }
            })
        })
    }

    /// Links the session's primary wallet.
    ///
    /// Without a wallet the session is asked to show its sign-in prompt and the
    /// flow returns to `Idle`. Provider errors are logged and also revert to `Idle`,
    /// leaving the store untouched.
    pub async fn connect_web3(
        &self,
        session: &dyn IdentitySession,
        provider: Arc<dyn WalletProvider>,
    ) -> Web3Outcome {
        if !self.web3.begin() {
            return Web3Outcome {
                state: self.web3.state(),
                auth_required: false,
            };
        }

        let Some(address) = session.primary_wallet() else {
            session.set_show_auth_flow(true);
            self.web3.settle(Settlement::revert());
            return Web3Outcome {
                state: self.web3.state(),
                auth_required: true,
            };
        };

        let store = Arc::clone(&self.store);
        let source = Arc::clone(&self.source);
        self.web3.spawn(async move {
            match provider.get_balance(&address).await {
                Ok(wei) => {
                    let record = WalletBalanceRecord {
                        eth_balance: format_ether(wei),
                        btc_balance: source.alternate_asset_balance(),
                    };
                    let balance = ConnectedBalance::Ether(record.eth_balance.clone());
                    Settlement::connected(balance, move || {
                        if let Err(e) = persist_wallet_balances(store.as_ref(), &record) {
                            tracing::error!("Failed to persist wallet balances: {}", e);
                        }
                    })
                }
                Err(e) => {
                    tracing::error!("Failed to connect Web3 wallet: {}", e);
                    Settlement::revert()
                }
            }
        });

        Web3Outcome {
            state: self.web3.wait_settled().await,
            auth_required: false,
        }
    }

    /// Cancels every pending task. Flows still loading fall back to `Idle`.
    pub fn teardown(&self) {
        self.bank.cancel();
        self.credit_card.cancel();
        self.web3.cancel();
    }
}

impl Drop for ConnectionBoard {
    fn drop(&mut self) {
        self.teardown();
    }
}
