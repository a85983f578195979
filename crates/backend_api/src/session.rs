use std::sync::atomic::{AtomicBool, Ordering};

/// The wallet-authentication context the connection flows consult.
///
/// Only two capabilities matter here: whether a primary wallet is signed in,
/// and asking the identity widget to show its sign-in prompt.
pub trait IdentitySession: Send + Sync {
    fn primary_wallet(&self) -> Option<String>;
    fn set_show_auth_flow(&self, show: bool);
}

/// Session described by a single API request.
#[derive(Debug, Default)]
pub struct RequestSession {
    primary_wallet: Option<String>,
    show_auth_flow: AtomicBool,
}

impl RequestSession {
    /// Blank addresses count as no wallet.
    pub fn new(primary_wallet: Option<String>) -> Self {
        let primary_wallet = primary_wallet
            .map(|w| w.trim().to_string())
            .filter(|w| !w.is_empty());
        Self {
            primary_wallet,
            show_auth_flow: AtomicBool::new(false),
        }
    }

    pub fn auth_flow_requested(&self) -> bool {
        self.show_auth_flow.load(Ordering::Relaxed)
    }
}

impl IdentitySession for RequestSession {
    fn primary_wallet(&self) -> Option<String> {
        self.primary_wallet.clone()
    }

    fn set_show_auth_flow(&self, show: bool) {
        self.show_auth_flow.store(show, Ordering::Relaxed);
    }
}
