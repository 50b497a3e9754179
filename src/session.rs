//! Wallet session: Disconnected -> Connecting -> Connected.
//!
//! The provider handle is injected at construction. `Connected` carries
//! the active account and the contract handle bound to it; the handle is
//! built once and never rebuilt for the life of the session. There is no
//! transition back to `Disconnected` - teardown is the page unload, and
//! in-session account switching is a known, documented gap.

use std::sync::Arc;

use crate::chain::AtmContract;
use crate::error::{TellerError, TellerResult};
use crate::provider::WalletProvider;

/// Connection phase, exposed for the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Disconnected => "disconnected",
            Phase::Connecting => "connecting",
            Phase::Connected => "connected",
        }
    }
}

enum State {
    Disconnected,
    Connecting,
    Connected {
        account: String,
        contract: Arc<dyn AtmContract>,
    },
}

pub struct Session {
    provider: Option<Arc<dyn WalletProvider>>,
    state: State,
}

impl Session {
    pub fn new(provider: Option<Arc<dyn WalletProvider>>) -> Self {
        Self { provider, state: State::Disconnected }
    }

    pub fn provider(&self) -> Option<Arc<dyn WalletProvider>> {
        self.provider.clone()
    }

    pub fn phase(&self) -> Phase {
        match self.state {
            State::Disconnected => Phase::Disconnected,
            State::Connecting => Phase::Connecting,
            State::Connected { .. } => Phase::Connected,
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self.state, State::Connected { .. })
    }

    pub fn account(&self) -> Option<String> {
        match &self.state {
            State::Connected { account, .. } => Some(account.clone()),
            _ => None,
        }
    }

    pub fn contract(&self) -> Option<Arc<dyn AtmContract>> {
        match &self.state {
            State::Connected { contract, .. } => Some(contract.clone()),
            _ => None,
        }
    }

    /// Enter `Connecting` while the authorization prompt is open. No-op
    /// once connected.
    pub fn mark_connecting(&mut self) {
        if matches!(self.state, State::Disconnected) {
            self.state = State::Connecting;
        }
    }

    /// Any failure on the prompt path lands back in `Disconnected`.
    pub fn abort_connect(&mut self) {
        if matches!(self.state, State::Connecting) {
            self.state = State::Disconnected;
        }
    }

    /// Commit an authorization result. The transition happens only on a
    /// non-empty address list; the first entry wins, deterministically.
    /// The contract handle is bound here, once, and cached until the page
    /// unloads.
    pub fn complete_connect(&mut self, accounts: Vec<String>, address: &str) -> TellerResult<String> {
        if let State::Connected { account, .. } = &self.state {
            return Ok(account.clone());
        }
        let provider = self.provider.clone().ok_or(TellerError::NoProvider)?;
        let Some(account) = accounts.into_iter().next() else {
            // Wallets report a decline as an empty grant.
            self.abort_connect();
            return Err(TellerError::UserRejected);
        };
        let contract = match provider.bind(&account, address) {
            Ok(contract) => contract,
            Err(e) => {
                self.abort_connect();
                return Err(e);
            }
        };
        tracing::info!(account = %account, "wallet session connected");
        self.state = State::Connected { account: account.clone(), contract };
        Ok(account)
    }
}
