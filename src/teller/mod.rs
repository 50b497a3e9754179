//! Teller - the facade the page drives.
//!
//! Wires the session, balance oracle, executor, and history together and
//! exposes exactly the data the display needs: phase, account, balance,
//! projected history, and the two operations.
//!
//! ```text
//! provider (injected) ──► Session ──connect──► contract handle
//!                                                  │
//!                          BalanceOracle ◄─────────┤
//!                                │                 │
//!                     TransactionExecutor ◄────────┘
//!                                │
//!                      HistoryLedger ──view──► page
//! ```
//!
//! Locks are held only across synchronous sections, never across an
//! await; the executor's own latch serializes the state-changing work.

mod config;

pub use config::{TellerConfig, DEFAULT_CONTRACT_ADDRESS};

use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::{TellerError, TellerResult};
use crate::executor::{Outcome, TransactionExecutor};
use crate::history::{HistoryEntry, HistoryFilter, HistoryLedger};
use crate::oracle::BalanceOracle;
use crate::provider::WalletProvider;
use crate::session::{Phase, Session};

/// Everything that exists only while connected.
struct Engine {
    oracle: Arc<BalanceOracle>,
    executor: TransactionExecutor,
}

pub struct Teller {
    config: TellerConfig,
    session: Mutex<Session>,
    ledger: Arc<HistoryLedger>,
    engine: Mutex<Option<Arc<Engine>>>,
}

impl Teller {
    /// Build a teller with no provider; `connect` will fail `NoProvider`
    /// until one is injected.
    pub fn new(config: TellerConfig) -> TellerResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            session: Mutex::new(Session::new(None)),
            ledger: Arc::new(HistoryLedger::new()),
            engine: Mutex::new(None),
        })
    }

    /// Inject the detected provider handle. Builder-stage only, before
    /// any connect attempt.
    pub fn with_provider(self, provider: Arc<dyn WalletProvider>) -> Self {
        Self { session: Mutex::new(Session::new(Some(provider))), ..self }
    }

    pub fn config(&self) -> &TellerConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.lock_session().phase()
    }

    /// Whether a provider handle was injected. Drives the page's
    /// "install a wallet" notice.
    pub fn has_provider(&self) -> bool {
        self.lock_session().provider().is_some()
    }

    pub fn account(&self) -> Option<String> {
        self.lock_session().account()
    }

    /// Last successfully fetched balance. `None` until the first read
    /// succeeds; a failed refresh never zeroes this.
    pub fn balance(&self) -> Option<u64> {
        self.engine_handle().and_then(|e| e.oracle.last_known())
    }

    /// Projected history snapshot for display.
    pub fn history(&self, filter: HistoryFilter) -> Vec<HistoryEntry> {
        self.ledger.view(filter)
    }

    /// Silent reconnect on page load: adopt an already-authorized account
    /// without prompting. `false` when there is no provider or no prior
    /// authorization - that is the expected cold-start, not an error.
    pub async fn resume(&self) -> TellerResult<bool> {
        let Some(provider) = self.lock_session().provider() else {
            return Ok(false);
        };
        if self.lock_session().is_connected() {
            return Ok(true);
        }
        let accounts = provider.accounts().await?;
        if accounts.is_empty() {
            return Ok(false);
        }
        {
            let mut session = self.lock_session();
            session.mark_connecting();
            session.complete_connect(accounts, &self.config.contract_address)?;
        }
        self.mount_engine()?;
        self.prime_balance().await;
        Ok(true)
    }

    /// Prompting connect. Fails `NoProvider` without a handle and
    /// `UserRejected` on decline; the session reads `Disconnected` again
    /// after either. Idempotent once connected.
    pub async fn connect(&self) -> TellerResult<String> {
        let provider = self.lock_session().provider().ok_or(TellerError::NoProvider)?;
        if let Some(account) = self.lock_session().account() {
            return Ok(account);
        }
        self.lock_session().mark_connecting();
        let accounts = match provider.request_accounts().await {
            Ok(list) => list,
            Err(e) => {
                self.lock_session().abort_connect();
                return Err(e);
            }
        };
        let account = self
            .lock_session()
            .complete_connect(accounts, &self.config.contract_address)?;
        self.mount_engine()?;
        self.prime_balance().await;
        Ok(account)
    }

    /// Re-read the balance from the contract.
    pub async fn refresh_balance(&self) -> TellerResult<u64> {
        let engine = self.engine_handle().ok_or(TellerError::NotConnected)?;
        engine.oracle.refresh().await
    }

    pub async fn deposit(&self, amount: u64, note: &str) -> TellerResult<Outcome> {
        let engine = self.engine_handle().ok_or(TellerError::NotConnected)?;
        engine.executor.deposit(amount, note).await
    }

    pub async fn withdraw(&self, amount: u64, note: &str) -> TellerResult<Outcome> {
        let engine = self.engine_handle().ok_or(TellerError::NotConnected)?;
        engine.executor.withdraw(amount, note).await
    }

    fn mount_engine(&self) -> TellerResult<()> {
        let contract = self.lock_session().contract().ok_or(TellerError::NotConnected)?;
        let oracle = Arc::new(BalanceOracle::new(contract.clone()));
        let executor = TransactionExecutor::new(
            contract,
            oracle.clone(),
            self.ledger.clone(),
            self.config.amounts,
            self.config.decimals,
        );
        *self.lock_engine() = Some(Arc::new(Engine { oracle, executor }));
        Ok(())
    }

    /// First balance read after the session comes up. Tolerated on
    /// failure: the display stays empty and can be refreshed manually.
    async fn prime_balance(&self) {
        if let Err(e) = self.refresh_balance().await {
            tracing::warn!(error = %e, "initial balance fetch failed");
        }
    }

    fn engine_handle(&self) -> Option<Arc<Engine>> {
        self.lock_engine().clone()
    }

    fn lock_session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_engine(&self) -> MutexGuard<'_, Option<Arc<Engine>>> {
        self.engine.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
