//! Deterministic doubles for the remote ledger and the wallet provider.
//!
//! The mock chain is the "opaque remote ledger" the core delegates to:
//! a balance, scriptable one-shot faults at each lifecycle stage, and
//! counters the tests assert against.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::anyhow;
use async_trait::async_trait;
use tokio::sync::Notify;

use tellernode::{
    AtmContract, PendingTx, Teller, TellerConfig, TellerError, TellerResult, WalletProvider,
};

pub const ACCOUNT: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";
pub const SECOND_ACCOUNT: &str = "0x70997970c51812dc3a010c7d01b50e0d17dc79c8";

/// Scripted one-shot failure for the next submitted operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// The wallet's signing prompt is declined.
    RejectSigning,
    /// The submission never reaches the chain.
    DropConnection,
    /// Submission is acknowledged but confirmation fails.
    FailConfirmation,
}

#[derive(Default)]
struct LedgerState {
    balance: u128,
    fault: Option<Fault>,
    balance_fault: bool,
    stall: Option<Arc<Notify>>,
    submissions: usize,
    confirmations: usize,
    last_deposit_value: Option<u128>,
}

#[derive(Clone, Copy)]
enum Apply {
    Deposit(u64),
    Withdraw(u64),
}

/// In-memory stand-in for the deployed contract.
pub struct MockChain {
    state: Arc<Mutex<LedgerState>>,
}

impl MockChain {
    pub fn with_balance(balance: u128) -> Arc<Self> {
        Arc::new(Self {
            state: Arc::new(Mutex::new(LedgerState { balance, ..Default::default() })),
        })
    }

    /// Arm a one-shot failure for the next submitted operation.
    pub fn arm_fault(&self, fault: Fault) {
        self.lock().fault = Some(fault);
    }

    /// Arm a one-shot failure for the next balance query.
    pub fn arm_balance_fault(&self) {
        self.lock().balance_fault = true;
    }

    /// Make the next operation's confirmation wait for the returned gate.
    pub fn arm_stall(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.lock().stall = Some(gate.clone());
        gate
    }

    pub fn balance_now(&self) -> u128 {
        self.lock().balance
    }

    pub fn submissions(&self) -> usize {
        self.lock().submissions
    }

    pub fn confirmations(&self) -> usize {
        self.lock().confirmations
    }

    /// Base-unit value attached to the most recent deposit submission.
    pub fn last_deposit_value(&self) -> Option<u128> {
        self.lock().last_deposit_value
    }

    fn lock(&self) -> MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn submit(&self, apply: Apply) -> TellerResult<Box<dyn PendingTx>> {
        let mut state = self.lock();
        state.submissions += 1;
        match state.fault.take() {
            Some(Fault::RejectSigning) => Err(TellerError::UserRejected),
            Some(Fault::DropConnection) => {
                Err(TellerError::Remote(anyhow!("connection reset during submit")))
            }
            fault => {
                if let Apply::Withdraw(amount) = apply {
                    if u128::from(amount) > state.balance {
                        return Err(TellerError::InsufficientFunds);
                    }
                }
                let stall = state.stall.take();
                Ok(Box::new(MockPending { state: self.state.clone(), apply, fault, stall }))
            }
        }
    }
}

#[async_trait]
impl AtmContract for MockChain {
    async fn balance(&self) -> TellerResult<u128> {
        let mut state = self.lock();
        if state.balance_fault {
            state.balance_fault = false;
            return Err(TellerError::Remote(anyhow!("balance query timed out")));
        }
        Ok(state.balance)
    }

    async fn deposit(&self, amount: u64, value: u128) -> TellerResult<Box<dyn PendingTx>> {
        self.lock().last_deposit_value = Some(value);
        self.submit(Apply::Deposit(amount))
    }

    async fn withdraw(&self, amount: u64) -> TellerResult<Box<dyn PendingTx>> {
        self.submit(Apply::Withdraw(amount))
    }
}

struct MockPending {
    state: Arc<Mutex<LedgerState>>,
    apply: Apply,
    fault: Option<Fault>,
    stall: Option<Arc<Notify>>,
}

#[async_trait]
impl PendingTx for MockPending {
    async fn wait(&self) -> TellerResult<()> {
        if let Some(gate) = &self.stall {
            gate.notified().await;
        }
        if self.fault == Some(Fault::FailConfirmation) {
            return Err(TellerError::Remote(anyhow!("dropped while awaiting confirmation")));
        }
        let mut state = self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        state.confirmations += 1;
        match self.apply {
            Apply::Deposit(amount) => state.balance += u128::from(amount),
            Apply::Withdraw(amount) => state.balance -= u128::from(amount),
        }
        Ok(())
    }
}

/// Provider double: scriptable authorization results, a bind counter,
/// and the shared mock chain as the bound contract.
pub struct MockProvider {
    chain: Arc<MockChain>,
    authorized: Vec<String>,
    grants: Vec<String>,
    reject_prompt: bool,
    binds: AtomicUsize,
}

impl MockProvider {
    pub fn new(chain: Arc<MockChain>) -> Self {
        Self {
            chain,
            authorized: Vec::new(),
            grants: vec![ACCOUNT.to_string()],
            reject_prompt: false,
            binds: AtomicUsize::new(0),
        }
    }

    /// Accounts reported without prompting (page-load probe).
    pub fn authorized(mut self, accounts: &[&str]) -> Self {
        self.authorized = accounts.iter().map(|a| a.to_string()).collect();
        self
    }

    /// Accounts granted when the user accepts the prompt.
    pub fn grants(mut self, accounts: &[&str]) -> Self {
        self.grants = accounts.iter().map(|a| a.to_string()).collect();
        self
    }

    /// Decline the authorization prompt.
    pub fn reject_prompt(mut self) -> Self {
        self.reject_prompt = true;
        self
    }

    pub fn bind_count(&self) -> usize {
        self.binds.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WalletProvider for MockProvider {
    async fn accounts(&self) -> TellerResult<Vec<String>> {
        Ok(self.authorized.clone())
    }

    async fn request_accounts(&self) -> TellerResult<Vec<String>> {
        if self.reject_prompt {
            return Err(TellerError::UserRejected);
        }
        Ok(self.grants.clone())
    }

    fn bind(&self, _account: &str, _address: &str) -> TellerResult<Arc<dyn AtmContract>> {
        self.binds.fetch_add(1, Ordering::SeqCst);
        Ok(self.chain.clone())
    }
}

/// A teller already connected through a default provider on `chain`.
pub async fn connected_teller(chain: &Arc<MockChain>) -> Teller {
    let provider = Arc::new(MockProvider::new(chain.clone()));
    let teller = Teller::new(TellerConfig::default())
        .expect("config")
        .with_provider(provider);
    teller.connect().await.expect("connect");
    teller
}
