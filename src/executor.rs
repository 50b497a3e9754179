//! Transaction lifecycle: submit -> pending -> confirmed -> refresh -> record.
//!
//! One operation in flight at a time per session. The latch is released on
//! every exit path, so a failed attempt never wedges the teller. Failures
//! at any point before confirmation leave balance and history untouched.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;

use crate::chain::AtmContract;
use crate::core::units;
use crate::error::{TellerError, TellerResult};
use crate::history::{Action, HistoryEntry, HistoryLedger};
use crate::oracle::BalanceOracle;

/// Cosmetic reaction emitted alongside each outcome. Side output only;
/// nothing financial depends on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Mood {
    Thankful,
    Grumpy,
    Rattled,
}

impl Mood {
    pub fn flavor(&self) -> &'static str {
        match self {
            Mood::Thankful => "(ﾉ◕ヮ◕)ﾉ* - Thank you for the money",
            Mood::Grumpy => "ಠ_ಠ - Why did you take the money",
            Mood::Rattled => "(╥﹏╥) - The vault would not open",
        }
    }
}

/// Result of a confirmed operation, ready for the success notice.
#[derive(Debug, Clone, Serialize)]
pub struct Outcome {
    pub action: Action,
    pub amount: u64,
    pub new_balance: u64,
    pub mood: Mood,
}

/// Closed amount range the executor accepts, mirroring the page slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountRange {
    pub min: u64,
    pub max: u64,
}

impl Default for AmountRange {
    fn default() -> Self {
        Self { min: 1, max: 100 }
    }
}

impl AmountRange {
    pub fn contains(&self, amount: u64) -> bool {
        amount >= self.min && amount <= self.max
    }
}

pub struct TransactionExecutor {
    contract: Arc<dyn AtmContract>,
    oracle: Arc<BalanceOracle>,
    ledger: Arc<HistoryLedger>,
    range: AmountRange,
    decimals: u8,
    in_flight: AtomicBool,
}

impl TransactionExecutor {
    pub fn new(
        contract: Arc<dyn AtmContract>,
        oracle: Arc<BalanceOracle>,
        ledger: Arc<HistoryLedger>,
        range: AmountRange,
        decimals: u8,
    ) -> Self {
        Self { contract, oracle, ledger, range, decimals, in_flight: AtomicBool::new(false) }
    }

    pub async fn deposit(&self, amount: u64, note: &str) -> TellerResult<Outcome> {
        self.run(Action::Deposit, amount, note).await
    }

    pub async fn withdraw(&self, amount: u64, note: &str) -> TellerResult<Outcome> {
        self.run(Action::Withdraw, amount, note).await
    }

    /// The whole lifecycle, identical for both operations. Only deposits
    /// attach value to the call; withdrawals carry the amount as a bare
    /// parameter.
    async fn run(&self, action: Action, amount: u64, note: &str) -> TellerResult<Outcome> {
        self.validate(amount)?;
        let _latch = Latch::acquire(&self.in_flight)?;

        let pending = match action {
            Action::Deposit => {
                let value = units::to_base(amount, self.decimals).ok_or(TellerError::InvalidAmount {
                    amount,
                    min: self.range.min,
                    max: self.range.max,
                })?;
                self.contract.deposit(amount, value).await?
            }
            Action::Withdraw => self.contract.withdraw(amount).await?,
        };
        pending.wait().await?;

        // Confirmed. Refresh before reporting so the notice carries the
        // post-operation balance, then record.
        let new_balance = self.oracle.refresh().await?;
        tracing::info!(action = action.as_str(), amount, new_balance, "operation confirmed");
        self.ledger.append(HistoryEntry::record(action, amount, note));

        let mood = match action {
            Action::Deposit => Mood::Thankful,
            Action::Withdraw => Mood::Grumpy,
        };
        Ok(Outcome { action, amount, new_balance, mood })
    }

    fn validate(&self, amount: u64) -> TellerResult<()> {
        if !self.range.contains(amount) {
            return Err(TellerError::InvalidAmount { amount, min: self.range.min, max: self.range.max });
        }
        Ok(())
    }
}

/// In-flight latch, RAII so every exit path releases it.
struct Latch<'a>(&'a AtomicBool);

impl<'a> Latch<'a> {
    fn acquire(flag: &'a AtomicBool) -> TellerResult<Self> {
        flag.compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .map_err(|_| TellerError::OperationInFlight)?;
        Ok(Self(flag))
    }
}

impl Drop for Latch<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
