//! Error taxonomy for the teller core.
//!
//! Provider and account errors surface to the caller as blocking notices.
//! Transaction errors are caught at the executor boundary; when one fires,
//! balance, history, and the in-flight latch read exactly as they did
//! before the attempt.

use thiserror::Error;

/// Errors reported by the session, oracle, and executor.
#[derive(Error, Debug)]
pub enum TellerError {
    /// No injected wallet was found on this page.
    #[error("no wallet provider detected; install a browser wallet to use this teller")]
    NoProvider,

    /// The user declined the authorization or signing prompt.
    #[error("request declined in the wallet")]
    UserRejected,

    /// The remote ledger rejected a withdrawal for insufficient balance.
    #[error("insufficient balance on the contract")]
    InsufficientFunds,

    /// Provider or chain communication failed.
    #[error("provider or chain unreachable: {0}")]
    Remote(#[from] anyhow::Error),

    /// Amount was zero or outside the configured range.
    #[error("invalid amount {amount}: expected {min}..={max}")]
    InvalidAmount { amount: u64, min: u64, max: u64 },

    /// The contract reported a balance too wide for the display type.
    #[error("balance {0} does not fit the display type")]
    BalanceOverflow(u128),

    /// An operation was attempted before the session connected.
    #[error("not connected")]
    NotConnected,

    /// A previous deposit or withdrawal is still awaiting confirmation.
    #[error("an operation is already in flight")]
    OperationInFlight,

    /// Static configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type TellerResult<T> = Result<T, TellerError>;
