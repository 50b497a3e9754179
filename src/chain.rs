//! Contract boundary.
//!
//! The deployed teller contract is an external collaborator: an opaque
//! remote ledger reached through whatever signer the provider bound. The
//! traits here are the whole surface the core touches. Tests satisfy them
//! with a deterministic in-memory ledger; the browser build satisfies them
//! with an EIP-1193 JSON-RPC adapter.

use async_trait::async_trait;

use crate::error::TellerResult;

/// Thread bounds for boundary objects. Relaxed on wasm, where JS handles
/// are not `Send` and the event loop is single-threaded anyway.
#[cfg(not(target_arch = "wasm32"))]
pub trait MaybeSendSync: Send + Sync {}
#[cfg(not(target_arch = "wasm32"))]
impl<T: Send + Sync> MaybeSendSync for T {}

#[cfg(target_arch = "wasm32")]
pub trait MaybeSendSync {}
#[cfg(target_arch = "wasm32")]
impl<T> MaybeSendSync for T {}

/// A submitted state-changing call the chain has acknowledged as pending.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait PendingTx: MaybeSendSync {
    /// Suspend until the remote ledger confirms the call, or fail.
    async fn wait(&self) -> TellerResult<()>;
}

/// Handle to the fixed teller contract, bound to one account's signing
/// capability for the life of the session.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait AtmContract: MaybeSendSync {
    /// Current balance in the contract's own units. Wide on purpose: the
    /// wallet type exceeds anything float-safe.
    async fn balance(&self) -> TellerResult<u128>;

    /// Submit a deposit of `amount` units, attaching `value` base units
    /// to the call.
    async fn deposit(&self, amount: u64, value: u128) -> TellerResult<Box<dyn PendingTx>>;

    /// Submit a withdrawal of `amount` units. No value rides along; the
    /// amount travels only as a call parameter.
    async fn withdraw(&self, amount: u64) -> TellerResult<Box<dyn PendingTx>>;
}
