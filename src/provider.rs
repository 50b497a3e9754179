//! Wallet provider boundary.
//!
//! A capability interface any browser-injected or embedded signer can
//! satisfy. The handle is injected into the teller by whoever owns the
//! page; nothing in the core reads ambient globals. Detection of the
//! injected `window.ethereum` object lives in the browser adapter.

use std::sync::Arc;

use async_trait::async_trait;

use crate::chain::{AtmContract, MaybeSendSync};
use crate::error::TellerResult;

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait WalletProvider: MaybeSendSync {
    /// Accounts the user already authorized, queried without prompting.
    async fn accounts(&self) -> TellerResult<Vec<String>>;

    /// Prompt the user to authorize accounts. Fails `UserRejected` when
    /// the prompt is declined.
    async fn request_accounts(&self) -> TellerResult<Vec<String>>;

    /// Construct the contract handle at `address`, bound to `account`'s
    /// signing capability. Called once per session.
    fn bind(&self, account: &str, address: &str) -> TellerResult<Arc<dyn AtmContract>>;
}
