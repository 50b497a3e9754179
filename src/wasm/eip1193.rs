//! EIP-1193 adapter: the injected `window.ethereum` object as a
//! `WalletProvider`, and raw JSON-RPC round trips as the contract handle.
//!
//! The contract ABI is static configuration, so the three selectors are
//! baked in rather than computed. Confirmation is receipt polling; the
//! chain offers nothing better over plain JSON-RPC.

use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use js_sys::{Array, Function, Object, Promise, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use crate::chain::{AtmContract, PendingTx};
use crate::error::{TellerError, TellerResult};
use crate::provider::WalletProvider;

// Fixed contract ABI, as 4-byte selectors.
const SELECTOR_GET_BALANCE: &str = "0x12065fe0"; // getBalance()
const SELECTOR_DEPOSIT: &str = "0xb6b55f25"; // deposit(uint256)
const SELECTOR_WITHDRAW: &str = "0x2e1a7d4d"; // withdraw(uint256)

const RECEIPT_POLL_MS: i32 = 1_000;

/// Check once, at startup, for an injected provider. Never blocks, never
/// throws; absence is an ordinary `None`.
pub fn detect() -> Option<Eip1193Provider> {
    let window = web_sys::window()?;
    let ethereum = Reflect::get(&window, &JsValue::from_str("ethereum")).ok()?;
    if ethereum.is_undefined() || ethereum.is_null() {
        return None;
    }
    Some(Eip1193Provider { ethereum })
}

/// Handle to the injected wallet object.
#[derive(Clone)]
pub struct Eip1193Provider {
    ethereum: JsValue,
}

impl Eip1193Provider {
    /// One `ethereum.request({method, params})` round trip.
    async fn request(&self, method: &str, params: Option<Array>) -> TellerResult<JsValue> {
        let call = Object::new();
        set(&call, "method", &JsValue::from_str(method))?;
        if let Some(params) = params {
            set(&call, "params", params.as_ref())?;
        }
        let request: Function = Reflect::get(&self.ethereum, &JsValue::from_str("request"))
            .map_err(js_err)?
            .dyn_into()
            .map_err(|_| TellerError::Remote(anyhow!("provider has no request method")))?;
        let promise: Promise = request
            .call1(&self.ethereum, &call)
            .map_err(classify)?
            .dyn_into()
            .map_err(|_| TellerError::Remote(anyhow!("provider request did not return a promise")))?;
        JsFuture::from(promise).await.map_err(classify)
    }
}

#[async_trait(?Send)]
impl WalletProvider for Eip1193Provider {
    async fn accounts(&self) -> TellerResult<Vec<String>> {
        let raw = self.request("eth_accounts", None).await?;
        Ok(string_list(raw))
    }

    async fn request_accounts(&self) -> TellerResult<Vec<String>> {
        let raw = self.request("eth_requestAccounts", None).await?;
        Ok(string_list(raw))
    }

    fn bind(&self, account: &str, address: &str) -> TellerResult<Arc<dyn AtmContract>> {
        Ok(Arc::new(Eip1193Contract {
            provider: self.clone(),
            account: account.to_string(),
            address: address.to_string(),
        }))
    }
}

/// The fixed contract, reached through the bound account's provider.
struct Eip1193Contract {
    provider: Eip1193Provider,
    account: String,
    address: String,
}

impl Eip1193Contract {
    fn call_object(&self, data: &str, value: Option<u128>) -> TellerResult<Object> {
        let tx = Object::new();
        set(&tx, "from", &JsValue::from_str(&self.account))?;
        set(&tx, "to", &JsValue::from_str(&self.address))?;
        set(&tx, "data", &JsValue::from_str(data))?;
        if let Some(value) = value {
            set(&tx, "value", &JsValue::from_str(&format!("0x{value:x}")))?;
        }
        Ok(tx)
    }

    async fn send(&self, data: String, value: Option<u128>) -> TellerResult<Box<dyn PendingTx>> {
        let tx = self.call_object(&data, value)?;
        let hash = self
            .provider
            .request("eth_sendTransaction", Some(Array::of1(&tx)))
            .await?
            .as_string()
            .ok_or_else(|| TellerError::Remote(anyhow!("eth_sendTransaction returned no hash")))?;
        Ok(Box::new(Eip1193Pending { provider: self.provider.clone(), hash }))
    }
}

#[async_trait(?Send)]
impl AtmContract for Eip1193Contract {
    async fn balance(&self) -> TellerResult<u128> {
        let call = self.call_object(SELECTOR_GET_BALANCE, None)?;
        let raw = self
            .provider
            .request("eth_call", Some(Array::of2(&call, &JsValue::from_str("latest"))))
            .await?
            .as_string()
            .ok_or_else(|| TellerError::Remote(anyhow!("eth_call returned no data")))?;
        parse_quantity(&raw)
    }

    async fn deposit(&self, amount: u64, value: u128) -> TellerResult<Box<dyn PendingTx>> {
        self.send(encode_with_amount(SELECTOR_DEPOSIT, amount), Some(value)).await
    }

    async fn withdraw(&self, amount: u64) -> TellerResult<Box<dyn PendingTx>> {
        self.send(encode_with_amount(SELECTOR_WITHDRAW, amount), None).await
    }
}

/// A submitted transaction, confirmed by receipt polling.
struct Eip1193Pending {
    provider: Eip1193Provider,
    hash: String,
}

#[async_trait(?Send)]
impl PendingTx for Eip1193Pending {
    async fn wait(&self) -> TellerResult<()> {
        loop {
            let receipt = self
                .provider
                .request("eth_getTransactionReceipt", Some(Array::of1(&JsValue::from_str(&self.hash))))
                .await?;
            if !receipt.is_null() && !receipt.is_undefined() {
                let status = Reflect::get(&receipt, &JsValue::from_str("status"))
                    .ok()
                    .and_then(|s| s.as_string());
                return match status.as_deref() {
                    Some("0x0") => Err(TellerError::Remote(anyhow!("transaction {} reverted", self.hash))),
                    _ => Ok(()),
                };
            }
            sleep_ms(RECEIPT_POLL_MS).await;
        }
    }
}

/// Selector plus one abi-encoded uint256 word.
fn encode_with_amount(selector: &str, amount: u64) -> String {
    format!("{selector}{amount:064x}")
}

/// Parse a 0x-quantity or 32-byte word into `u128`.
fn parse_quantity(raw: &str) -> TellerResult<u128> {
    let digits = raw.strip_prefix("0x").unwrap_or(raw);
    let padded = if digits.len() % 2 == 1 { format!("0{digits}") } else { digits.to_string() };
    let bytes = hex::decode(&padded).map_err(|e| TellerError::Remote(anyhow!("bad quantity {raw}: {e}")))?;
    let split = bytes.len().saturating_sub(16);
    if bytes[..split].iter().any(|b| *b != 0) {
        return Err(TellerError::Remote(anyhow!("chain value in {raw} exceeds 128 bits")));
    }
    let mut out = 0u128;
    for b in &bytes[split..] {
        out = (out << 8) | u128::from(*b);
    }
    Ok(out)
}

fn string_list(value: JsValue) -> Vec<String> {
    Array::from(&value).iter().filter_map(|v| v.as_string()).collect()
}

fn set(target: &Object, key: &str, value: &JsValue) -> TellerResult<()> {
    Reflect::set(target, &JsValue::from_str(key), value).map_err(js_err)?;
    Ok(())
}

fn js_err(err: JsValue) -> TellerError {
    TellerError::Remote(anyhow!("{err:?}"))
}

/// EIP-1193 error classification. Code 4001 is the user closing the
/// prompt; "insufficient" in the revert text is the ledger refusing an
/// overdraw. Everything else is transport.
fn classify(err: JsValue) -> TellerError {
    let code = Reflect::get(&err, &JsValue::from_str("code")).ok().and_then(|c| c.as_f64());
    if code == Some(4001.0) {
        return TellerError::UserRejected;
    }
    let message = Reflect::get(&err, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .unwrap_or_else(|| format!("{err:?}"));
    if message.to_ascii_lowercase().contains("insufficient") {
        return TellerError::InsufficientFunds;
    }
    TellerError::Remote(anyhow!(message))
}

/// Yield back to the event loop between receipt polls.
async fn sleep_ms(ms: i32) {
    let promise = Promise::new(&mut |resolve, _reject| {
        let scheduled = web_sys::window()
            .and_then(|w| w.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms).ok());
        if scheduled.is_none() {
            let _ = resolve.call0(&JsValue::NULL);
        }
    });
    let _ = JsFuture::from(promise).await;
}
