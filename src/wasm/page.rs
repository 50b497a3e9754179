//! TellerPage: JS-facing surface for the single-page interface.
//!
//! The page owns one handle; everything it renders (phase, account,
//! balance, filtered history) comes from getters here, and the two
//! operations come back as `{action, amount, newBalance, flavor}`
//! objects. Errors cross as `{message, flavor}` so the notice and the
//! reaction render in one go.

use std::sync::Arc;

use wasm_bindgen::prelude::*;

use super::eip1193::detect;
use super::log;
use crate::error::TellerError;
use crate::executor::{Mood, Outcome};
use crate::history::HistoryFilter;
use crate::teller::{Teller, TellerConfig};

#[wasm_bindgen]
pub struct TellerPage {
    teller: Teller,
}

#[wasm_bindgen]
impl TellerPage {
    /// Build the page handle, detecting the injected provider once.
    /// `contract_address` falls back to the documented deployment.
    #[wasm_bindgen(constructor)]
    pub fn new(contract_address: Option<String>) -> Result<TellerPage, JsValue> {
        let config = match contract_address {
            Some(address) => TellerConfig::new(address),
            None => TellerConfig::default(),
        };
        let mut teller = Teller::new(config).map_err(to_js)?;
        match detect() {
            Some(provider) => {
                log!("[TellerPage] injected wallet detected");
                teller = teller.with_provider(Arc::new(provider));
            }
            None => log!("[TellerPage] no injected wallet on this page"),
        }
        Ok(Self { teller })
    }

    /// Drives the "install a wallet" notice.
    #[wasm_bindgen(getter, js_name = "hasProvider")]
    pub fn has_provider(&self) -> bool {
        self.teller.has_provider()
    }

    /// Closed amount range for the slider.
    #[wasm_bindgen(getter, js_name = "amountMin")]
    pub fn amount_min(&self) -> u64 {
        self.teller.config().amounts.min
    }

    #[wasm_bindgen(getter, js_name = "amountMax")]
    pub fn amount_max(&self) -> u64 {
        self.teller.config().amounts.max
    }

    /// Silent reconnect on page load; true when a prior authorization
    /// was adopted.
    pub async fn resume(&self) -> Result<bool, JsValue> {
        self.teller.resume().await.map_err(to_js)
    }

    /// Prompting connect; resolves to the active account address.
    pub async fn connect(&self) -> Result<JsValue, JsValue> {
        let account = self.teller.connect().await.map_err(to_js)?;
        Ok(JsValue::from_str(&account))
    }

    #[wasm_bindgen(getter)]
    pub fn phase(&self) -> String {
        self.teller.phase().as_str().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn account(&self) -> Option<String> {
        self.teller.account()
    }

    /// Cached display balance; `undefined` until the first good read.
    #[wasm_bindgen(getter)]
    pub fn balance(&self) -> Option<u64> {
        self.teller.balance()
    }

    #[wasm_bindgen(js_name = "refreshBalance")]
    pub async fn refresh_balance(&self) -> Result<u64, JsValue> {
        self.teller.refresh_balance().await.map_err(to_js)
    }

    pub async fn deposit(&self, amount: u32, note: Option<String>) -> Result<JsValue, JsValue> {
        let outcome = self
            .teller
            .deposit(u64::from(amount), note.as_deref().unwrap_or(""))
            .await
            .map_err(to_js)?;
        outcome_js(&outcome)
    }

    pub async fn withdraw(&self, amount: u32, note: Option<String>) -> Result<JsValue, JsValue> {
        let outcome = self
            .teller
            .withdraw(u64::from(amount), note.as_deref().unwrap_or(""))
            .await
            .map_err(to_js)?;
        outcome_js(&outcome)
    }

    /// Entries projected through the three-way filter
    /// ("All" | "Deposit" | "Withdraw"); anything else means "All".
    pub fn history(&self, filter: Option<String>) -> Result<JsValue, JsValue> {
        let filter = HistoryFilter::parse(filter.as_deref().unwrap_or("All"));
        serde_wasm_bindgen::to_value(&self.teller.history(filter))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

fn outcome_js(outcome: &Outcome) -> Result<JsValue, JsValue> {
    let payload = serde_json::json!({
        "action": outcome.action.as_str(),
        "amount": outcome.amount,
        "newBalance": outcome.new_balance,
        "flavor": outcome.mood.flavor(),
    });
    serde_wasm_bindgen::to_value(&payload).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn to_js(err: TellerError) -> JsValue {
    let payload = serde_json::json!({
        "message": err.to_string(),
        "flavor": Mood::Rattled.flavor(),
    });
    serde_wasm_bindgen::to_value(&payload).unwrap_or_else(|_| JsValue::from_str(&err.to_string()))
}
