//! WASM module: the teller in the browser.
//!
//! Architecture:
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          TellerPage (JS API)            │
//! │  connect, resume, deposit, withdraw,    │
//! │  balance, history                       │
//! └─────────────────┬───────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────┐
//! │            Teller (core)                │
//! │  session + oracle + executor + history  │
//! └─────────────────┬───────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────┐
//! │       Eip1193Provider (adapter)         │
//! │  window.ethereum request round trips    │
//! └─────────────────────────────────────────┘
//! ```

mod eip1193;
mod page;

pub use eip1193::{detect, Eip1193Provider};
pub use page::TellerPage;

use wasm_bindgen::prelude::*;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Log to browser console
pub fn console_log(s: &str) {
    web_sys::console::log_1(&JsValue::from_str(s));
}

macro_rules! log {
    ($($t:tt)*) => {
        crate::wasm::console_log(&format!($($t)*))
    }
}

pub(crate) use log;
