//! Balance oracle - the only reader of the contract's balance query.
//!
//! Narrows the chain's wide value to the display type and remembers the
//! last successful read. A failed refresh keeps the previous value in
//! place; the display never silently falls back to zero.

use std::sync::{Arc, Mutex};

use crate::chain::AtmContract;
use crate::core::units;
use crate::error::TellerResult;

pub struct BalanceOracle {
    contract: Arc<dyn AtmContract>,
    last_known: Mutex<Option<u64>>,
}

impl BalanceOracle {
    pub fn new(contract: Arc<dyn AtmContract>) -> Self {
        Self { contract, last_known: Mutex::new(None) }
    }

    /// Query the contract and cache the narrowed result. On error the
    /// cache is untouched and the error propagates to the caller.
    pub async fn refresh(&self) -> TellerResult<u64> {
        let wide = self.contract.balance().await?;
        let display = units::to_display(wide)?;
        *self.cache() = Some(display);
        Ok(display)
    }

    /// Last successfully fetched balance, if any fetch has succeeded.
    pub fn last_known(&self) -> Option<u64> {
        *self.cache()
    }

    fn cache(&self) -> std::sync::MutexGuard<'_, Option<u64>> {
        self.last_known.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
