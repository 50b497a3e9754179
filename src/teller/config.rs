//! Teller configuration - static, consumed by the core, produced by the page.

use crate::error::{TellerError, TellerResult};
use crate::executor::AmountRange;

/// First contract deployed on a stock local development chain.
/// Embedders point real pages elsewhere.
pub const DEFAULT_CONTRACT_ADDRESS: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

#[derive(Debug, Clone)]
pub struct TellerConfig {
    /// Fixed contract the whole session talks to.
    pub contract_address: String,
    /// Base-unit decimals for value transfer (wei-style).
    pub decimals: u8,
    /// Closed amount range the page slider exposes.
    pub amounts: AmountRange,
}

impl Default for TellerConfig {
    fn default() -> Self {
        Self {
            contract_address: DEFAULT_CONTRACT_ADDRESS.into(),
            decimals: 18,
            amounts: AmountRange::default(),
        }
    }
}

impl TellerConfig {
    pub fn new(contract_address: impl Into<String>) -> Self {
        Self { contract_address: contract_address.into(), ..Default::default() }
    }

    pub fn with_decimals(mut self, decimals: u8) -> Self {
        self.decimals = decimals;
        self
    }

    pub fn with_amounts(mut self, min: u64, max: u64) -> Self {
        self.amounts = AmountRange { min, max };
        self
    }

    pub(crate) fn validate(&self) -> TellerResult<()> {
        let hex_part = self.contract_address.strip_prefix("0x").ok_or_else(|| {
            TellerError::InvalidConfig(format!(
                "contract address must be 0x-prefixed: {}",
                self.contract_address
            ))
        })?;
        let bytes = hex::decode(hex_part)
            .map_err(|e| TellerError::InvalidConfig(format!("contract address is not hex: {e}")))?;
        if bytes.len() != 20 {
            return Err(TellerError::InvalidConfig(format!(
                "contract address must be 20 bytes, got {}",
                bytes.len()
            )));
        }
        if self.amounts.min == 0 || self.amounts.min > self.amounts.max {
            return Err(TellerError::InvalidConfig(format!(
                "amount range {}..={} is not a positive closed range",
                self.amounts.min, self.amounts.max
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(TellerConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_malformed_addresses() {
        for bad in ["5FbDB2315678afecb367f032d93F642f64180aa3", "0xnothex", "0x00ff"] {
            let config = TellerConfig::new(bad);
            assert!(matches!(config.validate(), Err(TellerError::InvalidConfig(_))), "{bad}");
        }
    }

    #[test]
    fn rejects_degenerate_amount_ranges() {
        let zero_min = TellerConfig::default().with_amounts(0, 100);
        assert!(matches!(zero_min.validate(), Err(TellerError::InvalidConfig(_))));
        let inverted = TellerConfig::default().with_amounts(50, 10);
        assert!(matches!(inverted.validate(), Err(TellerError::InvalidConfig(_))));
    }
}
