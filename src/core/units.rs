//! Unit arithmetic at the contract boundary.
//!
//! The contract counts its balance in whole units but the chain transfers
//! value in a base unit of `10^decimals` per whole unit, reported through
//! wide 256-bit wallet types. Everything here is checked; nothing narrows
//! or scales silently.

use crate::error::{TellerError, TellerResult};

/// Scale a display-unit amount up to base units for value transfer.
/// `None` when `10^decimals` or the product leaves `u128`.
pub fn to_base(amount: u64, decimals: u8) -> Option<u128> {
    let scale = 10u128.checked_pow(u32::from(decimals))?;
    u128::from(amount).checked_mul(scale)
}

/// Narrow a wide chain value to the display type.
pub fn to_display(wide: u128) -> TellerResult<u64> {
    u64::try_from(wide).map_err(|_| TellerError::BalanceOverflow(wide))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_unit_scaling() {
        assert_eq!(to_base(1, 18), Some(1_000_000_000_000_000_000));
        assert_eq!(to_base(100, 18), Some(100_000_000_000_000_000_000));
        assert_eq!(to_base(7, 0), Some(7));
    }

    #[test]
    fn base_unit_scaling_rejects_overflow() {
        // 10^39 alone leaves u128
        assert_eq!(to_base(1, 39), None);
        assert_eq!(to_base(u64::MAX, 21), None);
    }

    #[test]
    fn display_narrowing() {
        assert_eq!(to_display(0).unwrap(), 0);
        assert_eq!(to_display(u128::from(u64::MAX)).unwrap(), u64::MAX);
        let wide = u128::from(u64::MAX) + 1;
        assert!(matches!(
            to_display(wide),
            Err(TellerError::BalanceOverflow(w)) if w == wide
        ));
    }
}
