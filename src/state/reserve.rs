use odra::casper_types::U256;

use crate::error::LendingError;
use crate::state::PERCENTAGE_BASE;

/// Risk parameters of a reserve, owned by the lending core.
#[odra::odra_type]
#[derive(Copy)]
pub struct ReserveConfig {
    /// Decimals of the underlying token
    pub decimals: u8,
    /// Base loan to value, 0-100
    pub base_ltv: u8,
    /// Collateral weighting at which a position becomes liquidatable, 0-100
    pub liquidation_threshold: u8,
    /// Whether deposits of this reserve may back borrows at all
    pub usage_as_collateral_enabled: bool,
}

impl ReserveConfig {
    /// Reject percentages above 100 and a threshold below the base LTV.
    pub fn validate(&self) -> Result<(), LendingError> {
        let base = PERCENTAGE_BASE as u8;
        if self.base_ltv > base || self.liquidation_threshold > base {
            return Err(LendingError::InvalidConfig);
        }
        if self.liquidation_threshold < self.base_ltv {
            return Err(LendingError::InvalidConfig);
        }
        Ok(())
    }

    /// True when the reserve is collateral-eligible and `position` opted in.
    pub fn counts_as_collateral(&self, position: &UserReservePosition) -> bool {
        self.usage_as_collateral_enabled && position.use_as_collateral
    }
}

/// Snapshot of one user's balances in one reserve, interest included.
#[odra::odra_type]
#[derive(Default)]
pub struct UserReservePosition {
    pub compounded_liquidity_balance: U256,
    pub compounded_borrow_balance: U256,
    pub origination_fee: U256,
    pub use_as_collateral: bool,
}

impl UserReservePosition {
    /// Neither supplied nor borrowed; such reserves are skipped without pricing.
    pub fn is_empty(&self) -> bool {
        self.compounded_liquidity_balance.is_zero() && self.compounded_borrow_balance.is_zero()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn config(base_ltv: u8, liquidation_threshold: u8) -> ReserveConfig {
        ReserveConfig {
            decimals: 18,
            base_ltv,
            liquidation_threshold,
            usage_as_collateral_enabled: true,
        }
    }

    #[test]
    fn validate_accepts_threshold_above_ltv() {
        assert_eq!(config(75, 80).validate(), Ok(()));
        assert_eq!(config(0, 0).validate(), Ok(()));
        assert_eq!(config(100, 100).validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_bad_percentages() {
        assert_eq!(config(80, 75).validate(), Err(LendingError::InvalidConfig));
        assert_eq!(config(50, 101).validate(), Err(LendingError::InvalidConfig));
    }

    #[test]
    fn collateral_needs_both_flags() {
        let mut position = UserReservePosition {
            compounded_liquidity_balance: U256::one(),
            use_as_collateral: true,
            ..Default::default()
        };
        let mut reserve = config(75, 80);
        assert!(reserve.counts_as_collateral(&position));
        position.use_as_collateral = false;
        assert!(!reserve.counts_as_collateral(&position));
        position.use_as_collateral = true;
        reserve.usage_as_collateral_enabled = false;
        assert!(!reserve.counts_as_collateral(&position));
    }

    #[test]
    fn empty_position() {
        let mut position = UserReservePosition::default();
        assert!(position.is_empty());
        position.origination_fee = U256::from(5u64);
        assert!(position.is_empty());
        position.compounded_borrow_balance = U256::one();
        assert!(!position.is_empty());
    }
}
