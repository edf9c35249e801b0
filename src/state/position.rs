use odra::casper_types::U256;

use crate::math::Decimal;

// --- Global User Position ---

/// A user's position across every reserve, valued in ETH.
///
/// Derived on every query and never stored.
#[odra::odra_type]
pub struct GlobalUserPosition {
    pub total_liquidity_eth: U256,
    pub total_collateral_eth: U256,
    pub total_borrow_eth: U256,
    pub total_fees_eth: U256,
    /// Collateral-value-weighted base LTV, 0-100
    pub average_ltv: U256,
    /// Collateral-value-weighted liquidation threshold, 0-100
    pub average_liquidation_threshold: U256,
    /// WAD-scaled; `U256::MAX` when there is no debt
    pub health_factor: U256,
    pub health_factor_below_threshold: bool,
}

impl GlobalUserPosition {
    pub fn health_factor(&self) -> Decimal {
        Decimal::from_scaled_val(self.health_factor)
    }

    pub fn has_debt(&self) -> bool {
        !self.total_borrow_eth.is_zero()
    }
}

/// [`GlobalUserPosition`] plus what the user may still borrow.
#[odra::odra_type]
pub struct UserAccountData {
    pub total_liquidity_eth: U256,
    pub total_collateral_eth: U256,
    pub total_borrow_eth: U256,
    pub total_fees_eth: U256,
    pub available_borrows_eth: U256,
    pub current_liquidation_threshold: U256,
    pub ltv: U256,
    pub health_factor: U256,
}

impl UserAccountData {
    pub fn new(position: &GlobalUserPosition, available_borrows_eth: U256) -> Self {
        Self {
            total_liquidity_eth: position.total_liquidity_eth,
            total_collateral_eth: position.total_collateral_eth,
            total_borrow_eth: position.total_borrow_eth,
            total_fees_eth: position.total_fees_eth,
            available_borrows_eth,
            current_liquidation_threshold: position.average_liquidation_threshold,
            ltv: position.average_ltv,
            health_factor: position.health_factor,
        }
    }
}
