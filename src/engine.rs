//! Valuation engine: values a user's position across every reserve and
//! answers the solvency questions built on it.

use log::{debug, trace};
use odra::casper_types::U256;
use odra::prelude::*;

use crate::error::LendingError;
use crate::math::{amount_to_value, Decimal, TryAdd, TryDiv, TryMul, TrySub};
use crate::provider::{FeeProvider, PriceOracle, ReserveRegistry};
use crate::state::{
    health_factor_liquidation_threshold, GlobalUserPosition, ReserveConfig, UserAccountData,
    UserReservePosition, PERCENTAGE_BASE,
};

/// Health factor from aggregate balances.
///
/// `(collateral * liquidation_threshold / 100)` WAD-divided by
/// `(borrow + fees)`. No debt means unbounded health, reported as
/// [`Decimal::max_value`]. Pooled positions and proposals both go through here.
pub fn calculate_health_factor_from_balances(
    collateral_eth: U256,
    borrow_eth: U256,
    fees_eth: U256,
    liquidation_threshold: U256,
) -> Result<Decimal, LendingError> {
    if borrow_eth.is_zero() {
        return Ok(Decimal::max_value());
    }
    let weighted_collateral = collateral_eth
        .try_mul(liquidation_threshold)?
        .try_div(U256::from(PERCENTAGE_BASE))?;
    Decimal::try_from_ratio(weighted_collateral, borrow_eth.try_add(fees_eth)?)
}

/// Running sums while walking the reserves.
#[derive(Default)]
struct PositionTotals {
    liquidity_eth: U256,
    collateral_eth: U256,
    borrow_eth: U256,
    fees_eth: U256,
    ltv_numerator: U256,
    liquidation_threshold_numerator: U256,
}

impl PositionTotals {
    fn add_reserve(
        &mut self,
        config: &ReserveConfig,
        position: &UserReservePosition,
        price: U256,
    ) -> Result<(), LendingError> {
        if !position.compounded_liquidity_balance.is_zero() {
            let liquidity_eth =
                amount_to_value(price, position.compounded_liquidity_balance, config.decimals)?;
            self.liquidity_eth = self.liquidity_eth.try_add(liquidity_eth)?;

            if config.counts_as_collateral(position) {
                self.collateral_eth = self.collateral_eth.try_add(liquidity_eth)?;
                self.ltv_numerator = self
                    .ltv_numerator
                    .try_add(liquidity_eth.try_mul(U256::from(config.base_ltv))?)?;
                self.liquidation_threshold_numerator = self.liquidation_threshold_numerator.try_add(
                    liquidity_eth.try_mul(U256::from(config.liquidation_threshold))?,
                )?;
            }
        }

        if !position.compounded_borrow_balance.is_zero() {
            self.borrow_eth = self.borrow_eth.try_add(amount_to_value(
                price,
                position.compounded_borrow_balance,
                config.decimals,
            )?)?;
            self.fees_eth = self.fees_eth.try_add(amount_to_value(
                price,
                position.origination_fee,
                config.decimals,
            )?)?;
        }
        Ok(())
    }

    fn finalize(self) -> Result<GlobalUserPosition, LendingError> {
        let (average_ltv, average_liquidation_threshold) = if self.collateral_eth.is_zero() {
            (U256::zero(), U256::zero())
        } else {
            (
                self.ltv_numerator.try_div(self.collateral_eth)?,
                self.liquidation_threshold_numerator.try_div(self.collateral_eth)?,
            )
        };

        let health_factor = calculate_health_factor_from_balances(
            self.collateral_eth,
            self.borrow_eth,
            self.fees_eth,
            average_liquidation_threshold,
        )?;

        Ok(GlobalUserPosition {
            total_liquidity_eth: self.liquidity_eth,
            total_collateral_eth: self.collateral_eth,
            total_borrow_eth: self.borrow_eth,
            total_fees_eth: self.fees_eth,
            average_ltv,
            average_liquidation_threshold,
            health_factor: health_factor.to_scaled_val(),
            health_factor_below_threshold: health_factor < health_factor_liquidation_threshold(),
        })
    }
}

/// Read-only valuation over a registry, a price oracle and a fee provider.
pub struct ValuationEngine<R, O, F> {
    pub(crate) registry: R,
    pub(crate) oracle: O,
    pub(crate) fees: F,
}

impl<R, O, F> ValuationEngine<R, O, F>
where
    R: ReserveRegistry,
    O: PriceOracle,
    F: FeeProvider,
{
    pub fn new(registry: R, oracle: O, fees: F) -> Self {
        Self {
            registry,
            oracle,
            fees,
        }
    }

    /// Value `user`'s balances in every registered reserve.
    ///
    /// Reserves where the user neither supplies nor borrows are skipped
    /// before the oracle is consulted, so they need no live price.
    pub fn calculate_user_global_data(
        &self,
        user: Address,
    ) -> Result<GlobalUserPosition, LendingError> {
        let mut totals = PositionTotals::default();

        for reserve in self.registry.reserves()? {
            let position = self.registry.user_reserve_position(reserve, user)?;
            if position.is_empty() {
                continue;
            }
            let config = self.registry.reserve_configuration(reserve)?;
            let price = self.oracle.asset_price(reserve)?;
            trace!(
                "reserve {:?}: price {} liquidity {} borrow {}",
                reserve,
                price,
                position.compounded_liquidity_balance,
                position.compounded_borrow_balance
            );
            totals.add_reserve(&config, &position, price)?;
        }

        let position = totals.finalize()?;
        debug!(
            "user {:?}: collateral {} borrow {} fees {} health factor {}",
            user,
            position.total_collateral_eth,
            position.total_borrow_eth,
            position.total_fees_eth,
            position.health_factor()
        );
        Ok(position)
    }

    /// Global position plus remaining borrow capacity.
    pub fn get_user_account_data(&self, user: Address) -> Result<UserAccountData, LendingError> {
        let position = self.calculate_user_global_data(user)?;
        let available_borrows_eth = self.calculate_available_borrows_eth(
            user,
            position.total_collateral_eth,
            position.total_borrow_eth,
            position.total_fees_eth,
            position.average_ltv,
        )?;
        Ok(UserAccountData::new(&position, available_borrows_eth))
    }

    pub fn is_user_liquidatable(&self, user: Address) -> Result<bool, LendingError> {
        Ok(self
            .calculate_user_global_data(user)?
            .health_factor_below_threshold)
    }

    /// Whether `user` may withdraw `amount` of `reserve` and stay healthy.
    ///
    /// The resulting health factor must be strictly above 1.0. A decrease
    /// worth the whole collateral (or more) is refused while debt remains.
    pub fn balance_decrease_allowed(
        &self,
        reserve: Address,
        user: Address,
        amount: U256,
    ) -> Result<bool, LendingError> {
        let config = self.registry.reserve_configuration(reserve)?;
        let reserve_position = self.registry.user_reserve_position(reserve, user)?;
        if !config.counts_as_collateral(&reserve_position) {
            return Ok(true);
        }

        let position = self.calculate_user_global_data(user)?;
        if !position.has_debt() {
            return Ok(true);
        }
        if amount.is_zero() {
            return Err(LendingError::InvalidAmount);
        }

        let price = self.oracle.asset_price(reserve)?;
        let decrease_eth = amount_to_value(price, amount, config.decimals)?;
        if decrease_eth >= position.total_collateral_eth {
            debug!(
                "decrease of {} ETH leaves user {:?} without collateral",
                decrease_eth, user
            );
            return Ok(false);
        }
        let collateral_after = position.total_collateral_eth.try_sub(decrease_eth)?;

        // Stale inputs can make the reserve's share exceed the weighted sum;
        // a zero threshold then fails the check below.
        let threshold_after = position
            .total_collateral_eth
            .try_mul(position.average_liquidation_threshold)?
            .saturating_sub(decrease_eth.try_mul(U256::from(config.liquidation_threshold))?)
            .try_div(collateral_after)?;

        let health_factor_after = calculate_health_factor_from_balances(
            collateral_after,
            position.total_borrow_eth,
            position.total_fees_eth,
            threshold_after,
        )?;
        let allowed = health_factor_after > health_factor_liquidation_threshold();
        debug!(
            "decrease of {} ETH for user {:?}: health factor after {} allowed {}",
            decrease_eth, user, health_factor_after, allowed
        );
        Ok(allowed)
    }

    /// Collateral, in ETH, needed to back current debt plus a new borrow of
    /// `amount + fee` of `reserve` at `current_ltv`.
    pub fn calculate_collateral_needed_in_eth(
        &self,
        reserve: Address,
        amount: U256,
        fee: U256,
        current_borrow_eth: U256,
        current_fees_eth: U256,
        current_ltv: U256,
    ) -> Result<U256, LendingError> {
        if amount.is_zero() {
            return Err(LendingError::InvalidAmount);
        }
        if current_ltv.is_zero() {
            return Err(LendingError::DivisionByZero);
        }

        let config = self.registry.reserve_configuration(reserve)?;
        let price = self.oracle.asset_price(reserve)?;
        let requested_borrow_eth = amount_to_value(price, amount.try_add(fee)?, config.decimals)?;

        current_borrow_eth
            .try_add(current_fees_eth)?
            .try_add(requested_borrow_eth)?
            .try_mul(U256::from(PERCENTAGE_BASE))?
            .try_div(current_ltv)
    }

    /// How much more `user` may borrow, in ETH, net of the origination fee.
    ///
    /// Never negative: floors at zero when the position is already at or
    /// over capacity.
    pub fn calculate_available_borrows_eth(
        &self,
        user: Address,
        collateral_eth: U256,
        borrow_eth: U256,
        fees_eth: U256,
        ltv: U256,
    ) -> Result<U256, LendingError> {
        let capacity = collateral_eth
            .try_mul(ltv)?
            .try_div(U256::from(PERCENTAGE_BASE))?;
        if capacity < borrow_eth {
            return Ok(U256::zero());
        }

        let available = capacity.saturating_sub(borrow_eth.try_add(fees_eth)?);
        let origination_fee = self.fees.loan_origination_fee(user, available)?;
        Ok(available.saturating_sub(origination_fee))
    }
}
