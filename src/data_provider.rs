//! Lending data provider contract.
//!
//! Reads reserves, balances and proposals from the lending core, prices from
//! the oracle and origination fees from the fee provider, and answers the
//! valuation queries with a [`ValuationEngine`] built over those contracts.

use odra::casper_types::U256;
use odra::prelude::*;
use odra::ContractRef;

use crate::engine::{calculate_health_factor_from_balances, ValuationEngine};
use crate::error::LendingError;
use crate::provider::{FeeProvider, PriceOracle, ReserveRegistry};
use crate::state::{
    health_factor_liquidation_threshold, GlobalUserPosition, Proposal, ProposalSide,
    ReserveConfig, UserAccountData, UserReservePosition,
};

// ===========================================================================
// COLLABORATOR INTERFACES
// ===========================================================================

/// Entry points of the lending core this contract reads.
#[odra::external_contract]
pub trait LendingCore {
    fn get_reserves(&self) -> Vec<Address>;
    fn get_reserve_configuration(&self, reserve: Address) -> ReserveConfig;
    fn get_user_reserve_position(&self, reserve: Address, user: Address) -> UserReservePosition;
    fn get_borrow_proposal_count(&self) -> u64;
    fn get_lend_proposal_count(&self) -> u64;
    fn get_proposal(&self, proposal_id: u64, side: ProposalSide) -> Proposal;
}

/// Entry point of the price oracle.
#[odra::external_contract]
pub trait AssetPriceOracle {
    fn get_asset_price(&self, asset: Address) -> U256;
}

/// Entry point of the fee provider.
#[odra::external_contract]
pub trait OriginationFeeCalculator {
    fn calculate_loan_origination_fee(&self, user: Address, amount: U256) -> U256;
}

// A failing cross-contract call reverts the whole deploy, so the adapters
// below never produce an `Err` themselves.

struct CoreLedger(LendingCoreContractRef);

impl ReserveRegistry for CoreLedger {
    fn reserves(&self) -> Result<Vec<Address>, LendingError> {
        Ok(self.0.get_reserves())
    }

    fn reserve_configuration(&self, reserve: Address) -> Result<ReserveConfig, LendingError> {
        Ok(self.0.get_reserve_configuration(reserve))
    }

    fn user_reserve_position(
        &self,
        reserve: Address,
        user: Address,
    ) -> Result<UserReservePosition, LendingError> {
        Ok(self.0.get_user_reserve_position(reserve, user))
    }

    fn borrow_proposal_count(&self) -> Result<u64, LendingError> {
        Ok(self.0.get_borrow_proposal_count())
    }

    fn lend_proposal_count(&self) -> Result<u64, LendingError> {
        Ok(self.0.get_lend_proposal_count())
    }

    fn proposal(&self, proposal_id: u64, side: ProposalSide) -> Result<Proposal, LendingError> {
        Ok(self.0.get_proposal(proposal_id, side))
    }
}

struct OracleFeed(AssetPriceOracleContractRef);

impl PriceOracle for OracleFeed {
    fn asset_price(&self, asset: Address) -> Result<U256, LendingError> {
        Ok(self.0.get_asset_price(asset))
    }
}

struct FeeSchedule(OriginationFeeCalculatorContractRef);

impl FeeProvider for FeeSchedule {
    fn loan_origination_fee(&self, user: Address, amount: U256) -> Result<U256, LendingError> {
        Ok(self.0.calculate_loan_origination_fee(user, amount))
    }
}

type ContractEngine = ValuationEngine<CoreLedger, OracleFeed, FeeSchedule>;

// ===========================================================================
// CONTRACT
// ===========================================================================

#[odra::module]
pub struct LendingDataProvider {
    core: Var<Address>,
    oracle: Var<Address>,
    fee_provider: Var<Address>,
}

#[odra::module]
impl LendingDataProvider {
    pub fn init(&mut self, core: Address, oracle: Address, fee_provider: Address) {
        self.core.set(core);
        self.oracle.set(oracle);
        self.fee_provider.set(fee_provider);
    }

    /// Read-only accessors
    pub fn get_core(&self) -> Address {
        self.core.get_or_revert_with(LendingError::InvalidConfig)
    }

    pub fn get_oracle(&self) -> Address {
        self.oracle.get_or_revert_with(LendingError::InvalidConfig)
    }

    pub fn get_fee_provider(&self) -> Address {
        self.fee_provider.get_or_revert_with(LendingError::InvalidConfig)
    }

    // ===========================================================================
    // USER POSITION
    // ===========================================================================

    pub fn calculate_user_global_data(&self, user: Address) -> GlobalUserPosition {
        let result = self.engine().calculate_user_global_data(user);
        self.unwrap_or_revert(result)
    }

    pub fn get_user_account_data(&self, user: Address) -> UserAccountData {
        let result = self.engine().get_user_account_data(user);
        self.unwrap_or_revert(result)
    }

    pub fn is_user_liquidatable(&self, user: Address) -> bool {
        let result = self.engine().is_user_liquidatable(user);
        self.unwrap_or_revert(result)
    }

    pub fn get_reserve_configuration_data(&self, reserve: Address) -> ReserveConfig {
        let result = self.engine().registry.reserve_configuration(reserve);
        self.unwrap_or_revert(result)
    }

    pub fn get_user_reserve_data(&self, reserve: Address, user: Address) -> UserReservePosition {
        let result = self.engine().registry.user_reserve_position(reserve, user);
        self.unwrap_or_revert(result)
    }

    // ===========================================================================
    // SOLVENCY CHECKS
    // ===========================================================================

    pub fn get_health_factor_liquidation_threshold(&self) -> U256 {
        health_factor_liquidation_threshold().to_scaled_val()
    }

    pub fn calculate_health_factor_from_balances(
        &self,
        collateral_balance_eth: U256,
        borrow_balance_eth: U256,
        total_fees_eth: U256,
        liquidation_threshold: U256,
    ) -> U256 {
        let result = calculate_health_factor_from_balances(
            collateral_balance_eth,
            borrow_balance_eth,
            total_fees_eth,
            liquidation_threshold,
        );
        self.unwrap_or_revert(result).to_scaled_val()
    }

    pub fn balance_decrease_allowed(&self, reserve: Address, user: Address, amount: U256) -> bool {
        let result = self.engine().balance_decrease_allowed(reserve, user, amount);
        self.unwrap_or_revert(result)
    }

    pub fn calculate_collateral_needed_in_eth(
        &self,
        reserve: Address,
        amount: U256,
        fee: U256,
        user_current_borrow_balance_eth: U256,
        user_current_fees_eth: U256,
        user_current_ltv: U256,
    ) -> U256 {
        let result = self.engine().calculate_collateral_needed_in_eth(
            reserve,
            amount,
            fee,
            user_current_borrow_balance_eth,
            user_current_fees_eth,
            user_current_ltv,
        );
        self.unwrap_or_revert(result)
    }

    pub fn calculate_available_borrows_eth(
        &self,
        user: Address,
        collateral_balance_eth: U256,
        borrow_balance_eth: U256,
        total_fees_eth: U256,
        ltv: U256,
    ) -> U256 {
        let result = self.engine().calculate_available_borrows_eth(
            user,
            collateral_balance_eth,
            borrow_balance_eth,
            total_fees_eth,
            ltv,
        );
        self.unwrap_or_revert(result)
    }

    // ===========================================================================
    // PROPOSALS
    // ===========================================================================

    pub fn is_proposal_liquidatable(&self, proposal_id: u64, side: ProposalSide) -> bool {
        let now = self.env().get_block_time();
        let result = self.engine().is_proposal_liquidatable(proposal_id, side, now);
        self.unwrap_or_revert(result)
    }

    pub fn get_borrow_proposals(&self, start_index: u64, end_index: u64) -> Vec<Proposal> {
        let result = self.engine().get_borrow_proposals(start_index, end_index);
        self.unwrap_or_revert(result)
    }

    pub fn get_lend_proposals(&self, start_index: u64, end_index: u64) -> Vec<Proposal> {
        let result = self.engine().get_lend_proposals(start_index, end_index);
        self.unwrap_or_revert(result)
    }

    /// Scans every proposal on both sides.
    pub fn get_repayable_proposals(&self, user: Address) -> Vec<Proposal> {
        let result = self.engine().get_repayable_proposals(user);
        self.unwrap_or_revert(result)
    }

    // ===========================================================================
    // HELPER FUNCTIONS
    // ===========================================================================

    fn engine(&self) -> ContractEngine {
        let env = self.env();
        ValuationEngine::new(
            CoreLedger(LendingCoreContractRef::new(env.clone(), self.get_core())),
            OracleFeed(AssetPriceOracleContractRef::new(env.clone(), self.get_oracle())),
            FeeSchedule(OriginationFeeCalculatorContractRef::new(
                env,
                self.get_fee_provider(),
            )),
        )
    }

    fn unwrap_or_revert<T>(&self, result: Result<T, LendingError>) -> T {
        match result {
            Ok(value) => value,
            Err(error) => self.env().revert(error),
        }
    }
}
