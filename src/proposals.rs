//! Peer-to-peer proposals: liquidation eligibility and listing pages.

use log::debug;
use odra::prelude::*;

use crate::engine::{calculate_health_factor_from_balances, ValuationEngine};
use crate::error::LendingError;
use crate::math::amount_to_value;
use crate::provider::{FeeProvider, PriceOracle, ReserveRegistry};
use crate::state::{
    health_factor_liquidation_threshold, Proposal, ProposalSide, MAX_PROPOSAL_PAGE_SIZE,
};

impl<R, O, F> ValuationEngine<R, O, F>
where
    R: ReserveRegistry,
    O: PriceOracle,
    F: FeeProvider,
{
    /// Whether proposal `proposal_id` on `side` can be liquidated at block
    /// time `now`.
    ///
    /// An overdue proposal is always eligible, whatever its collateral.
    /// Otherwise the borrower's balance in the collateral reserve is weighed
    /// against the loan and its service fee with the pooled health factor
    /// formula.
    pub fn is_proposal_liquidatable(
        &self,
        proposal_id: u64,
        side: ProposalSide,
        now: u64,
    ) -> Result<bool, LendingError> {
        if proposal_id >= self.registry.proposal_count(side)? {
            return Err(LendingError::UnknownProposal);
        }
        let proposal = self.registry.proposal(proposal_id, side)?;
        if proposal.is_overdue(now) {
            debug!("proposal {} is past its due date", proposal_id);
            return Ok(true);
        }
        let borrower = proposal.borrower.ok_or(LendingError::ProposalNotAccepted)?;

        let collateral_config = self
            .registry
            .reserve_configuration(proposal.reserve_for_collateral)?;
        let collateral_balance = self
            .registry
            .user_reserve_position(proposal.reserve_for_collateral, borrower)?
            .compounded_liquidity_balance;
        let collateral_eth = amount_to_value(
            self.oracle.asset_price(proposal.reserve_for_collateral)?,
            collateral_balance,
            collateral_config.decimals,
        )?;

        let borrow_config = self
            .registry
            .reserve_configuration(proposal.reserve_to_receive)?;
        let borrow_price = self.oracle.asset_price(proposal.reserve_to_receive)?;
        let borrow_eth = amount_to_value(borrow_price, proposal.amount, borrow_config.decimals)?;
        let service_fee_eth =
            amount_to_value(borrow_price, proposal.service_fee, borrow_config.decimals)?;

        let health_factor = calculate_health_factor_from_balances(
            collateral_eth,
            borrow_eth,
            service_fee_eth,
            collateral_config.liquidation_threshold.into(),
        )?;
        let liquidatable = health_factor < health_factor_liquidation_threshold();
        debug!(
            "proposal {}: health factor {} liquidatable {}",
            proposal_id, health_factor, liquidatable
        );
        Ok(liquidatable)
    }

    /// Borrow-side proposals `start_index..=end_index`, in creation order.
    pub fn get_borrow_proposals(
        &self,
        start_index: u64,
        end_index: u64,
    ) -> Result<Vec<Proposal>, LendingError> {
        self.proposal_page(ProposalSide::Borrow, start_index, end_index)
    }

    /// Lend-side proposals `start_index..=end_index`, in creation order.
    pub fn get_lend_proposals(
        &self,
        start_index: u64,
        end_index: u64,
    ) -> Result<Vec<Proposal>, LendingError> {
        self.proposal_page(ProposalSide::Lend, start_index, end_index)
    }

    /// Accepted proposals on either side where `user` is the borrower.
    ///
    /// Reads every proposal ever created; cost grows with the total count.
    pub fn get_repayable_proposals(&self, user: Address) -> Result<Vec<Proposal>, LendingError> {
        let mut repayable = Vec::new();
        for side in [ProposalSide::Borrow, ProposalSide::Lend] {
            for proposal_id in 0..self.registry.proposal_count(side)? {
                let proposal = self.registry.proposal(proposal_id, side)?;
                if proposal.is_repayable_by(&user) {
                    repayable.push(proposal);
                }
            }
        }
        Ok(repayable)
    }

    fn proposal_page(
        &self,
        side: ProposalSide,
        start_index: u64,
        end_index: u64,
    ) -> Result<Vec<Proposal>, LendingError> {
        let count = self.registry.proposal_count(side)?;
        if start_index > end_index || end_index >= count {
            return Err(LendingError::InvalidProposalRange);
        }
        if end_index - start_index + 1 > MAX_PROPOSAL_PAGE_SIZE {
            return Err(LendingError::ProposalPageTooLarge);
        }
        (start_index..=end_index)
            .map(|proposal_id| self.registry.proposal(proposal_id, side))
            .collect()
    }
}
