//! Collaborators the valuation engine reads from.
//!
//! All three are read-only from the engine's point of view. An `Err` from any
//! of them aborts the query that triggered it; nothing is retried.

use odra::casper_types::U256;
use odra::prelude::*;

use crate::error::LendingError;
use crate::state::{Proposal, ProposalSide, ReserveConfig, UserReservePosition};

/// The lending core's ledger: reserves, per-user balances and proposals.
pub trait ReserveRegistry {
    /// Every registered reserve, in registry order.
    fn reserves(&self) -> Result<Vec<Address>, LendingError>;

    fn reserve_configuration(&self, reserve: Address) -> Result<ReserveConfig, LendingError>;

    fn user_reserve_position(
        &self,
        reserve: Address,
        user: Address,
    ) -> Result<UserReservePosition, LendingError>;

    fn borrow_proposal_count(&self) -> Result<u64, LendingError>;

    fn lend_proposal_count(&self) -> Result<u64, LendingError>;

    fn proposal(&self, proposal_id: u64, side: ProposalSide) -> Result<Proposal, LendingError>;

    fn proposal_count(&self, side: ProposalSide) -> Result<u64, LendingError> {
        match side {
            ProposalSide::Borrow => self.borrow_proposal_count(),
            ProposalSide::Lend => self.lend_proposal_count(),
        }
    }
}

/// Unit prices in the common reference unit (ETH), same scale for every asset.
pub trait PriceOracle {
    fn asset_price(&self, asset: Address) -> Result<U256, LendingError>;
}

/// Origination fee charged on a new borrow.
pub trait FeeProvider {
    fn loan_origination_fee(&self, user: Address, amount: U256) -> Result<U256, LendingError>;
}

impl<T: ReserveRegistry + ?Sized> ReserveRegistry for &T {
    fn reserves(&self) -> Result<Vec<Address>, LendingError> {
        (**self).reserves()
    }

    fn reserve_configuration(&self, reserve: Address) -> Result<ReserveConfig, LendingError> {
        (**self).reserve_configuration(reserve)
    }

    fn user_reserve_position(
        &self,
        reserve: Address,
        user: Address,
    ) -> Result<UserReservePosition, LendingError> {
        (**self).user_reserve_position(reserve, user)
    }

    fn borrow_proposal_count(&self) -> Result<u64, LendingError> {
        (**self).borrow_proposal_count()
    }

    fn lend_proposal_count(&self) -> Result<u64, LendingError> {
        (**self).lend_proposal_count()
    }

    fn proposal(&self, proposal_id: u64, side: ProposalSide) -> Result<Proposal, LendingError> {
        (**self).proposal(proposal_id, side)
    }
}

impl<T: PriceOracle + ?Sized> PriceOracle for &T {
    fn asset_price(&self, asset: Address) -> Result<U256, LendingError> {
        (**self).asset_price(asset)
    }
}

impl<T: FeeProvider + ?Sized> FeeProvider for &T {
    fn loan_origination_fee(&self, user: Address, amount: U256) -> Result<U256, LendingError> {
        (**self).loan_origination_fee(user, amount)
    }
}
