//! Stand-in collaborators for local deployments and tests: a lending core
//! holding reserves, balances and proposals, a price oracle and a flat-rate
//! fee provider.

use odra::casper_types::U256;
use odra::prelude::*;

use crate::error::LendingError;
use crate::math::{TryDiv, TryMul, WAD};
use crate::state::{Proposal, ProposalSide, ReserveConfig, UserReservePosition};

// ===========================================================================
// LENDING CORE
// ===========================================================================

#[odra::module]
pub struct MockLendingCore {
    reserves: List<Address>,
    configurations: Mapping<Address, ReserveConfig>,
    positions: Mapping<(Address, Address), UserReservePosition>,
    borrow_proposals: List<Proposal>,
    lend_proposals: List<Proposal>,
}

#[odra::module]
impl MockLendingCore {
    /// Register `reserve`, or replace its configuration.
    pub fn set_reserve_configuration(&mut self, reserve: Address, config: ReserveConfig) {
        if let Err(error) = config.validate() {
            self.env().revert(error);
        }
        if self.configurations.get(&reserve).is_none() {
            self.reserves.push(reserve);
        }
        self.configurations.set(&reserve, config);
    }

    pub fn set_user_reserve_position(
        &mut self,
        reserve: Address,
        user: Address,
        position: UserReservePosition,
    ) {
        self.require_reserve(&reserve);
        self.positions.set(&(reserve, user), position);
    }

    /// Append `proposal` to its side's listing; the stored id is its index.
    pub fn submit_proposal(&mut self, proposal: Proposal) -> u64 {
        let mut proposal = proposal;
        let listing = self.listing_mut(proposal.side);
        proposal.id = listing.len() as u64;
        let id = proposal.id;
        listing.push(proposal);
        id
    }

    pub fn update_proposal(&mut self, proposal: Proposal) {
        let index = match u32::try_from(proposal.id) {
            Ok(index) if index < self.listing_mut(proposal.side).len() => index,
            _ => self.env().revert(LendingError::UnknownProposal),
        };
        self.listing_mut(proposal.side).replace(index, proposal);
    }

    pub fn get_reserves(&self) -> Vec<Address> {
        self.reserves.iter().collect()
    }

    pub fn get_reserve_configuration(&self, reserve: Address) -> ReserveConfig {
        self.configurations
            .get(&reserve)
            .unwrap_or_revert_with(&self.env(), LendingError::UnknownReserve)
    }

    /// Untouched balances read as zero.
    pub fn get_user_reserve_position(
        &self,
        reserve: Address,
        user: Address,
    ) -> UserReservePosition {
        self.require_reserve(&reserve);
        self.positions.get(&(reserve, user)).unwrap_or_default()
    }

    pub fn get_borrow_proposal_count(&self) -> u64 {
        self.borrow_proposals.len() as u64
    }

    pub fn get_lend_proposal_count(&self) -> u64 {
        self.lend_proposals.len() as u64
    }

    pub fn get_proposal(&self, proposal_id: u64, side: ProposalSide) -> Proposal {
        let listing = match side {
            ProposalSide::Borrow => &self.borrow_proposals,
            ProposalSide::Lend => &self.lend_proposals,
        };
        u32::try_from(proposal_id)
            .ok()
            .and_then(|index| listing.get(index))
            .unwrap_or_revert_with(&self.env(), LendingError::UnknownProposal)
    }

    fn require_reserve(&self, reserve: &Address) {
        if self.configurations.get(reserve).is_none() {
            self.env().revert(LendingError::UnknownReserve);
        }
    }

    fn listing_mut(&mut self, side: ProposalSide) -> &mut List<Proposal> {
        match side {
            ProposalSide::Borrow => &mut self.borrow_proposals,
            ProposalSide::Lend => &mut self.lend_proposals,
        }
    }
}

// ===========================================================================
// PRICE ORACLE
// ===========================================================================

/// Prices set by the admin or an approved publisher, WAD-scaled ETH per
/// whole token.
#[odra::module(events = [PriceUpdated, PublisherAdded])]
pub struct MockPriceOracle {
    prices: Mapping<Address, U256>,
    approved_publishers: Mapping<Address, bool>,
    admin: Var<Address>,
}

#[odra::module]
impl MockPriceOracle {
    pub fn init(&mut self) {
        self.admin.set(self.env().caller());
    }

    pub fn add_publisher(&mut self, publisher: Address) {
        let caller = self.env().caller();
        if self.admin() != caller {
            self.env().revert(LendingError::Unauthorized);
        }
        self.approved_publishers.set(&publisher, true);
        self.env().emit_event(PublisherAdded {
            publisher,
            added_by: caller,
        });
    }

    pub fn set_asset_price(&mut self, asset: Address, price: U256) {
        let caller = self.env().caller();
        if self.admin() != caller && !self.is_approved_publisher(caller) {
            self.env().revert(LendingError::Unauthorized);
        }
        self.prices.set(&asset, price);
        self.env().emit_event(PriceUpdated {
            asset,
            price,
            publisher: caller,
        });
    }

    pub fn get_asset_price(&self, asset: Address) -> U256 {
        self.prices
            .get(&asset)
            .unwrap_or_revert_with(&self.env(), LendingError::PriceUnavailable)
    }

    pub fn is_approved_publisher(&self, address: Address) -> bool {
        self.approved_publishers.get(&address).unwrap_or(false)
    }

    fn admin(&self) -> Address {
        self.admin.get_or_revert_with(LendingError::InvalidConfig)
    }
}

#[odra::event]
pub struct PriceUpdated {
    pub asset: Address,
    pub price: U256,
    pub publisher: Address,
}

#[odra::event]
pub struct PublisherAdded {
    pub publisher: Address,
    pub added_by: Address,
}

// ===========================================================================
// FEE PROVIDER
// ===========================================================================

#[odra::module]
pub struct MockFeeProvider {
    origination_fee_rate: Var<U256>,
}

#[odra::module]
impl MockFeeProvider {
    /// `origination_fee_rate` is a WAD fraction of the borrowed amount.
    pub fn init(&mut self, origination_fee_rate: U256) {
        self.origination_fee_rate.set(origination_fee_rate);
    }

    /// Flat rate for every borrower.
    pub fn calculate_loan_origination_fee(&self, user: Address, amount: U256) -> U256 {
        let _ = user;
        let fee = amount
            .try_mul(self.origination_fee_rate.get_or_default())
            .and_then(|scaled| scaled.try_div(U256::from(WAD)));
        match fee {
            Ok(fee) => fee,
            Err(error) => self.env().revert(error),
        }
    }
}

#[cfg(test)]
mod test {
    use odra::host::{Deployer, HostEnv, NoArgs};

    use super::*;

    fn proposal(env: &HostEnv, side: ProposalSide, amount: u64) -> Proposal {
        Proposal {
            id: 99,
            side,
            borrower: Some(env.get_account(1)),
            lender: None,
            reserve_to_receive: env.get_account(5),
            amount: U256::from(amount),
            reserve_for_collateral: env.get_account(6),
            collateral_amount: U256::zero(),
            interest_rate: U256::zero(),
            due_date: 0,
            service_fee: U256::zero(),
            is_accepted: false,
            is_repayed: false,
        }
    }

    #[test]
    fn core_assigns_ids_per_side() {
        let env = odra_test::env();
        let mut core = MockLendingCore::deploy(&env, NoArgs);
        assert_eq!(core.submit_proposal(proposal(&env, ProposalSide::Borrow, 1)), 0);
        assert_eq!(core.submit_proposal(proposal(&env, ProposalSide::Lend, 2)), 0);
        assert_eq!(core.submit_proposal(proposal(&env, ProposalSide::Borrow, 3)), 1);
        assert_eq!(core.get_borrow_proposal_count(), 2);
        assert_eq!(core.get_lend_proposal_count(), 1);
        assert_eq!(
            core.get_proposal(1, ProposalSide::Borrow).amount,
            U256::from(3u64)
        );

        let mut accepted = core.get_proposal(0, ProposalSide::Lend);
        accepted.is_accepted = true;
        core.update_proposal(accepted);
        assert!(core.get_proposal(0, ProposalSide::Lend).is_accepted);
        assert_eq!(
            core.try_get_proposal(1, ProposalSide::Lend),
            Err(LendingError::UnknownProposal.into())
        );
    }

    #[test]
    fn core_rejects_unknown_reserve_and_bad_config() {
        let env = odra_test::env();
        let mut core = MockLendingCore::deploy(&env, NoArgs);
        let reserve = env.get_account(5);
        assert_eq!(
            core.try_get_reserve_configuration(reserve),
            Err(LendingError::UnknownReserve.into())
        );
        let bad = ReserveConfig {
            decimals: 18,
            base_ltv: 90,
            liquidation_threshold: 80,
            usage_as_collateral_enabled: true,
        };
        assert_eq!(
            core.try_set_reserve_configuration(reserve, bad),
            Err(LendingError::InvalidConfig.into())
        );

        let good = ReserveConfig { base_ltv: 70, ..bad };
        core.set_reserve_configuration(reserve, good);
        core.set_reserve_configuration(reserve, good);
        assert_eq!(core.get_reserves(), vec![reserve]);
        assert!(core
            .get_user_reserve_position(reserve, env.get_account(1))
            .is_empty());
    }

    #[test]
    fn oracle_publishers() {
        let env = odra_test::env();
        let mut oracle = MockPriceOracle::deploy(&env, NoArgs);
        let asset = env.get_account(5);
        let publisher = env.get_account(2);
        assert_eq!(
            oracle.try_get_asset_price(asset),
            Err(LendingError::PriceUnavailable.into())
        );

        env.set_caller(publisher);
        assert_eq!(
            oracle.try_set_asset_price(asset, U256::from(WAD)),
            Err(LendingError::Unauthorized.into())
        );
        env.set_caller(env.get_account(0));
        oracle.add_publisher(publisher);
        env.set_caller(publisher);
        oracle.set_asset_price(asset, U256::from(WAD));
        assert_eq!(oracle.get_asset_price(asset), U256::from(WAD));
    }

    #[test]
    fn fee_is_share_of_amount() {
        let env = odra_test::env();
        let fees = MockFeeProvider::deploy(
            &env,
            MockFeeProviderInitArgs {
                origination_fee_rate: U256::from(WAD / 100),
            },
        );
        assert_eq!(
            fees.calculate_loan_origination_fee(env.get_account(1), U256::from(250u64)),
            U256::from(2u64)
        );
    }
}
