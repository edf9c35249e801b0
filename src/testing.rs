//! In-memory collaborators for unit tests.

use std::cell::RefCell;
use std::collections::BTreeMap;

use odra::casper_types::account::AccountHash;
use odra::casper_types::U256;
use odra::prelude::*;

use crate::error::LendingError;
use crate::math::WAD;
use crate::provider::{FeeProvider, PriceOracle, ReserveRegistry};
use crate::state::{Proposal, ProposalSide, ReserveConfig, UserReservePosition};

pub fn address(seed: u8) -> Address {
    Address::Account(AccountHash::new([seed; 32]))
}

pub fn alice() -> Address {
    address(1)
}

pub fn bob() -> Address {
    address(2)
}

pub fn reserve_a() -> Address {
    address(10)
}

pub fn reserve_b() -> Address {
    address(11)
}

pub fn reserve_c() -> Address {
    address(12)
}

/// `whole` units of an 18-decimal amount.
pub fn eth(whole: u64) -> U256 {
    U256::from(whole) * U256::from(WAD)
}

pub fn config(
    decimals: u8,
    base_ltv: u8,
    liquidation_threshold: u8,
    collateral: bool,
) -> ReserveConfig {
    ReserveConfig {
        decimals,
        base_ltv,
        liquidation_threshold,
        usage_as_collateral_enabled: collateral,
    }
}

pub fn supplied(amount: U256, use_as_collateral: bool) -> UserReservePosition {
    UserReservePosition {
        compounded_liquidity_balance: amount,
        use_as_collateral,
        ..Default::default()
    }
}

pub fn borrowed(amount: U256, origination_fee: U256) -> UserReservePosition {
    UserReservePosition {
        compounded_borrow_balance: amount,
        origination_fee,
        ..Default::default()
    }
}

#[derive(Default)]
pub struct MemoryLedger {
    reserves: Vec<Address>,
    configs: BTreeMap<Address, ReserveConfig>,
    positions: BTreeMap<(Address, Address), UserReservePosition>,
    borrow_proposals: Vec<Proposal>,
    lend_proposals: Vec<Proposal>,
}

impl MemoryLedger {
    pub fn add_reserve(&mut self, reserve: Address, config: ReserveConfig) {
        if !self.reserves.contains(&reserve) {
            self.reserves.push(reserve);
        }
        self.configs.insert(reserve, config);
    }

    pub fn set_position(&mut self, reserve: Address, user: Address, position: UserReservePosition) {
        self.positions.insert((reserve, user), position);
    }

    /// Stores `proposal` at the end of its side's listing and returns its id.
    pub fn submit(&mut self, mut proposal: Proposal) -> u64 {
        let listing = match proposal.side {
            ProposalSide::Borrow => &mut self.borrow_proposals,
            ProposalSide::Lend => &mut self.lend_proposals,
        };
        proposal.id = listing.len() as u64;
        let id = proposal.id;
        listing.push(proposal);
        id
    }

    fn listing(&self, side: ProposalSide) -> &Vec<Proposal> {
        match side {
            ProposalSide::Borrow => &self.borrow_proposals,
            ProposalSide::Lend => &self.lend_proposals,
        }
    }
}

impl ReserveRegistry for MemoryLedger {
    fn reserves(&self) -> Result<Vec<Address>, LendingError> {
        Ok(self.reserves.clone())
    }

    fn reserve_configuration(&self, reserve: Address) -> Result<ReserveConfig, LendingError> {
        self.configs
            .get(&reserve)
            .copied()
            .ok_or(LendingError::UnknownReserve)
    }

    fn user_reserve_position(
        &self,
        reserve: Address,
        user: Address,
    ) -> Result<UserReservePosition, LendingError> {
        if !self.configs.contains_key(&reserve) {
            return Err(LendingError::UnknownReserve);
        }
        Ok(self
            .positions
            .get(&(reserve, user))
            .cloned()
            .unwrap_or_default())
    }

    fn borrow_proposal_count(&self) -> Result<u64, LendingError> {
        Ok(self.borrow_proposals.len() as u64)
    }

    fn lend_proposal_count(&self) -> Result<u64, LendingError> {
        Ok(self.lend_proposals.len() as u64)
    }

    fn proposal(&self, proposal_id: u64, side: ProposalSide) -> Result<Proposal, LendingError> {
        self.listing(side)
            .get(proposal_id as usize)
            .cloned()
            .ok_or(LendingError::UnknownProposal)
    }
}

/// Prices set by hand; counts lookups per asset.
#[derive(Default)]
pub struct FixedOracle {
    prices: RefCell<BTreeMap<Address, U256>>,
    lookups: RefCell<BTreeMap<Address, u32>>,
}

impl FixedOracle {
    pub fn set(&self, asset: Address, price: U256) {
        self.prices.borrow_mut().insert(asset, price);
    }

    pub fn lookups(&self, asset: Address) -> u32 {
        self.lookups.borrow().get(&asset).copied().unwrap_or(0)
    }
}

impl PriceOracle for FixedOracle {
    fn asset_price(&self, asset: Address) -> Result<U256, LendingError> {
        *self.lookups.borrow_mut().entry(asset).or_insert(0) += 1;
        self.prices
            .borrow()
            .get(&asset)
            .copied()
            .ok_or(LendingError::PriceUnavailable)
    }
}

/// Origination fee as a fixed share of the amount, in basis points.
pub struct FlatFee(u64);

impl FlatFee {
    pub fn zero() -> Self {
        Self(0)
    }

    pub fn bps(bps: u64) -> Self {
        Self(bps)
    }
}

impl FeeProvider for FlatFee {
    fn loan_origination_fee(&self, _user: Address, amount: U256) -> Result<U256, LendingError> {
        Ok(amount * U256::from(self.0) / U256::from(10_000u64))
    }
}

/// An accepted borrow-side proposal of `amount` B against collateral in A.
pub fn accepted_proposal(borrower: Address, amount: U256, due_date: u64) -> Proposal {
    Proposal {
        id: 0,
        side: ProposalSide::Borrow,
        borrower: Some(borrower),
        lender: Some(bob()),
        reserve_to_receive: reserve_b(),
        amount,
        reserve_for_collateral: reserve_a(),
        collateral_amount: U256::zero(),
        interest_rate: U256::from(5u64),
        due_date,
        service_fee: U256::zero(),
        is_accepted: true,
        is_repayed: false,
    }
}
