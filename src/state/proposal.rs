use odra::casper_types::U256;
use odra::prelude::*;

/// Which listing a proposal belongs to.
#[odra::odra_type]
#[derive(Copy)]
pub enum ProposalSide {
    /// Posted by a borrower looking for a lender
    Borrow,
    /// Posted by a lender looking for a borrower
    Lend,
}

/// A time-boxed peer-to-peer credit proposal.
///
/// `id` is the index within its side's listing, assigned in creation order.
#[odra::odra_type]
pub struct Proposal {
    pub id: u64,
    pub side: ProposalSide,
    /// Unset on a lend-side listing until someone accepts it
    pub borrower: Option<Address>,
    /// Unset on a borrow-side listing until someone accepts it
    pub lender: Option<Address>,
    pub reserve_to_receive: Address,
    pub amount: U256,
    pub reserve_for_collateral: Address,
    pub collateral_amount: U256,
    pub interest_rate: U256,
    /// Block time, in milliseconds
    pub due_date: u64,
    pub service_fee: U256,
    pub is_accepted: bool,
    pub is_repayed: bool,
}

impl Proposal {
    /// The due date has strictly passed.
    pub fn is_overdue(&self, now: u64) -> bool {
        self.due_date < now
    }

    /// Accepted and `user` is the borrower. The repaid flag is not consulted.
    pub fn is_repayable_by(&self, user: &Address) -> bool {
        self.is_accepted && self.borrower.as_ref() == Some(user)
    }
}
