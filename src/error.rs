//! Error types

use core::fmt;
use odra::prelude::*;

/// Errors that may be returned by the lending data provider.
///
/// Discriminants are stable: they are the user error codes a reverted
/// contract call reports.
#[odra::odra_error]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LendingError {
    // 1
    InvalidAmount = 1,
    InvalidProposalRange = 2,
    ProposalPageTooLarge = 3,

    // 10
    DivisionByZero = 10,
    MathOverflow = 11,

    // 20
    UnknownReserve = 20,
    PriceUnavailable = 21,
    UnknownProposal = 22,
    ProposalNotAccepted = 23,

    // 30
    InvalidConfig = 30,
    Unauthorized = 31,
}

/// Coarse classification of a [`LendingError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected input, nothing was read.
    Input,
    /// A zero divisor where the quotient would hide an unsafe request.
    DivisionByZero,
    /// Checked arithmetic overflowed.
    Arithmetic,
    /// A collaborator (registry, oracle, fee provider) failed or is misconfigured.
    Upstream,
}

impl LendingError {
    pub fn message(&self) -> &str {
        match self {
            LendingError::InvalidAmount => "Input amount is invalid",
            LendingError::InvalidProposalRange => "Proposal index range is out of bounds",
            LendingError::ProposalPageTooLarge => "Too many proposals requested at once",
            LendingError::DivisionByZero => "Division by zero",
            LendingError::MathOverflow => "Math operation overflow",
            LendingError::UnknownReserve => "Reserve is not registered",
            LendingError::PriceUnavailable => "Oracle has no price for the asset",
            LendingError::UnknownProposal => "Proposal does not exist",
            LendingError::ProposalNotAccepted => "Proposal has no borrower yet",
            LendingError::InvalidConfig => "Input config value is invalid",
            LendingError::Unauthorized => "Caller is not allowed to perform this action",
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            LendingError::InvalidAmount
            | LendingError::InvalidProposalRange
            | LendingError::ProposalPageTooLarge => ErrorKind::Input,
            LendingError::DivisionByZero => ErrorKind::DivisionByZero,
            LendingError::MathOverflow => ErrorKind::Arithmetic,
            LendingError::UnknownReserve
            | LendingError::PriceUnavailable
            | LendingError::UnknownProposal
            | LendingError::ProposalNotAccepted
            | LendingError::InvalidConfig
            | LendingError::Unauthorized => ErrorKind::Upstream,
        }
    }
}

impl fmt::Display for LendingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
