//! Data model shared by the valuation engine and the contract surface

pub mod position;
pub mod proposal;
pub mod reserve;

pub use position::*;
pub use proposal::*;
pub use reserve::*;

use crate::math::Decimal;

/// Percentages in reserve configuration are integers over this base.
pub const PERCENTAGE_BASE: u64 = 100;

/// Most proposals a single page request may return.
pub const MAX_PROPOSAL_PAGE_SIZE: u64 = 2000;

/// A health factor strictly below this (1.0 as a WAD) is liquidatable.
pub fn health_factor_liquidation_threshold() -> Decimal {
    Decimal::one()
}
