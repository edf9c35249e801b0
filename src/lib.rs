#![cfg_attr(not(test), no_std)]
#![cfg_attr(not(test), no_main)]

//! Risk accounting for a Casper lending market: position valuation, health
//! factors, withdrawal and borrow limits, and peer-to-peer proposal queries.

extern crate alloc;

pub mod data_provider;
pub mod engine;
pub mod error;
pub mod math;
pub mod mocks;
pub mod proposals;
pub mod provider;
pub mod state;

#[cfg(test)]
mod testing;

pub use data_provider::LendingDataProvider;
pub use engine::{calculate_health_factor_from_balances, ValuationEngine};
pub use error::{ErrorKind, LendingError};
