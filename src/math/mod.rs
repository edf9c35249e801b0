//! Math for preserving precision of token amounts and ETH-denominated values

pub mod common;
pub mod decimal;

pub use common::*;
pub use decimal::Decimal;
