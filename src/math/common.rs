//! Common module for Decimal and raw U256 arithmetic
//!
//! Contains shared scalers and the checked arithmetic traits. Every trait
//! returns `LendingError` so math failures surface through the same error
//! type as collaborator failures.

use {crate::error::LendingError, odra::casper_types::U256};

/// Scale of precision
pub const SCALE: usize = 18;
/// Identity
pub const WAD: u64 = 1_000_000_000_000_000_000;

/// Try to subtract, return an error on underflow
pub trait TrySub: Sized {
    /// Subtract
    fn try_sub(self, rhs: Self) -> Result<Self, LendingError>;
}

/// Try to add, return an error on overflow
pub trait TryAdd: Sized {
    /// Add
    fn try_add(self, rhs: Self) -> Result<Self, LendingError>;
}

/// Try to divide, return an error on overflow or divide by zero
pub trait TryDiv<RHS>: Sized {
    /// Divide
    fn try_div(self, rhs: RHS) -> Result<Self, LendingError>;
}

/// Try to multiply, return an error on overflow
pub trait TryMul<RHS>: Sized {
    /// Multiply
    fn try_mul(self, rhs: RHS) -> Result<Self, LendingError>;
}

impl TryAdd for U256 {
    fn try_add(self, rhs: Self) -> Result<Self, LendingError> {
        self.checked_add(rhs).ok_or(LendingError::MathOverflow)
    }
}

impl TrySub for U256 {
    fn try_sub(self, rhs: Self) -> Result<Self, LendingError> {
        self.checked_sub(rhs).ok_or(LendingError::MathOverflow)
    }
}

impl TryMul<U256> for U256 {
    fn try_mul(self, rhs: U256) -> Result<Self, LendingError> {
        self.checked_mul(rhs).ok_or(LendingError::MathOverflow)
    }
}

impl TryDiv<U256> for U256 {
    fn try_div(self, rhs: U256) -> Result<Self, LendingError> {
        self.checked_div(rhs).ok_or(LendingError::DivisionByZero)
    }
}

/// `10^decimals`, the number of native units in one whole token.
pub fn token_unit(decimals: u8) -> Result<U256, LendingError> {
    U256::from(10u64)
        .checked_pow(U256::from(decimals))
        .ok_or(LendingError::MathOverflow)
}

/// Value of `amount` native units at `price` per whole token.
///
/// Multiplies before dividing; the division truncates.
pub fn amount_to_value(price: U256, amount: U256, decimals: u8) -> Result<U256, LendingError> {
    price.try_mul(amount)?.try_div(token_unit(decimals)?)
}
