//! WAD-scaled decimal used for health factors and ratios.

use {
    crate::{error::LendingError, math::common::*},
    alloc::{string::ToString, vec},
    core::fmt,
    odra::casper_types::U256,
};

/// Large decimal values, precise to 18 digits
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Eq, Ord)]
pub struct Decimal(pub U256);

impl Decimal {
    /// One
    pub fn one() -> Self {
        Self(Self::wad())
    }

    /// Largest representable value; stands in for an unbounded ratio.
    pub fn max_value() -> Self {
        Self(U256::max_value())
    }

    fn wad() -> U256 {
        U256::from(WAD)
    }

    /// Return raw scaled value
    #[allow(clippy::wrong_self_convention)]
    pub fn to_scaled_val(&self) -> U256 {
        self.0
    }

    /// Create decimal from scaled value
    pub fn from_scaled_val(scaled_val: U256) -> Self {
        Self(scaled_val)
    }

    /// `numerator / denominator` as a WAD, rounding half up.
    ///
    /// This is the WAD division of the pooled lending math:
    /// `(numerator * WAD + denominator / 2) / denominator`.
    pub fn try_from_ratio(numerator: U256, denominator: U256) -> Result<Self, LendingError> {
        if denominator.is_zero() {
            return Err(LendingError::DivisionByZero);
        }
        let half = denominator / 2;
        Ok(Self(
            numerator
                .try_mul(Self::wad())?
                .try_add(half)?
                .try_div(denominator)?,
        ))
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut scaled_val = self.0.to_string();
        if scaled_val.len() <= SCALE {
            scaled_val.insert_str(0, &vec!["0"; SCALE - scaled_val.len()].join(""));
            scaled_val.insert_str(0, "0.");
        } else {
            scaled_val.insert(scaled_val.len() - SCALE, '.');
        }
        f.write_str(&scaled_val)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_scaler() {
        assert_eq!(U256::from(WAD), Decimal::wad());
    }

    #[test]
    fn ratio_rounds_half_up() {
        // 2/3 = 0.666..67
        let ratio = Decimal::try_from_ratio(U256::from(2u64), U256::from(3u64)).unwrap();
        assert_eq!(ratio.0, U256::from(666_666_666_666_666_667u64));
        // 1/3 = 0.333..33
        let ratio = Decimal::try_from_ratio(U256::one(), U256::from(3u64)).unwrap();
        assert_eq!(ratio.0, U256::from(333_333_333_333_333_333u64));
    }

    #[test]
    fn ratio_by_zero() {
        assert_eq!(
            Decimal::try_from_ratio(U256::one(), U256::zero()),
            Err(LendingError::DivisionByZero)
        );
    }

    #[test]
    fn display() {
        assert_eq!(Decimal::one().to_string(), "1.000000000000000000");
        assert_eq!(
            Decimal::from_scaled_val(U256::from(WAD / 2)).to_string(),
            "0.500000000000000000"
        );
    }

    #[test]
    fn max_value_orders_above_any_ratio() {
        let ratio = Decimal::try_from_ratio(U256::max_value() / U256::from(WAD), U256::one())
            .unwrap();
        assert!(ratio < Decimal::max_value());
        assert!(Decimal::from_scaled_val(U256::zero()) < Decimal::one());
    }
}
