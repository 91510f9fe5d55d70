use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A quotient of two amounts. `Undefined` stands in for what floating point would
/// report as `Infinity` or `NaN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ratio {
    Defined(Decimal),
    Undefined,
}

impl Ratio {
    /// `numerator / denominator`. A non-zero quotient too small for 28 decimal places is
    /// `Undefined` rather than a misleading zero.
    pub fn between(numerator: Decimal, denominator: Decimal) -> Self {
        if denominator.is_zero() {
            return Self::Undefined;
        }
        match numerator.checked_div(denominator) {
            Some(quotient) if quotient.is_zero() && !numerator.is_zero() => Self::Undefined,
            Some(quotient) => Self::Defined(quotient),
            None => Self::Undefined,
        }
    }

    pub fn reciprocal(&self) -> Self {
        match self {
            Self::Defined(value) => Self::between(Decimal::ONE, *value),
            Self::Undefined => Self::Undefined,
        }
    }

    pub fn value(&self) -> Option<Decimal> {
        match self {
            Self::Defined(value) => Some(*value),
            Self::Undefined => None,
        }
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Defined(value) => write!(f, "{}", value.normalize()),
            Self::Undefined => f.write_str("undefined"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_between_zero_denominator_is_undefined() {
        assert_eq!(Ratio::between(dec!(5), Decimal::ZERO), Ratio::Undefined);
        assert_eq!(Ratio::between(Decimal::ZERO, Decimal::ZERO), Ratio::Undefined);
        assert_eq!(Ratio::Undefined.to_string(), "undefined");
    }

    #[test]
    fn test_reciprocal_of_zero_is_undefined() {
        let zero = Ratio::between(Decimal::ZERO, dec!(3));
        assert_eq!(zero, Ratio::Defined(Decimal::ZERO));
        assert_eq!(zero.reciprocal(), Ratio::Undefined);
    }

    #[test]
    fn test_underflowing_quotient_is_undefined() {
        let huge = Decimal::from_i128_with_scale(50_000_000_000_000_000_000_000_000_000, 0);

        assert_eq!(Ratio::between(Decimal::ONE, huge), Ratio::Undefined);
        assert_eq!(Ratio::between(huge, Decimal::ONE), Ratio::Defined(huge));
    }

    #[test]
    fn test_reciprocal_round_trip() {
        let ratio = Ratio::between(dec!(3000), dec!(1));
        assert_eq!(ratio.value(), Some(dec!(3000)));
        assert_eq!(ratio.reciprocal().reciprocal().value().unwrap().round_dp(10), dec!(3000));
    }
}
