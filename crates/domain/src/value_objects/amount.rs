use crate::error::DomainError;
use primitive_types::U256;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Largest scale a `Decimal` can carry.
const MAX_SCALE: u8 = 28;

/// Bits available in a `Decimal` mantissa.
const MANTISSA_BITS: usize = 96;

/// A raw on-chain quantity together with its token's decimal precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Amount {
    pub raw: U256,
    pub decimals: u8,
}

impl Amount {
    pub fn new(raw: U256, decimals: u8) -> Self {
        Self { raw, decimals }
    }

    pub fn is_zero(&self) -> bool {
        self.raw.is_zero()
    }

    /// Scales the raw value by `10^-decimals`.
    ///
    /// The integer and fractional parts are split with exact `U256` division first, so
    /// no precision is lost on large raw values. Fractional digits beyond 28 places are
    /// truncated; an integer part wider than a `Decimal` mantissa is an error.
    pub fn to_decimal(&self) -> Result<Decimal, DomainError> {
        let overflow = || DomainError::AmountOverflow {
            raw: self.raw,
            decimals: self.decimals,
        };

        let divisor = pow10(self.decimals).ok_or_else(overflow)?;
        let whole = self.raw / divisor;
        let mut frac = self.raw % divisor;

        if whole.bits() > MANTISSA_BITS {
            return Err(overflow());
        }

        let mut scale = self.decimals;
        if scale > MAX_SCALE {
            let cut = pow10(scale - MAX_SCALE).ok_or_else(overflow)?;
            frac /= cut;
            scale = MAX_SCALE;
        }

        let whole = Decimal::from_i128_with_scale(whole.as_u128() as i128, 0);
        let frac = Decimal::from_i128_with_scale(frac.as_u128() as i128, u32::from(scale));
        whole.checked_add(frac).ok_or_else(overflow)
    }
}

/// `10^exp` in 256 bits, `None` on overflow.
pub(crate) fn pow10(exp: u8) -> Option<U256> {
    U256::from(10u8).checked_pow(U256::from(exp))
}
