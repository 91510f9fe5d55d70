use crate::entities::Pool;
use crate::error::DomainError;
use crate::math::constant_product;
use crate::value_objects::{Amount, Percentage, Ratio};
use primitive_types::U256;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Liquidity token supply and reserves read once at startup.
///
/// Not kept in sync with live trading; see `ReserveTracker` for the running estimate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquiditySnapshot {
    pub total_supply: U256,
    pub burned: U256,
    pub reserve_a: U256,
    pub reserve_b: U256,
    pub block_timestamp_last: u32,
}

/// Human-scaled reserves, spot prices and value locked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolValuation {
    pub reserve_a: Decimal,
    pub reserve_b: Decimal,
    /// Units of B one unit of A is worth.
    pub price_a_in_b: Ratio,
    /// Units of A one unit of B is worth.
    pub price_b_in_a: Ratio,
    pub value_locked_in_a: Ratio,
    pub value_locked_in_b: Ratio,
}

impl LiquiditySnapshot {
    pub fn new(
        total_supply: U256,
        burned: U256,
        reserve_a: U256,
        reserve_b: U256,
        block_timestamp_last: u32,
    ) -> Result<Self, DomainError> {
        if burned > total_supply {
            return Err(DomainError::BurnedExceedsSupply {
                burned,
                total_supply,
            });
        }
        Ok(Self {
            total_supply,
            burned,
            reserve_a,
            reserve_b,
            block_timestamp_last,
        })
    }

    /// Liquidity tokens not held by a burn address.
    pub fn circulating(&self) -> U256 {
        self.total_supply.saturating_sub(self.burned)
    }

    /// `burned * 10000 / total_supply`, in integer arithmetic.
    pub fn burned_bps(&self) -> Result<u32, DomainError> {
        if self.total_supply.is_zero() {
            return Err(DomainError::ZeroSupply);
        }
        if self.burned > self.total_supply {
            return Err(DomainError::BurnedExceedsSupply {
                burned: self.burned,
                total_supply: self.total_supply,
            });
        }

        let scaled = self
            .burned
            .checked_mul(U256::from(10_000u32))
            .ok_or(DomainError::Overflow("burned percentage"))?;
        // bounded by 10000 because burned <= total_supply
        Ok((scaled / self.total_supply).low_u32())
    }

    pub fn burned_percentage(&self) -> Result<Percentage, DomainError> {
        self.burned_bps().map(Percentage::from_bps)
    }

    pub fn reserve_amounts(&self, pool: &Pool) -> (Amount, Amount) {
        (
            Amount::new(self.reserve_a, pool.token_a.decimals),
            Amount::new(self.reserve_b, pool.token_b.decimals),
        )
    }

    /// `reserve_a * reserve_b` in raw units.
    pub fn constant_product(&self) -> Result<U256, DomainError> {
        constant_product::calculate_k(self.reserve_a, self.reserve_b)
    }

    pub fn valuation(&self, pool: &Pool) -> Result<PoolValuation, DomainError> {
        let (amount_a, amount_b) = self.reserve_amounts(pool);
        let reserve_a = amount_a.to_decimal()?;
        let reserve_b = amount_b.to_decimal()?;

        let price_a_in_b = constant_product::spot_price(amount_a, amount_b)?;
        let price_b_in_a = constant_product::spot_price(amount_b, amount_a)?;

        Ok(PoolValuation {
            reserve_a,
            reserve_b,
            price_a_in_b,
            price_b_in_a,
            value_locked_in_a: constant_product::value_locked(reserve_b, reserve_a, price_b_in_a)?,
            value_locked_in_b: constant_product::value_locked(reserve_a, reserve_b, price_a_in_b)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Token;
    use rust_decimal_macros::dec;

    fn snapshot(total: u64, burned: u64) -> LiquiditySnapshot {
        LiquiditySnapshot::new(
            U256::from(total),
            U256::from(burned),
            U256::zero(),
            U256::zero(),
            0,
        )
        .unwrap()
    }

    #[test]
    fn test_burned_percentage_is_exact() {
        let snap = snapshot(1_000_000, 250_000);
        let pct = snap.burned_percentage().unwrap();

        assert_eq!(pct.as_percent(), dec!(25.00));
        assert_eq!(pct.as_percent().to_string(), "25.00");
        assert_eq!(snap.circulating(), U256::from(750_000u64));
    }

    #[test]
    fn test_burned_percentage_truncates_to_bps() {
        // 1/3 burned -> 3333 bps
        let snap = snapshot(3, 1);
        assert_eq!(snap.burned_bps().unwrap(), 3333);
        assert_eq!(snap.burned_percentage().unwrap().as_percent().to_string(), "33.33");
    }

    #[test]
    fn test_zero_supply_is_error() {
        let snap = snapshot(0, 0);
        assert_eq!(snap.burned_percentage(), Err(DomainError::ZeroSupply));
    }

    #[test]
    fn test_burned_above_supply_rejected() {
        let result =
            LiquiditySnapshot::new(U256::from(10u64), U256::from(11u64), U256::zero(), U256::zero(), 0);
        assert!(matches!(
            result,
            Err(DomainError::BurnedExceedsSupply { .. })
        ));
    }

    #[test]
    fn test_valuation() {
        let pool = Pool::new(
            "0xpool",
            "Uniswap V2",
            Token::new("0xa", "WETH", 18, "Wrapped Ether"),
            Token::new("0xb", "USDC", 6, "USD Coin"),
        );
        let snap = LiquiditySnapshot::new(
            U256::from(1_000u64),
            U256::from(1u64),
            U256::from(10_000_000_000_000_000_000u128),
            U256::from(30_000_000_000u64),
            1_700_000_000,
        )
        .unwrap();

        let valuation = snap.valuation(&pool).unwrap();
        assert_eq!(valuation.reserve_a, dec!(10));
        assert_eq!(valuation.reserve_b, dec!(30000));
        assert_eq!(valuation.price_a_in_b, Ratio::Defined(dec!(3000)));
        assert_eq!(valuation.value_locked_in_b, Ratio::Defined(dec!(60000)));
        assert_eq!(
            valuation.value_locked_in_a.value().unwrap().round_dp(10),
            dec!(20)
        );
    }
}
