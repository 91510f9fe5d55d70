use crate::entities::{Pool, PoolSide, SwapEvent, Token};
use crate::error::SwapError;
use crate::value_objects::{Amount, Ratio};
use primitive_types::U256;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which asset entered the pool and which one left it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwapDirection {
    /// Asset A paid in, asset B received.
    AToB,
    /// Asset B paid in, asset A received.
    BToA,
}

impl SwapDirection {
    pub fn input_side(&self) -> PoolSide {
        match self {
            Self::AToB => PoolSide::A,
            Self::BToA => PoolSide::B,
        }
    }

    pub fn output_side(&self) -> PoolSide {
        match self {
            Self::AToB => PoolSide::B,
            Self::BToA => PoolSide::A,
        }
    }

    /// The asset paid into the pool.
    pub fn input_token<'a>(&self, pool: &'a Pool) -> &'a Token {
        pool.token(self.input_side())
    }

    /// The asset received from the pool.
    pub fn output_token<'a>(&self, pool: &'a Pool) -> &'a Token {
        pool.token(self.output_side())
    }

    /// `"WETH->USDC"` style label.
    pub fn label(&self, pool: &Pool) -> String {
        format!(
            "{}->{}",
            self.input_token(pool).symbol,
            self.output_token(pool).symbol
        )
    }
}

/// Metrics derived from one swap event. Computed fresh per event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapMetrics {
    pub direction: SwapDirection,
    /// Net quantity of asset A that moved, decimal-scaled.
    pub net_a: Decimal,
    /// Net quantity of asset B that moved, decimal-scaled.
    pub net_b: Decimal,
    /// Units of A per unit of B.
    pub ratio_a_per_b: Ratio,
    /// Units of B per unit of A.
    pub ratio_b_per_a: Ratio,
}

/// Determines the trade direction.
///
/// A well-formed swap has exactly one non-zero "in" amount and exactly one non-zero
/// "out" amount, on different assets. Every other combination is rejected rather than
/// guessed from magnitudes.
pub fn classify_direction(event: &SwapEvent) -> Result<SwapDirection, SwapError> {
    let flags = (
        !event.amount_a_in.is_zero(),
        !event.amount_b_in.is_zero(),
        !event.amount_a_out.is_zero(),
        !event.amount_b_out.is_zero(),
    );

    match flags {
        (false, true, true, false) => Ok(SwapDirection::BToA),
        (true, false, false, true) => Ok(SwapDirection::AToB),
        _ => Err(SwapError::Malformed {
            amount_a_in: event.amount_a_in,
            amount_b_in: event.amount_b_in,
            amount_a_out: event.amount_a_out,
            amount_b_out: event.amount_b_out,
        }),
    }
}

/// Classifies a swap and derives its net amounts and price ratios.
pub fn classify(event: &SwapEvent, pool: &Pool) -> Result<SwapMetrics, SwapError> {
    let direction = classify_direction(event)?;

    let raw_a = abs_diff(event.amount_a_in, event.amount_a_out);
    let raw_b = abs_diff(event.amount_b_in, event.amount_b_out);

    let net_a = Amount::new(raw_a, pool.token_a.decimals).to_decimal()?;
    let net_b = Amount::new(raw_b, pool.token_b.decimals).to_decimal()?;

    Ok(SwapMetrics {
        direction,
        net_a,
        net_b,
        ratio_a_per_b: Ratio::between(net_a, net_b),
        ratio_b_per_a: Ratio::between(net_b, net_a),
    })
}

fn abs_diff(x: U256, y: U256) -> U256 {
    if x >= y { x - y } else { y - x }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Token;
    use rust_decimal_macros::dec;

    fn weth_usdc() -> Pool {
        Pool::new(
            "0xpool",
            "Uniswap V2",
            Token::new("0xa", "WETH", 18, "Wrapped Ether"),
            Token::new("0xb", "USDC", 6, "USD Coin"),
        )
    }

    fn plain_pool() -> Pool {
        Pool::new(
            "0xpool",
            "Pair",
            Token::new("0xa", "AAA", 0, "A"),
            Token::new("0xb", "BBB", 0, "B"),
        )
    }

    #[test]
    fn test_usdc_for_weth_scenario() {
        let event = SwapEvent::new(
            0u64,
            3_000_000_000u64,
            1_000_000_000_000_000_000u128,
            0u64,
        );

        let metrics = classify(&event, &weth_usdc()).unwrap();

        assert_eq!(metrics.direction, SwapDirection::BToA);
        assert_eq!(metrics.direction.label(&weth_usdc()), "USDC->WETH");
        assert_eq!(metrics.net_a, dec!(1.0));
        assert_eq!(metrics.net_b, dec!(3000.0));
        assert_eq!(metrics.ratio_b_per_a, Ratio::Defined(dec!(3000)));
    }

    #[test]
    fn test_a_to_b_direction() {
        let event = SwapEvent::new(100u64, 0u64, 0u64, 5u64);
        let metrics = classify(&event, &plain_pool()).unwrap();

        assert_eq!(metrics.direction, SwapDirection::AToB);
        assert_eq!(metrics.direction.input_side(), PoolSide::A);
        assert_eq!(metrics.direction.output_side(), PoolSide::B);
        assert_eq!(metrics.net_a, dec!(100));
        assert_eq!(metrics.net_b, dec!(5));
        assert_eq!(metrics.ratio_a_per_b, Ratio::Defined(dec!(20)));
    }

    #[test]
    fn test_valid_flows_never_unknown_and_non_negative() {
        let pool = plain_pool();
        let cases = [
            (1u64, 0u64, 0u64, 1u64),
            (0, 7, 13, 0),
            (u64::MAX, 0, 0, 1),
            (0, 1, u64::MAX, 0),
        ];

        for (a_in, b_in, a_out, b_out) in cases {
            let event = SwapEvent::new(a_in, b_in, a_out, b_out);
            let metrics = classify(&event, &pool).unwrap();
            let expected = if a_in > 0 {
                SwapDirection::AToB
            } else {
                SwapDirection::BToA
            };
            assert_eq!(metrics.direction, expected);
            assert!(metrics.net_a >= Decimal::ZERO);
            assert!(metrics.net_b >= Decimal::ZERO);
        }
    }

    #[test]
    fn test_ratio_reciprocity() {
        let event = SwapEvent::new(0u64, 1_234_567_891u64, 987_654_321_000_000_000u128, 0u64);
        let metrics = classify(&event, &weth_usdc()).unwrap();

        let ab = metrics.ratio_a_per_b.value().unwrap();
        let ba = metrics.ratio_b_per_a.value().unwrap();
        let product = ab * ba;
        assert!((product - Decimal::ONE).abs() < dec!(0.000000000001));
    }

    #[test]
    fn test_all_zero_is_malformed() {
        let event = SwapEvent::new(0u64, 0u64, 0u64, 0u64);
        assert!(matches!(
            classify(&event, &plain_pool()),
            Err(SwapError::Malformed { .. })
        ));
    }

    #[test]
    fn test_both_inputs_is_malformed() {
        let event = SwapEvent::new(10u64, 10u64, 0u64, 5u64);
        assert!(matches!(
            classify_direction(&event),
            Err(SwapError::Malformed { .. })
        ));
    }

    #[test]
    fn test_same_asset_in_and_out_is_malformed() {
        let event = SwapEvent::new(10u64, 0u64, 4u64, 0u64);
        assert!(classify_direction(&event).is_err());

        let event = SwapEvent::new(10u64, 3u64, 4u64, 2u64);
        assert!(classify_direction(&event).is_err());
    }
}
