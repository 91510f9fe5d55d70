use primitive_types::U256;
use thiserror::Error;

/// Errors raised by the domain maths.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("amount {raw} with {decimals} decimals does not fit a decimal")]
    AmountOverflow { raw: U256, decimals: u8 },

    #[error("liquidity token total supply is zero")]
    ZeroSupply,

    #[error("burned balance {burned} exceeds total supply {total_supply}")]
    BurnedExceedsSupply { burned: U256, total_supply: U256 },

    #[error("running reserve for {symbol} would drop below zero (reserve {reserve}, outflow {outflow})")]
    ReserveDrift {
        symbol: String,
        reserve: U256,
        outflow: U256,
    },

    #[error("arithmetic overflow in {0}")]
    Overflow(&'static str),
}

/// Reasons a single swap event cannot be turned into metrics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SwapError {
    #[error(
        "malformed swap: amount_a_in={amount_a_in} amount_b_in={amount_b_in} \
         amount_a_out={amount_a_out} amount_b_out={amount_b_out}"
    )]
    Malformed {
        amount_a_in: U256,
        amount_b_in: U256,
        amount_a_out: U256,
        amount_b_out: U256,
    },

    #[error(transparent)]
    Domain(#[from] DomainError),
}
