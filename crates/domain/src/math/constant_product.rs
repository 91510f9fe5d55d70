use crate::error::DomainError;
use crate::value_objects::{Amount, Ratio};
use primitive_types::U256;
use rust_decimal::Decimal;

/// Calculates the spot price of the input asset in terms of the output asset.
/// Price = reserve_out / reserve_in, both scaled by their own decimals first.
pub fn spot_price(reserve_in: Amount, reserve_out: Amount) -> Result<Ratio, DomainError> {
    let r_in = reserve_in.to_decimal()?;
    let r_out = reserve_out.to_decimal()?;

    Ok(Ratio::between(r_out, r_in))
}

/// Calculates the constant product K over raw reserves.
pub fn calculate_k(reserve_a: U256, reserve_b: U256) -> Result<U256, DomainError> {
    reserve_a
        .checked_mul(reserve_b)
        .ok_or(DomainError::Overflow("constant product"))
}

/// Total value of both reserves denominated in the `quote` asset.
///
/// `price_of_base` is the number of quote units one base unit is worth.
pub fn value_locked(
    base_reserve: Decimal,
    quote_reserve: Decimal,
    price_of_base: Ratio,
) -> Result<Ratio, DomainError> {
    let Some(price) = price_of_base.value() else {
        return Ok(Ratio::Undefined);
    };

    let base_value = base_reserve
        .checked_mul(price)
        .ok_or(DomainError::Overflow("value locked"))?;
    let total = base_value
        .checked_add(quote_reserve)
        .ok_or(DomainError::Overflow("value locked"))?;

    Ok(Ratio::Defined(total))
}
