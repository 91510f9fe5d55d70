use crate::classifier::SwapMetrics;
use crate::entities::Pool;
use crate::value_objects::Ratio;
use rust_decimal::{Decimal, RoundingStrategy};
use thousands::Separable;

/// Places used for ratios of at least one.
const RATIO_PLACES: u32 = 2;
/// Places used for ratios below one.
const SMALL_RATIO_PLACES: u32 = 7;

/// Formats with a fixed number of decimal places and `,` thousands separators.
pub fn format_amount(value: Decimal, places: u32) -> String {
    let rounded = value.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}", places as usize, rounded).separate_with_commas()
}

pub fn format_ratio(ratio: Ratio) -> String {
    match ratio {
        Ratio::Defined(value) if value.abs() >= Decimal::ONE => format_amount(value, RATIO_PLACES),
        Ratio::Defined(value) => format_amount(value, SMALL_RATIO_PLACES),
        Ratio::Undefined => "undefined".to_string(),
    }
}

/// `1 WETH ≈ 3,000.00 USDC, 1 USDC ≈ 0.0003333 WETH`
pub fn ratio_line(pool: &Pool, metrics: &SwapMetrics) -> String {
    let a = &pool.token_a.symbol;
    let b = &pool.token_b.symbol;
    format!(
        "1 {a} ≈ {} {b}, 1 {b} ≈ {} {a}",
        format_ratio(metrics.ratio_b_per_a),
        format_ratio(metrics.ratio_a_per_b),
    )
}

/// `0x1234...abcd`
pub fn short_address(address: &str) -> String {
    if address.len() <= 10 || !address.is_ascii() {
        return address.to_string();
    }
    format!("{}...{}", &address[..6], &address[address.len() - 4..])
}
