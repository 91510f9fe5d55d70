//! One-off pool summary for the `snapshot` command.

use chrono::DateTime;
use prettytable::{Table, format, row};
use swap_monitor_domain::DomainError;
use swap_monitor_domain::display::{format_amount, format_ratio};
use swap_monitor_domain::entities::Pool;
use swap_monitor_domain::metrics::LiquiditySnapshot;

/// Builds the metadata and liquidity table.
pub fn snapshot_table(pool: &Pool, snapshot: &LiquiditySnapshot) -> Result<Table, DomainError> {
    let valuation = snapshot.valuation(pool)?;
    let burned = snapshot.burned_percentage()?;
    let k = snapshot.constant_product()?;
    let a = &pool.token_a.symbol;
    let b = &pool.token_b.symbol;

    let last_update = DateTime::from_timestamp(i64::from(snapshot.block_timestamp_last), 0)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| snapshot.block_timestamp_last.to_string());

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);
    table.set_titles(row![b->"Field", b->"Value"]);

    table.add_row(row!["Pool", pool.name]);
    table.add_row(row!["Address", pool.address]);
    for token in [&pool.token_a, &pool.token_b] {
        table.add_row(row![
            format!("Token {}", token.symbol),
            format!("{} ({}), {} decimals", token.address, token.name, token.decimals)
        ]);
    }
    table.add_row(row![format!("Reserve {a}"), r->format_amount(valuation.reserve_a, 6)]);
    table.add_row(row![format!("Reserve {b}"), r->format_amount(valuation.reserve_b, 6)]);
    table.add_row(row![format!("Price 1 {a}"), format!("{} {b}", format_ratio(valuation.price_a_in_b))]);
    table.add_row(row![format!("Price 1 {b}"), format!("{} {a}", format_ratio(valuation.price_b_in_a))]);
    table.add_row(row![format!("Value locked in {a}"), r->format_ratio(valuation.value_locked_in_a)]);
    table.add_row(row![format!("Value locked in {b}"), r->format_ratio(valuation.value_locked_in_b)]);
    table.add_row(row!["Constant product K", r->k]);
    table.add_row(row!["LP total supply", r->snapshot.total_supply]);
    table.add_row(row!["LP burned", r->snapshot.burned]);
    table.add_row(row!["LP circulating", r->snapshot.circulating()]);
    table.add_row(row!["Burned share", r->burned]);
    table.add_row(row!["Reserves updated", last_update]);

    Ok(table)
}
