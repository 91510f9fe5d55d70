use crate::{ChainError, PoolReader};
use primitive_types::U256;
use swap_monitor_domain::metrics::LiquiditySnapshot;
use tracing::debug;

/// Holder of the pair's minimum liquidity.
pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// Conventional burn address.
pub const DEAD_ADDRESS: &str = "0x000000000000000000000000000000000000dEaD";

pub fn default_burn_addresses() -> Vec<String> {
    vec![ZERO_ADDRESS.to_string(), DEAD_ADDRESS.to_string()]
}

/// Reads total supply, reserves and the liquidity tokens held by every burn address.
pub async fn read_snapshot<R: PoolReader + ?Sized>(
    reader: &R,
    burn_addresses: &[String],
) -> Result<LiquiditySnapshot, ChainError> {
    let (total_supply, (reserve_a, reserve_b, last)) =
        tokio::try_join!(reader.total_supply(), reader.reserves())?;

    let mut burned = U256::zero();
    for holder in burn_addresses {
        let balance = reader.balance_of(holder).await?;
        debug!(holder = %holder, balance = %balance, "Burn address balance");
        burned = burned.saturating_add(balance);
    }

    Ok(LiquiditySnapshot::new(
        total_supply,
        burned,
        reserve_a,
        reserve_b,
        last,
    )?)
}
