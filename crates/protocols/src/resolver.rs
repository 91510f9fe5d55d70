//! Resolves the pool's two tokens and their metadata once per connection.

use crate::{ChainError, PoolReader};
use swap_monitor_domain::entities::{Pool, Token};
use tracing::{debug, info};

/// Name used when the pair contract does not expose `name()`.
pub const DEFAULT_POOL_NAME: &str = "Pair";

/// Resolves asset A (`token0`) and asset B (`token1`) with their decimals and symbols.
///
/// Any failing token call aborts resolution. Only the descriptive names are optional.
pub async fn resolve_pool<R: PoolReader + ?Sized>(reader: &R) -> Result<Pool, ChainError> {
    let (address_a, address_b) = tokio::try_join!(reader.token_a(), reader.token_b())?;
    let (token_a, token_b) = tokio::try_join!(
        resolve_token(reader, &address_a),
        resolve_token(reader, &address_b)
    )?;

    let name = match reader.pool_name().await {
        Ok(name) => name,
        Err(e) => {
            debug!(error = %e, "Pool has no name(), using default");
            DEFAULT_POOL_NAME.to_string()
        }
    };

    let pool = Pool::new(reader.pool_address(), name, token_a, token_b);
    info!(
        pool = %pool.address,
        name = %pool.name,
        token_a = %pool.token_a,
        token_b = %pool.token_b,
        "Resolved pool metadata"
    );
    Ok(pool)
}

async fn resolve_token<R: PoolReader + ?Sized>(
    reader: &R,
    address: &str,
) -> Result<Token, ChainError> {
    let (decimals, symbol) = tokio::try_join!(
        reader.token_decimals(address),
        reader.token_symbol(address)
    )?;
    let name = reader
        .token_name(address)
        .await
        .unwrap_or_else(|_| symbol.clone());

    Ok(Token::new(address, symbol, decimals, name))
}
