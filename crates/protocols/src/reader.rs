use crate::bindings::{IERC20Metadata, IUniswapV2Pair};
use crate::{ChainError, PoolReader};
use async_trait::async_trait;
use ethers::prelude::*;
use ethers::utils::to_checksum;
use std::sync::Arc;

/// Parses a hex address.
pub fn parse_address(address: &str) -> Result<Address, ChainError> {
    address
        .trim()
        .parse::<Address>()
        .map_err(|_| ChainError::InvalidAddress(address.to_string()))
}

/// Checksummed hex form of an address.
pub fn format_address(address: &Address) -> String {
    to_checksum(address, None)
}

/// `PoolReader` backed by abigen bindings over any ethers middleware.
pub struct EthersPoolReader<M> {
    address: Address,
    client: Arc<M>,
    pair: IUniswapV2Pair<M>,
}

impl<M: Middleware + 'static> EthersPoolReader<M> {
    pub fn new(address: Address, client: Arc<M>) -> Self {
        let pair = IUniswapV2Pair::new(address, Arc::clone(&client));
        Self {
            address,
            client,
            pair,
        }
    }

    pub fn pair(&self) -> &IUniswapV2Pair<M> {
        &self.pair
    }

    fn token(&self, token: &str) -> Result<IERC20Metadata<M>, ChainError> {
        Ok(IERC20Metadata::new(
            parse_address(token)?,
            Arc::clone(&self.client),
        ))
    }
}

#[async_trait]
impl<M: Middleware + 'static> PoolReader for EthersPoolReader<M> {
    fn pool_address(&self) -> String {
        format_address(&self.address)
    }

    async fn token_a(&self) -> Result<String, ChainError> {
        let address = self
            .pair
            .token_0()
            .call()
            .await
            .map_err(|e| ChainError::call("token0", e))?;
        Ok(format_address(&address))
    }

    async fn token_b(&self) -> Result<String, ChainError> {
        let address = self
            .pair
            .token_1()
            .call()
            .await
            .map_err(|e| ChainError::call("token1", e))?;
        Ok(format_address(&address))
    }

    async fn pool_name(&self) -> Result<String, ChainError> {
        self.pair
            .name()
            .call()
            .await
            .map_err(|e| ChainError::call("name", e))
    }

    async fn token_decimals(&self, token: &str) -> Result<u8, ChainError> {
        self.token(token)?
            .decimals()
            .call()
            .await
            .map_err(|e| ChainError::call("decimals", e))
    }

    async fn token_symbol(&self, token: &str) -> Result<String, ChainError> {
        self.token(token)?
            .symbol()
            .call()
            .await
            .map_err(|e| ChainError::call("symbol", e))
    }

    async fn token_name(&self, token: &str) -> Result<String, ChainError> {
        self.token(token)?
            .name()
            .call()
            .await
            .map_err(|e| ChainError::call("token name", e))
    }

    async fn total_supply(&self) -> Result<U256, ChainError> {
        self.pair
            .total_supply()
            .call()
            .await
            .map_err(|e| ChainError::call("totalSupply", e))
    }

    async fn balance_of(&self, holder: &str) -> Result<U256, ChainError> {
        self.pair
            .balance_of(parse_address(holder)?)
            .call()
            .await
            .map_err(|e| ChainError::call("balanceOf", e))
    }

    async fn reserves(&self) -> Result<(U256, U256, u32), ChainError> {
        let (reserve_a, reserve_b, last) = self
            .pair
            .get_reserves()
            .call()
            .await
            .map_err(|e| ChainError::call("getReserves", e))?;
        Ok((U256::from(reserve_a), U256::from(reserve_b), last))
    }
}
