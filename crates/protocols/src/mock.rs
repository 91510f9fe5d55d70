//! In-memory `PoolReader` for tests.

use crate::{ChainError, PoolReader};
use async_trait::async_trait;
use primitive_types::U256;
use std::collections::HashMap;

#[derive(Default)]
pub struct MockToken {
    pub decimals: u8,
    pub symbol: String,
    pub name: Option<String>,
}

#[derive(Default)]
pub struct MockReader {
    pub address: String,
    pub token_a: String,
    pub token_b: String,
    pub name: Option<String>,
    pub tokens: HashMap<String, MockToken>,
    pub total_supply: U256,
    pub balances: HashMap<String, U256>,
    pub reserves: (U256, U256, u32),
    pub fail_reserves: bool,
}

impl MockReader {
    pub fn weth_usdc() -> Self {
        let mut tokens = HashMap::new();
        tokens.insert(
            "0xa".to_string(),
            MockToken {
                decimals: 18,
                symbol: "WETH".to_string(),
                name: Some("Wrapped Ether".to_string()),
            },
        );
        tokens.insert(
            "0xb".to_string(),
            MockToken {
                decimals: 6,
                symbol: "USDC".to_string(),
                name: None,
            },
        );
        Self {
            address: "0xpool".to_string(),
            token_a: "0xa".to_string(),
            token_b: "0xb".to_string(),
            name: Some("Uniswap V2".to_string()),
            tokens,
            ..Default::default()
        }
    }

    fn lookup(&self, token: &str) -> Result<&MockToken, ChainError> {
        self.tokens
            .get(token)
            .ok_or_else(|| ChainError::call("decimals", "execution reverted"))
    }
}

#[async_trait]
impl PoolReader for MockReader {
    fn pool_address(&self) -> String {
        self.address.clone()
    }

    async fn token_a(&self) -> Result<String, ChainError> {
        Ok(self.token_a.clone())
    }

    async fn token_b(&self) -> Result<String, ChainError> {
        Ok(self.token_b.clone())
    }

    async fn pool_name(&self) -> Result<String, ChainError> {
        self.name
            .clone()
            .ok_or_else(|| ChainError::call("name", "execution reverted"))
    }

    async fn token_decimals(&self, token: &str) -> Result<u8, ChainError> {
        Ok(self.lookup(token)?.decimals)
    }

    async fn token_symbol(&self, token: &str) -> Result<String, ChainError> {
        Ok(self.lookup(token)?.symbol.clone())
    }

    async fn token_name(&self, token: &str) -> Result<String, ChainError> {
        self.lookup(token)?
            .name
            .clone()
            .ok_or_else(|| ChainError::call("name", "execution reverted"))
    }

    async fn total_supply(&self) -> Result<U256, ChainError> {
        Ok(self.total_supply)
    }

    async fn balance_of(&self, holder: &str) -> Result<U256, ChainError> {
        Ok(self.balances.get(holder).copied().unwrap_or_default())
    }

    async fn reserves(&self) -> Result<(U256, U256, u32), ChainError> {
        if self.fail_reserves {
            return Err(ChainError::call("getReserves", "connection reset"));
        }
        Ok(self.reserves)
    }
}
