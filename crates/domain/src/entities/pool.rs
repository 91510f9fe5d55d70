use crate::entities::token::Token;
use serde::{Deserialize, Serialize};

/// Which of the two pool assets a value refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PoolSide {
    A,
    B,
}

/// A two-asset pool. `token_a` is the pair's `token0`, `token_b` its `token1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    pub address: String,
    pub name: String,
    pub token_a: Token,
    pub token_b: Token,
}

impl Pool {
    pub fn new(
        address: impl Into<String>,
        name: impl Into<String>,
        token_a: Token,
        token_b: Token,
    ) -> Self {
        Self {
            address: address.into(),
            name: name.into(),
            token_a,
            token_b,
        }
    }

    pub fn token(&self, side: PoolSide) -> &Token {
        match side {
            PoolSide::A => &self.token_a,
            PoolSide::B => &self.token_b,
        }
    }

    /// Finds the side holding the token with the given symbol.
    pub fn side_of(&self, symbol: &str) -> Option<PoolSide> {
        if self.token_a.has_symbol(symbol) {
            Some(PoolSide::A)
        } else if self.token_b.has_symbol(symbol) {
            Some(PoolSide::B)
        } else {
            None
        }
    }
}
