//! Chain-client boundary for the swap monitor.
//!
//! This crate provides:
//! - Contract bindings for the pair and its tokens
//! - Read-only pool calls behind the `PoolReader` trait
//! - Startup metadata resolution and the liquidity snapshot
//! - A per-block timestamp cache
//! - The live swap feed over WebSocket or HTTP polling

/// Contract bindings.
pub mod bindings;
/// Block timestamp cache.
pub mod block_time;
/// Endpoint parsing.
pub mod connection;
/// Chain-client errors.
pub mod error;
/// Live swap feed.
pub mod feed;
/// `PoolReader` over an ethers middleware.
pub mod reader;
/// Pool metadata resolution.
pub mod resolver;
/// Liquidity snapshot reads.
pub mod snapshot;

pub use error::ChainError;

use async_trait::async_trait;
use primitive_types::U256;

/// Read-only calls against a pool contract and its tokens. Addresses are hex strings.
#[async_trait]
pub trait PoolReader: Send + Sync {
    fn pool_address(&self) -> String;
    async fn token_a(&self) -> Result<String, ChainError>;
    async fn token_b(&self) -> Result<String, ChainError>;
    async fn pool_name(&self) -> Result<String, ChainError>;
    async fn token_decimals(&self, token: &str) -> Result<u8, ChainError>;
    async fn token_symbol(&self, token: &str) -> Result<String, ChainError>;
    async fn token_name(&self, token: &str) -> Result<String, ChainError>;
    async fn total_supply(&self) -> Result<U256, ChainError>;
    async fn balance_of(&self, holder: &str) -> Result<U256, ChainError>;
    /// `(reserve_a, reserve_b, block_timestamp_last)`
    async fn reserves(&self) -> Result<(U256, U256, u32), ChainError>;
}

#[cfg(test)]
pub(crate) mod mock;
