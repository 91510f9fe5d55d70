pub mod liquidity;

pub use liquidity::{LiquiditySnapshot, PoolValuation};
