pub mod pool;
pub mod swap;
pub mod token;

// Re-export for easier access
pub use pool::{Pool, PoolSide};
pub use swap::SwapEvent;
pub use token::Token;
