//! Feed connection management.
//!
//! Provides:
//! - Reconnect back-off policy
//! - The reconnecting swap listener

mod backoff;
mod listener;

pub use backoff::*;
pub use listener::*;
