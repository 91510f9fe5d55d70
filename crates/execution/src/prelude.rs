//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types from the crate.
//!
//! # Example
//!
//! ```rust
//! use swap_monitor_execution::prelude::*;
//! ```

// Errors
pub use crate::error::ExecutionError;

// Monitor
pub use crate::monitor::{
    MonitorConfig, ProcessorStats, RowSink, SwapMonitor, SwapProcessor, SwapRow, TimeDisplay,
};

// Sync
pub use crate::sync::{Backoff, ReconnectPolicy, SwapListener};
