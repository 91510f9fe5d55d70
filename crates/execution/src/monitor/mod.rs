//! Swap processing: raw events in, display rows out.
//!
//! Provides:
//! - Per-event classification, reserve bookkeeping and row building
//! - The feed consumer loop and the `RowSink` presentation seam

mod processor;
mod runner;

pub use processor::*;
pub use runner::*;
