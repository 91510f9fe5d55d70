//! Live swap monitoring runtime.
//!
//! This crate provides the moving parts between the chain feed and the terminal:
//! - Reconnecting listener with a configurable backoff policy
//! - Per-event classification and row building
//! - Running reserve estimate, reseeded on every connect
//! - Feed consumer loop behind a presentation seam

/// Prelude module for convenient imports.
pub mod prelude;

/// Runtime errors.
pub mod error;
/// Swap processing and the feed consumer.
pub mod monitor;
/// Connection supervision.
pub mod sync;
