//! Domain model for the swap monitor.
//!
//! Everything in this crate is synchronous and free of I/O: tokens and pools as
//! resolved from the chain, raw swap events, and the maths that turns a raw event
//! into display-ready metrics.

/// Swap classification and per-event metrics.
pub mod classifier;
/// Number and address formatting for the presentation layer.
pub mod display;
/// Core entities.
pub mod entities;
/// Domain errors.
pub mod error;
/// Pool maths.
pub mod math;
/// Pool-level metrics.
pub mod metrics;
/// Favorable/unfavorable policy.
pub mod policy;
/// Running reserve estimate.
pub mod reserves;
/// Value objects.
pub mod value_objects;

pub use error::{DomainError, SwapError};
