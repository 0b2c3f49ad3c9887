//! Shared Domain Types
//!
//! Value objects used across the trade and validation contexts.

pub mod timestamp;

pub use timestamp::{EpochMillis, Timestamp};
