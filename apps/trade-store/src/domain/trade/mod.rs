//! Trade Bounded Context
//!
//! Versioned trade records and the storage port that holds their history.
//!
//! # Key Concepts
//!
//! - **Trade**: One version of a trade instruction, keyed by `(id, version)`
//! - **Version History**: Superseded versions stay stored alongside the latest
//! - **Key Order**: `id` ascending, `version` descending (latest first)

pub mod aggregate;
pub mod errors;
pub mod repository;

pub use aggregate::{CreateTradeCommand, Trade, TradeKey};
pub use errors::{RepositoryError, TradeError};
pub use repository::TradeRepository;

#[cfg(test)]
pub use repository::MockTradeRepository;
