//! Trade errors.

use thiserror::Error;

/// Errors raised while building a trade.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TradeError {
    /// A constructor argument was rejected.
    #[error("invalid trade argument '{field}': {message}")]
    InvalidArgument {
        /// Offending field.
        field: String,
        /// Error message.
        message: String,
    },
}

/// Errors raised by a trade repository.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// An entry with the same `(id, version)` is already stored.
    #[error("trade {id} v{version} already exists")]
    DuplicateTrade {
        /// Trade id.
        id: String,
        /// Trade version.
        version: i32,
    },

    /// The entry to replace is not stored.
    #[error("trade {id} v{version} not found")]
    NotFound {
        /// Trade id.
        id: String,
        /// Trade version.
        version: i32,
    },
}
