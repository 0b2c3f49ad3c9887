//! Trade Repository Trait
//!
//! Defines the storage abstraction for trades.
//! Implemented by adapters in the infrastructure layer.

use super::aggregate::Trade;
use super::errors::RepositoryError;
use crate::domain::shared::EpochMillis;

/// Repository trait for versioned trade storage.
///
/// Every method is one atomic step against the store. Reads return owned
/// copies; the only in-place mutation of a stored trade is
/// [`mark_expired_maturing_before`](Self::mark_expired_maturing_before).
#[cfg_attr(test, mockall::automock)]
pub trait TradeRepository: Send + Sync {
    /// Add a trade.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DuplicateTrade` if `(id, version)` is
    /// already stored. The store is left unchanged.
    fn insert(&self, trade: Trade) -> Result<(), RepositoryError>;

    /// Swap `old` for `new` in one step.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if `old`'s key is not stored, or
    /// `RepositoryError::DuplicateTrade` if `new`'s key belongs to a
    /// different stored entry. The store is left unchanged on error.
    fn replace(&self, old: &Trade, new: Trade) -> Result<(), RepositoryError>;

    /// Snapshot of every stored trade, `id` ascending then `version` descending.
    fn list_all(&self) -> Vec<Trade>;

    /// Highest stored version for `id`.
    fn latest_version(&self, id: &str) -> Option<Trade>;

    /// Snapshot of trades with maturity strictly before `threshold`.
    fn find_maturing_before(&self, threshold: EpochMillis) -> Vec<Trade>;

    /// Flag every trade with maturity strictly before `threshold` as expired.
    ///
    /// Returns how many trades changed from unexpired to expired.
    fn mark_expired_maturing_before(&self, threshold: EpochMillis) -> usize;

    /// Number of stored trades.
    fn len(&self) -> usize;

    /// True if nothing is stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
