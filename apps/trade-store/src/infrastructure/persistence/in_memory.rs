//! In-memory trade repository.

use std::collections::BTreeMap;

use parking_lot::Mutex;

use crate::domain::shared::EpochMillis;
use crate::domain::trade::{RepositoryError, Trade, TradeKey, TradeRepository};

/// In-memory implementation of `TradeRepository`.
///
/// Trades live in a `BTreeMap` keyed by [`TradeKey`], so iteration order is
/// the store order (`id` ascending, `version` descending). A single mutex
/// guards the map; every operation holds it for its whole duration.
#[derive(Debug, Default)]
pub struct InMemoryTradeRepository {
    trades: Mutex<BTreeMap<TradeKey, Trade>>,
}

impl InMemoryTradeRepository {
    /// Create a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            trades: Mutex::new(BTreeMap::new()),
        }
    }
}

impl TradeRepository for InMemoryTradeRepository {
    fn insert(&self, trade: Trade) -> Result<(), RepositoryError> {
        let mut trades = self.trades.lock();
        let key = trade.key();

        if trades.contains_key(&key) {
            return Err(RepositoryError::DuplicateTrade {
                id: trade.id().to_string(),
                version: trade.version(),
            });
        }

        trades.insert(key, trade);
        Ok(())
    }

    fn replace(&self, old: &Trade, new: Trade) -> Result<(), RepositoryError> {
        let mut trades = self.trades.lock();
        let old_key = old.key();
        let new_key = new.key();

        if !trades.contains_key(&old_key) {
            return Err(RepositoryError::NotFound {
                id: old.id().to_string(),
                version: old.version(),
            });
        }

        if new_key != old_key && trades.contains_key(&new_key) {
            return Err(RepositoryError::DuplicateTrade {
                id: new.id().to_string(),
                version: new.version(),
            });
        }

        trades.remove(&old_key);
        trades.insert(new_key, new);
        Ok(())
    }

    fn list_all(&self) -> Vec<Trade> {
        self.trades.lock().values().cloned().collect()
    }

    fn latest_version(&self, id: &str) -> Option<Trade> {
        let trades = self.trades.lock();
        trades
            .range(TradeKey::first_for(id)..)
            .next()
            .filter(|(key, _)| key.id() == id)
            .map(|(_, trade)| trade.clone())
    }

    fn find_maturing_before(&self, threshold: EpochMillis) -> Vec<Trade> {
        self.trades
            .lock()
            .values()
            .filter(|t| t.matures_before(threshold))
            .cloned()
            .collect()
    }

    fn mark_expired_maturing_before(&self, threshold: EpochMillis) -> usize {
        self.trades
            .lock()
            .values_mut()
            .filter(|t| t.matures_before(threshold))
            .map(Trade::mark_expired)
            .filter(|changed| *changed)
            .count()
    }

    fn len(&self) -> usize {
        self.trades.lock().len()
    }
}
