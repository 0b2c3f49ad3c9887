//! Trade Aggregate
//!
//! A single version of a trade instruction. The pair `(id, version)` is the
//! identity key; every other field is payload. Only the `expired` flag changes
//! after construction.

use std::cmp::{Ordering, Reverse};
use std::fmt;

use serde::Serialize;

use super::errors::TradeError;
use crate::domain::shared::EpochMillis;

/// Command to create a new trade.
#[derive(Debug, Clone, Default)]
pub struct CreateTradeCommand {
    /// Trade identifier (must be non-empty).
    pub id: String,
    /// Caller-assigned version.
    pub version: i32,
    /// Counterparty identifier.
    pub counterparty_id: String,
    /// Book identifier.
    pub book_id: String,
    /// Creation time, epoch milliseconds.
    pub created_timestamp: EpochMillis,
    /// Maturity time, epoch milliseconds.
    pub maturity_timestamp: EpochMillis,
    /// Initial expiry flag.
    pub expired: bool,
}

impl CreateTradeCommand {
    /// Validate the command parameters.
    ///
    /// # Errors
    ///
    /// Returns `TradeError::InvalidArgument` if the id is empty.
    pub fn validate(&self) -> Result<(), TradeError> {
        if self.id.is_empty() {
            return Err(TradeError::InvalidArgument {
                field: "id".to_string(),
                message: "trade id cannot be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Identity key of a stored trade.
///
/// Orders by `id` ascending, then `version` descending, so that a scan over
/// one id meets its latest version first.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TradeKey {
    id: String,
    version: Reverse<i32>,
}

impl TradeKey {
    /// Create a key.
    #[must_use]
    pub fn new(id: impl Into<String>, version: i32) -> Self {
        Self {
            id: id.into(),
            version: Reverse(version),
        }
    }

    /// Trade id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Trade version.
    #[must_use]
    pub const fn version(&self) -> i32 {
        self.version.0
    }

    /// Smallest key for `id` in key order, i.e. its highest possible version.
    #[must_use]
    pub fn first_for(id: &str) -> Self {
        Self::new(id, i32::MAX)
    }
}

impl Ord for TradeKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id
            .cmp(&other.id)
            .then_with(|| self.version.cmp(&other.version))
    }
}

impl PartialOrd for TradeKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for TradeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} v{}", self.id, self.version.0)
    }
}

/// A versioned trade.
///
/// Equality compares every field, including `expired`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    id: String,
    version: i32,
    counterparty_id: String,
    book_id: String,
    maturity_timestamp: EpochMillis,
    created_timestamp: EpochMillis,
    expired: bool,
}

impl Trade {
    /// Create a new trade.
    ///
    /// # Errors
    ///
    /// Returns `TradeError::InvalidArgument` if the id is empty.
    pub fn create(command: CreateTradeCommand) -> Result<Self, TradeError> {
        command.validate()?;

        Ok(Self {
            id: command.id,
            version: command.version,
            counterparty_id: command.counterparty_id,
            book_id: command.book_id,
            maturity_timestamp: command.maturity_timestamp,
            created_timestamp: command.created_timestamp,
            expired: command.expired,
        })
    }

    /// Trade id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Trade version.
    #[must_use]
    pub const fn version(&self) -> i32 {
        self.version
    }

    /// Counterparty id.
    #[must_use]
    pub fn counterparty_id(&self) -> &str {
        &self.counterparty_id
    }

    /// Book id.
    #[must_use]
    pub fn book_id(&self) -> &str {
        &self.book_id
    }

    /// Maturity time, epoch milliseconds.
    #[must_use]
    pub const fn maturity_timestamp(&self) -> EpochMillis {
        self.maturity_timestamp
    }

    /// Creation time, epoch milliseconds.
    #[must_use]
    pub const fn created_timestamp(&self) -> EpochMillis {
        self.created_timestamp
    }

    /// Whether the expiry process has flagged this trade.
    #[must_use]
    pub const fn is_expired(&self) -> bool {
        self.expired
    }

    /// Identity key `(id, version)`.
    #[must_use]
    pub fn key(&self) -> TradeKey {
        TradeKey::new(self.id.clone(), self.version)
    }

    /// True if maturity is strictly before `threshold`.
    #[must_use]
    pub const fn matures_before(&self, threshold: EpochMillis) -> bool {
        self.maturity_timestamp < threshold
    }

    /// Flag as expired. Returns `true` if the flag changed.
    pub(crate) fn mark_expired(&mut self) -> bool {
        let changed = !self.expired;
        self.expired = true;
        changed
    }
}

impl fmt::Display for Trade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Trade [id={}, version={}, counterparty_id={}, book_id={}, maturity={}, created={}, expired={}]",
            self.id,
            self.version,
            self.counterparty_id,
            self.book_id,
            self.maturity_timestamp,
            self.created_timestamp,
            self.expired
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command() -> CreateTradeCommand {
        CreateTradeCommand {
            id: "T1".to_string(),
            version: 2,
            counterparty_id: "CP-1".to_string(),
            book_id: "B1".to_string(),
            created_timestamp: 1_672_572_824_030,
            maturity_timestamp: 1_672_572_824_030,
            expired: false,
        }
    }

    #[test]
    fn create_copies_all_fields() {
        let trade = Trade::create(command()).unwrap();

        assert_eq!(trade.id(), "T1");
        assert_eq!(trade.version(), 2);
        assert_eq!(trade.counterparty_id(), "CP-1");
        assert_eq!(trade.book_id(), "B1");
        assert_eq!(trade.created_timestamp(), 1_672_572_824_030);
        assert_eq!(trade.maturity_timestamp(), 1_672_572_824_030);
        assert!(!trade.is_expired());
    }

    #[test]
    fn create_rejects_empty_id() {
        let err = Trade::create(CreateTradeCommand {
            id: String::new(),
            ..command()
        })
        .unwrap_err();

        assert!(matches!(err, TradeError::InvalidArgument { ref field, .. } if field == "id"));
    }

    #[test]
    fn equality_covers_every_field() {
        let a = Trade::create(command()).unwrap();
        let b = Trade::create(command()).unwrap();
        assert_eq!(a, b);

        let other_book = Trade::create(CreateTradeCommand {
            book_id: "B2".to_string(),
            ..command()
        })
        .unwrap();
        assert_ne!(a, other_book);

        let mut expired = b;
        expired.mark_expired();
        assert_ne!(a, expired);
    }

    #[test]
    fn key_orders_id_ascending_then_version_descending() {
        let mut keys = vec![
            TradeKey::new("T2", 1),
            TradeKey::new("T1", 1),
            TradeKey::new("T1", 3),
            TradeKey::new("T2", 5),
            TradeKey::new("T1", 2),
        ];
        keys.sort();

        let ordered: Vec<String> = keys.iter().map(ToString::to_string).collect();
        assert_eq!(ordered, ["T1 v3", "T1 v2", "T1 v1", "T2 v5", "T2 v1"]);
    }

    #[test]
    fn first_for_sorts_before_every_version_of_id() {
        let first = TradeKey::first_for("T1");
        assert!(first <= TradeKey::new("T1", i32::MAX));
        assert!(first < TradeKey::new("T1", i32::MIN));
        assert!(first > TradeKey::new("T0", i32::MIN));
    }

    #[test]
    fn mark_expired_reports_change_once() {
        let mut trade = Trade::create(command()).unwrap();
        assert!(trade.mark_expired());
        assert!(!trade.mark_expired());
        assert!(trade.is_expired());
    }

    #[test]
    fn matures_before_is_strict() {
        let trade = Trade::create(command()).unwrap();
        assert!(trade.matures_before(1_672_572_824_031));
        assert!(!trade.matures_before(1_672_572_824_030));
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let trade = Trade::create(command()).unwrap();
        let json = serde_json::to_value(&trade).unwrap();

        assert_eq!(json["counterpartyId"], "CP-1");
        assert_eq!(json["maturityTimestamp"], 1_672_572_824_030_i64);
        assert_eq!(json["expired"], false);
    }

    #[test]
    fn display_lists_fields() {
        let trade = Trade::create(command()).unwrap();
        let text = trade.to_string();
        assert!(text.contains("id=T1"));
        assert!(text.contains("version=2"));
        assert!(text.contains("book_id=B1"));
    }
}
