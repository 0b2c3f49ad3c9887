//! Timestamp value object for trade dates.
//!
//! Trades carry their dates as epoch milliseconds. `Timestamp` is the
//! bridge between that representation and `chrono`'s wall clock.

use chrono::{DateTime, TimeDelta, Utc};
use std::time::Duration;

/// Milliseconds since the Unix epoch, UTC.
pub type EpochMillis = i64;

/// A UTC instant with millisecond precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Get the current timestamp.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Current wall-clock time in epoch milliseconds.
    #[must_use]
    pub fn now_millis() -> EpochMillis {
        Self::now().unix_millis()
    }

    /// Get the Unix timestamp in milliseconds.
    #[must_use]
    pub fn unix_millis(&self) -> EpochMillis {
        self.0.timestamp_millis()
    }

    /// Shift forward by a std duration, saturating at the representable maximum.
    #[must_use]
    pub fn saturating_add(&self, duration: Duration) -> Self {
        TimeDelta::from_std(duration)
            .ok()
            .and_then(|delta| self.0.checked_add_signed(delta))
            .map_or(Self(DateTime::<Utc>::MAX_UTC), Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(millis: EpochMillis) -> Timestamp {
        Timestamp(DateTime::from_timestamp_millis(millis).unwrap())
    }

    #[test]
    fn timestamp_now_millis_is_positive() {
        assert!(Timestamp::now_millis() > 0);
    }

    #[test]
    fn timestamp_unix_millis_round_trips() {
        assert_eq!(at(1_672_572_824_030).unix_millis(), 1_672_572_824_030);
    }

    #[test]
    fn timestamp_saturating_add() {
        let later = at(1_000).saturating_add(Duration::from_millis(20_000));
        assert_eq!(later.unix_millis(), 21_000);
    }

    #[test]
    fn timestamp_saturating_add_clamps() {
        let later = Timestamp::now().saturating_add(Duration::MAX);
        assert_eq!(later, Timestamp(DateTime::<Utc>::MAX_UTC));
    }

    #[test]
    fn timestamp_ordering() {
        assert!(at(1_000) < at(2_000));
        assert!(Timestamp::now() < Timestamp::now().saturating_add(Duration::from_secs(1)));
    }
}
