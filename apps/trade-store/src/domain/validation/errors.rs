//! Validation errors.

use thiserror::Error;

use crate::domain::shared::EpochMillis;

/// A business rule rejected a submitted trade.
///
/// Recoverable: the caller may correct the trade and resubmit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Maturity is already in the past.
    #[error("maturity of trade {trade_id} ({maturity}) is before current time ({now})")]
    MaturityTooEarly {
        /// Trade id.
        trade_id: String,
        /// Submitted maturity, epoch ms.
        maturity: EpochMillis,
        /// Time of the check, epoch ms.
        now: EpochMillis,
    },

    /// A higher version of the trade is already stored.
    #[error("trade {trade_id} v{submitted} rejected: higher version v{existing} exists")]
    VersionTooLow {
        /// Trade id.
        trade_id: String,
        /// Submitted version.
        submitted: i32,
        /// Latest stored version.
        existing: i32,
    },
}

impl ValidationError {
    /// Stable rule code for logging.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MaturityTooEarly { .. } => "MATURITY_TOO_EARLY",
            Self::VersionTooLow { .. } => "VERSION_TOO_LOW",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maturity_too_early_display() {
        let err = ValidationError::MaturityTooEarly {
            trade_id: "T1".to_string(),
            maturity: 1_000,
            now: 2_000,
        };
        let msg = err.to_string();
        assert!(msg.contains("T1"));
        assert!(msg.contains("1000"));
        assert_eq!(err.code(), "MATURITY_TOO_EARLY");
    }

    #[test]
    fn version_too_low_display() {
        let err = ValidationError::VersionTooLow {
            trade_id: "T2".to_string(),
            submitted: 1,
            existing: 2,
        };
        assert_eq!(
            err.to_string(),
            "trade T2 v1 rejected: higher version v2 exists"
        );
        assert_eq!(err.code(), "VERSION_TOO_LOW");
    }
}
