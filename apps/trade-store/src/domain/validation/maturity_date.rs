//! Maturity date rule: a trade may not be submitted after it has matured.

use super::errors::ValidationError;
use super::validator::TradeValidator;
use crate::domain::shared::{EpochMillis, Timestamp};
use crate::domain::trade::{Trade, TradeRepository};

/// Rejects trades whose maturity is strictly before the current time.
#[derive(Debug, Clone, Copy)]
pub struct MaturityDateValidator {
    clock: fn() -> EpochMillis,
}

impl MaturityDateValidator {
    /// Validator reading the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self {
            clock: Timestamp::now_millis,
        }
    }

    /// Validator reading time from `clock`.
    #[must_use]
    pub const fn with_clock(clock: fn() -> EpochMillis) -> Self {
        Self { clock }
    }
}

impl Default for MaturityDateValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl TradeValidator for MaturityDateValidator {
    fn name(&self) -> &'static str {
        "maturity_date"
    }

    fn validate(
        &self,
        trade: &Trade,
        _repository: &dyn TradeRepository,
    ) -> Result<(), ValidationError> {
        let now = (self.clock)();
        if now > trade.maturity_timestamp() {
            return Err(ValidationError::MaturityTooEarly {
                trade_id: trade.id().to_string(),
                maturity: trade.maturity_timestamp(),
                now,
            });
        }
        Ok(())
    }
}
