//! Version rule: a submission may not go below the latest stored version.

use super::errors::ValidationError;
use super::validator::TradeValidator;
use crate::domain::trade::{Trade, TradeRepository};

/// Rejects trades whose version is lower than the latest stored version of
/// the same id. Equal versions pass and are later replaced in place.
#[derive(Debug, Clone, Copy, Default)]
pub struct VersionValidator;

impl TradeValidator for VersionValidator {
    fn name(&self) -> &'static str {
        "version"
    }

    fn validate(
        &self,
        trade: &Trade,
        repository: &dyn TradeRepository,
    ) -> Result<(), ValidationError> {
        match repository.latest_version(trade.id()) {
            Some(existing) if existing.version() > trade.version() => {
                Err(ValidationError::VersionTooLow {
                    trade_id: trade.id().to_string(),
                    submitted: trade.version(),
                    existing: existing.version(),
                })
            }
            _ => Ok(()),
        }
    }
}
