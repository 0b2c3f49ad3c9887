//! Validator Chain
//!
//! Runs an ordered list of business rules against a candidate trade and stops
//! at the first rejection.

use super::errors::ValidationError;
use super::maturity_date::MaturityDateValidator;
use super::version::VersionValidator;
use crate::domain::trade::{Trade, TradeRepository};

/// A single acceptance rule for submitted trades.
pub trait TradeValidator: Send + Sync {
    /// Short rule name for logs.
    fn name(&self) -> &'static str;

    /// Check `trade` against the current repository contents.
    ///
    /// # Errors
    ///
    /// Returns the `ValidationError` describing the broken rule.
    fn validate(
        &self,
        trade: &Trade,
        repository: &dyn TradeRepository,
    ) -> Result<(), ValidationError>;
}

/// Ordered, fail-fast sequence of validators.
#[derive(Default)]
pub struct ValidatorChain {
    validators: Vec<Box<dyn TradeValidator>>,
}

impl ValidatorChain {
    /// Create an empty chain. An empty chain accepts every trade.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Maturity check followed by version check.
    #[must_use]
    pub fn standard() -> Self {
        Self::new()
            .with(MaturityDateValidator::new())
            .with(VersionValidator)
    }

    /// Append a validator; it runs after every validator already added.
    #[must_use]
    pub fn with(mut self, validator: impl TradeValidator + 'static) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    /// Append an already boxed validator.
    pub fn push(&mut self, validator: Box<dyn TradeValidator>) {
        self.validators.push(validator);
    }

    /// Names of the validators, in run order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.validators.iter().map(|v| v.name()).collect()
    }

    /// Number of validators.
    #[must_use]
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    /// True if the chain has no validators.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Run every validator in order, returning the first failure.
    ///
    /// # Errors
    ///
    /// Returns the error of the first validator that rejects `trade`;
    /// later validators are not run.
    pub fn validate(
        &self,
        trade: &Trade,
        repository: &dyn TradeRepository,
    ) -> Result<(), ValidationError> {
        for validator in &self.validators {
            if let Err(e) = validator.validate(trade, repository) {
                tracing::debug!(
                    trade_id = %trade.id(),
                    version = trade.version(),
                    validator = validator.name(),
                    code = e.code(),
                    "Trade rejected by validator"
                );
                return Err(e);
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for ValidatorChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidatorChain")
            .field("validators", &self.names())
            .finish()
    }
}
