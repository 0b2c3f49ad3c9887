//! Trade Service
//!
//! Entry point for trade submission and listing, and owner of the background
//! expiry process.
//!
//! # Submission
//!
//! 1. Run the validator chain (fail-fast)
//! 2. If the latest stored version has the same version number, replace it
//! 3. Otherwise add the trade as a new version
//!
//! Validation and storage are separate steps. Two concurrent submissions of
//! the same `(id, version)` can both pass validation; the second storage step
//! then surfaces `TradeServiceError::Repository`.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::Mutex;

use super::expiry_process::{
    DEFAULT_LOOKAHEAD_WINDOW, ExpiryError, ExpiryProcess, ExpirySchedule, run_expiry,
};
use crate::domain::trade::{RepositoryError, Trade, TradeRepository};
use crate::domain::validation::{ValidationError, ValidatorChain};

/// Configuration for the trade service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradeServiceConfig {
    /// Trades maturing before `now + lookahead_window` are flagged expired.
    pub lookahead_window: Duration,
    /// Maximum wait for the expiry task when stopping it.
    pub stop_timeout: Duration,
}

impl Default for TradeServiceConfig {
    fn default() -> Self {
        Self {
            lookahead_window: DEFAULT_LOOKAHEAD_WINDOW,
            stop_timeout: Duration::from_secs(30),
        }
    }
}

/// Trade submission errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TradeServiceError {
    /// A validator rejected the trade; nothing was stored.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The storage step failed after validation passed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// How a submitted trade was stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Stored as a new `(id, version)` entry.
    Added,
    /// Replaced the stored entry with the same `(id, version)`.
    Replaced,
}

/// Trade submission, listing and expiry scheduling.
pub struct TradeService<R>
where
    R: TradeRepository + 'static,
{
    repository: Arc<R>,
    validators: ValidatorChain,
    config: TradeServiceConfig,
    expiry: Mutex<Option<ExpiryProcess>>,
}

impl<R> TradeService<R>
where
    R: TradeRepository + 'static,
{
    /// Create a service with the default configuration.
    pub fn new(repository: Arc<R>, validators: ValidatorChain) -> Self {
        Self::with_config(repository, validators, TradeServiceConfig::default())
    }

    /// Create a service with an explicit configuration.
    pub fn with_config(
        repository: Arc<R>,
        validators: ValidatorChain,
        config: TradeServiceConfig,
    ) -> Self {
        Self {
            repository,
            validators,
            config,
            expiry: Mutex::new(None),
        }
    }

    /// Validate and store a trade.
    ///
    /// # Errors
    ///
    /// Returns `TradeServiceError::Validation` if a validator rejects the
    /// trade, or `TradeServiceError::Repository` if a concurrent submission
    /// changed the store between validation and storage.
    pub fn submit(&self, trade: Trade) -> Result<SubmitOutcome, TradeServiceError> {
        if let Err(e) = self.validators.validate(&trade, self.repository.as_ref()) {
            tracing::info!(
                trade_id = %trade.id(),
                version = trade.version(),
                code = e.code(),
                error = %e,
                "Trade rejected"
            );
            return Err(e.into());
        }

        let key = trade.key();
        let outcome = match self.repository.latest_version(trade.id()) {
            Some(existing) if existing.version() == trade.version() => {
                self.repository.replace(&existing, trade)?;
                SubmitOutcome::Replaced
            }
            _ => {
                self.repository.insert(trade)?;
                SubmitOutcome::Added
            }
        };

        tracing::info!(
            trade_id = %key.id(),
            version = key.version(),
            outcome = ?outcome,
            "Trade stored"
        );

        Ok(outcome)
    }

    /// Snapshot of every stored trade, `id` ascending then `version` descending.
    pub fn list_trades(&self) -> Vec<Trade> {
        self.repository.list_all()
    }

    /// Start the periodic expiry process, replacing any running one.
    ///
    /// # Errors
    ///
    /// Returns `ExpiryError::InvalidPeriod` if `period` is zero, or
    /// `ExpiryError::ScheduleOutOfRange` if the delays overflow the timer.
    /// A running process is left untouched in both cases.
    pub async fn start_expiry_process(
        &self,
        initial_delay: Duration,
        period: Duration,
    ) -> Result<(), ExpiryError> {
        let schedule = ExpirySchedule {
            initial_delay,
            period,
            lookahead_window: self.config.lookahead_window,
        };
        schedule.validate()?;

        let mut slot = self.expiry.lock().await;
        if let Some(previous) = slot.take() {
            tracing::info!("Replacing running expiry process");
            previous.stop(self.config.stop_timeout).await;
        }

        *slot = Some(ExpiryProcess::spawn(Arc::clone(&self.repository), schedule)?);
        Ok(())
    }

    /// Stop the expiry process and wait for it to finish.
    ///
    /// A run in progress completes first. The wait is bounded by the
    /// configured stop timeout. No-op if nothing is running.
    pub async fn stop_expiry_process(&self) {
        let previous = self.expiry.lock().await.take();
        match previous {
            Some(process) => {
                process.stop(self.config.stop_timeout).await;
            }
            None => tracing::debug!("No expiry process to stop"),
        }
    }

    /// True while an expiry process is scheduled.
    pub async fn is_expiry_running(&self) -> bool {
        self.expiry
            .lock()
            .await
            .as_ref()
            .is_some_and(ExpiryProcess::is_running)
    }

    /// Run one expiry pass now, outside the schedule.
    ///
    /// Returns how many trades were newly flagged.
    pub fn run_expiry_once(&self) -> usize {
        let flagged = run_expiry(self.repository.as_ref(), self.config.lookahead_window);
        tracing::debug!(flagged, "Manual expiry run complete");
        flagged
    }

    /// Underlying repository.
    pub const fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    /// Active configuration.
    pub const fn config(&self) -> TradeServiceConfig {
        self.config
    }
}

impl<R> std::fmt::Debug for TradeService<R>
where
    R: TradeRepository + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TradeService")
            .field("validators", &self.validators)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
