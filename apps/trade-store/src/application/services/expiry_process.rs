//! Expiry Process
//!
//! Periodic background task that flags trades whose maturity falls inside a
//! look-ahead window. The first run happens after an initial delay, then the
//! task re-fires every period until it is cancelled.
//!
//! # Lifecycle
//!
//! ```text
//! spawn ──► sleep(initial_delay) ──► run ──► sleep(period) ──► run ──► ...
//!                                                   │
//!                                         cancel ───┴──► task exits
//! ```
//!
//! Cancellation is only observed between runs; a run in progress always
//! completes.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::domain::shared::Timestamp;
use crate::domain::trade::TradeRepository;

/// Default look-ahead window: trades maturing within the next 20 seconds are flagged.
pub const DEFAULT_LOOKAHEAD_WINDOW: Duration = Duration::from_millis(20_000);

/// Timing of an expiry process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpirySchedule {
    /// Delay before the first run.
    pub initial_delay: Duration,
    /// Interval between runs.
    pub period: Duration,
    /// Trades maturing before `now + lookahead_window` are flagged.
    pub lookahead_window: Duration,
}

impl ExpirySchedule {
    /// Check that the schedule can be started now.
    ///
    /// # Errors
    ///
    /// Returns `ExpiryError::InvalidPeriod` if the period is zero, or
    /// `ExpiryError::ScheduleOutOfRange` if the first two runs cannot be
    /// represented as instants.
    pub fn validate(&self) -> Result<(), ExpiryError> {
        self.first_run_at().map(|_| ())
    }

    fn first_run_at(&self) -> Result<Instant, ExpiryError> {
        if self.period.is_zero() {
            return Err(ExpiryError::InvalidPeriod);
        }

        Instant::now()
            .checked_add(self.initial_delay)
            .filter(|start| start.checked_add(self.period).is_some())
            .ok_or(ExpiryError::ScheduleOutOfRange {
                initial_delay: self.initial_delay,
                period: self.period,
            })
    }
}

/// Expiry process errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpiryError {
    /// The run interval is zero.
    #[error("expiry period must be greater than zero")]
    InvalidPeriod,

    /// The first or second run would fall beyond the timer's range.
    #[error("expiry schedule out of range: initial delay {initial_delay:?}, period {period:?}")]
    ScheduleOutOfRange {
        /// Requested initial delay.
        initial_delay: Duration,
        /// Requested period.
        period: Duration,
    },
}

/// How a stop request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    /// The task finished within the timeout.
    Stopped,
    /// The task did not finish in time and was aborted.
    TimedOut,
}

/// Flag every trade maturing before `now + lookahead_window`.
///
/// Returns how many trades were newly flagged.
pub fn run_expiry<R>(repository: &R, lookahead_window: Duration) -> usize
where
    R: TradeRepository + ?Sized,
{
    let threshold = Timestamp::now().saturating_add(lookahead_window).unix_millis();
    repository.mark_expired_maturing_before(threshold)
}

/// Handle to a running expiry task.
///
/// Dropping the handle cancels the task without waiting for it.
#[derive(Debug)]
pub struct ExpiryProcess {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
    schedule: ExpirySchedule,
}

impl ExpiryProcess {
    /// Spawn the expiry task on the current tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns the error of [`ExpirySchedule::validate`]. Nothing is spawned
    /// in that case.
    pub fn spawn<R>(repository: Arc<R>, schedule: ExpirySchedule) -> Result<Self, ExpiryError>
    where
        R: TradeRepository + 'static,
    {
        let start = schedule.first_run_at()?;

        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();

        let handle = tokio::spawn(async move {
            run_loop(repository, start, schedule, task_cancel).await;
        });

        tracing::info!(
            initial_delay_ms = schedule.initial_delay.as_millis(),
            period_ms = schedule.period.as_millis(),
            lookahead_ms = schedule.lookahead_window.as_millis(),
            "Expiry process started"
        );

        Ok(Self {
            cancel,
            handle,
            schedule,
        })
    }

    /// Schedule this process was started with.
    #[must_use]
    pub const fn schedule(&self) -> ExpirySchedule {
        self.schedule
    }

    /// True while the task has not exited.
    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Cancel the task and wait up to `timeout` for it to finish.
    ///
    /// A run in progress is allowed to complete. If the wait times out the
    /// task is aborted and `StopOutcome::TimedOut` is returned.
    pub async fn stop(mut self, timeout: Duration) -> StopOutcome {
        self.cancel.cancel();

        match tokio::time::timeout(timeout, &mut self.handle).await {
            Ok(Ok(())) => {
                tracing::info!("Expiry process stopped");
                StopOutcome::Stopped
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Expiry task ended abnormally");
                StopOutcome::Stopped
            }
            Err(_) => {
                tracing::warn!(
                    timeout_ms = timeout.as_millis(),
                    "Timed out waiting for expiry task, aborting"
                );
                self.handle.abort();
                StopOutcome::TimedOut
            }
        }
    }
}

impl Drop for ExpiryProcess {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn run_loop<R>(
    repository: Arc<R>,
    start: Instant,
    schedule: ExpirySchedule,
    cancel: CancellationToken,
) where
    R: TradeRepository + 'static,
{
    let mut interval = tokio::time::interval_at(start, schedule.period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                tracing::debug!("Expiry process cancelled");
                break;
            }
            _ = interval.tick() => {
                fire(repository.as_ref(), schedule.lookahead_window);
            }
        }
    }
}

/// One run. A panic is confined to this run; the schedule continues.
fn fire<R>(repository: &R, lookahead_window: Duration)
where
    R: TradeRepository + ?Sized,
{
    match catch_unwind(AssertUnwindSafe(|| run_expiry(repository, lookahead_window))) {
        Ok(0) => tracing::debug!("Expiry run flagged no trades"),
        Ok(flagged) => tracing::info!(flagged, "Expiry run flagged trades"),
        Err(_) => tracing::error!("Expiry run panicked, continuing schedule"),
    }
}
