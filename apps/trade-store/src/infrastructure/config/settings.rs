//! Trade Store Configuration Settings
//!
//! Configuration types for the trade store, loaded from environment variables.

use std::time::Duration;

use crate::application::services::{DEFAULT_LOOKAHEAD_WINDOW, TradeServiceConfig};

/// Default delay before the first expiry run.
const DEFAULT_INITIAL_DELAY: Duration = Duration::from_secs(3);

/// Default interval between expiry runs.
const DEFAULT_PERIOD: Duration = Duration::from_secs(10);

/// Default bound on waiting for the expiry task during shutdown.
const DEFAULT_STOP_TIMEOUT: Duration = Duration::from_secs(30);

/// Expiry process settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpirySettings {
    /// Whether the binary starts the expiry process.
    pub enabled: bool,
    /// Delay before the first run.
    pub initial_delay: Duration,
    /// Interval between runs.
    pub period: Duration,
    /// Trades maturing before `now + lookahead_window` are flagged.
    pub lookahead_window: Duration,
    /// Maximum wait for the task to finish when stopping.
    pub stop_timeout: Duration,
}

impl Default for ExpirySettings {
    fn default() -> Self {
        Self {
            enabled: true,
            initial_delay: DEFAULT_INITIAL_DELAY,
            period: DEFAULT_PERIOD,
            lookahead_window: DEFAULT_LOOKAHEAD_WINDOW,
            stop_timeout: DEFAULT_STOP_TIMEOUT,
        }
    }
}

impl ExpirySettings {
    /// Settings consumed by the trade service.
    #[must_use]
    pub const fn service_config(&self) -> TradeServiceConfig {
        TradeServiceConfig {
            lookahead_window: self.lookahead_window,
            stop_timeout: self.stop_timeout,
        }
    }
}

/// Complete trade store configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TradeStoreConfig {
    /// Expiry process settings.
    pub expiry: ExpirySettings,
}

impl TradeStoreConfig {
    /// Create configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a value is present but unusable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary key lookup.
    ///
    /// Missing or unparseable values fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the expiry period is zero.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ExpirySettings::default();

        let expiry = ExpirySettings {
            enabled: lookup("TRADE_EXPIRY_ENABLED")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(defaults.enabled),
            initial_delay: parse_duration_secs(
                &lookup,
                "TRADE_EXPIRY_INITIAL_DELAY_SECS",
                defaults.initial_delay,
            ),
            period: parse_duration_secs(&lookup, "TRADE_EXPIRY_PERIOD_SECS", defaults.period),
            lookahead_window: parse_duration_millis(
                &lookup,
                "TRADE_EXPIRY_LOOKAHEAD_MS",
                defaults.lookahead_window,
            ),
            stop_timeout: parse_duration_secs(
                &lookup,
                "TRADE_EXPIRY_STOP_TIMEOUT_SECS",
                defaults.stop_timeout,
            ),
        };

        if expiry.period.is_zero() {
            return Err(ConfigError::InvalidValue {
                key: "TRADE_EXPIRY_PERIOD_SECS".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }

        Ok(Self { expiry })
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A value was present but cannot be used.
    #[error("invalid value for {key}: {message}")]
    InvalidValue {
        /// Environment variable name.
        key: String,
        /// Error message.
        message: String,
    },
}

fn parse_duration_secs<F>(lookup: &F, key: &str, default: Duration) -> Duration
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map_or(default, Duration::from_secs)
}

fn parse_duration_millis<F>(lookup: &F, key: &str, default: Duration) -> Duration
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map_or(default, Duration::from_millis)
}
