//! Tracing Setup
//!
//! Installs a `tracing-subscriber` formatter filtered by `RUST_LOG`.
//!
//! # Usage
//!
//! ```ignore
//! use trade_store::infrastructure::telemetry;
//!
//! telemetry::init();
//! tracing::info!("Trade store starting");
//! ```

use tracing_subscriber::EnvFilter;

/// Directive applied on top of `RUST_LOG`.
const DEFAULT_DIRECTIVE: &str = "trade_store=info";

/// Build the environment filter used by [`init`].
///
/// Uses a static directive string that is a compile-time constant guaranteed to parse.
#[must_use]
#[allow(clippy::expect_used)]
pub fn env_filter() -> EnvFilter {
    EnvFilter::from_default_env().add_directive(
        DEFAULT_DIRECTIVE
            .parse()
            .expect("static directive 'trade_store=info' is valid"),
    )
}

/// Initialize the global tracing subscriber.
///
/// Safe to call more than once; later calls leave the first subscriber in place.
pub fn init() {
    if tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .try_init()
        .is_err()
    {
        tracing::debug!("Tracing subscriber already installed");
    }
}
