//! Trade Store Binary
//!
//! Starts the trade store with the standard validator chain and, unless
//! disabled, the background expiry process. Runs until Ctrl+C or SIGTERM.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin trade-store
//! ```
//!
//! # Environment Variables
//!
//! - `TRADE_EXPIRY_ENABLED`: Start the expiry process (default: true)
//! - `TRADE_EXPIRY_INITIAL_DELAY_SECS`: Delay before the first run (default: 3)
//! - `TRADE_EXPIRY_PERIOD_SECS`: Interval between runs, must be > 0 (default: 10)
//! - `TRADE_EXPIRY_LOOKAHEAD_MS`: Maturity look-ahead window (default: 20000)
//! - `TRADE_EXPIRY_STOP_TIMEOUT_SECS`: Shutdown wait for the expiry task (default: 30)
//! - `RUST_LOG`: Log level (default: info)

use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use trade_store::infrastructure::telemetry;
use trade_store::{InMemoryTradeRepository, TradeService, TradeStoreConfig, ValidatorChain};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();
    telemetry::init();

    tracing::info!("Starting trade store");

    let config = TradeStoreConfig::from_env().context("invalid trade store configuration")?;
    let expiry = &config.expiry;
    tracing::info!(
        expiry_enabled = expiry.enabled,
        initial_delay_secs = expiry.initial_delay.as_secs(),
        period_secs = expiry.period.as_secs(),
        lookahead_ms = expiry.lookahead_window.as_millis(),
        "Configuration loaded"
    );

    let repository = Arc::new(InMemoryTradeRepository::new());
    let validators = ValidatorChain::standard();
    tracing::info!(validators = ?validators.names(), "Validator chain ready");

    let service = TradeService::with_config(repository, validators, expiry.service_config());

    if expiry.enabled {
        service
            .start_expiry_process(expiry.initial_delay, expiry.period)
            .await
            .context("failed to start expiry process")?;
    } else {
        tracing::info!("Expiry process disabled");
    }

    shutdown_signal().await;

    service.stop_expiry_process().await;
    tracing::info!(trades = service.list_trades().len(), "Trade store stopped");

    Ok(())
}

/// Load `.env` from the working directory or the nearest ancestor that has one.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }
}
