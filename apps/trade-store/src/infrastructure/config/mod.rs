//! Configuration Module
//!
//! Configuration loading for the trade store.

mod settings;

pub use settings::{ConfigError, ExpirySettings, TradeStoreConfig};
