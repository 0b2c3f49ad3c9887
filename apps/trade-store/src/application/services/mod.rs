//! Application Services
//!
//! The trade service handles submissions and listing. The expiry process
//! runs as a background task owned by the trade service.

mod expiry_process;
mod trade_service;

pub use expiry_process::{
    DEFAULT_LOOKAHEAD_WINDOW, ExpiryError, ExpiryProcess, ExpirySchedule, StopOutcome, run_expiry,
};
pub use trade_service::{SubmitOutcome, TradeService, TradeServiceConfig, TradeServiceError};
