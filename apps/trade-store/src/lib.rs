// Allow unwrap/expect in tests - tests should panic on unexpected errors
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::items_after_statements
    )
)]

//! Trade Store - Versioned In-Memory Trade Repository
//!
//! Stores every version of a trade, rejects submissions that fail business
//! rules and flags trades as expired shortly before they mature.
//!
//! # Architecture (Clean Architecture + DDD + Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Core business logic
//!   - `trade`: Trade aggregate, identity key, repository trait
//!   - `validation`: Maturity and version rules, validator chain
//!
//! - **Application**: Orchestration
//!   - `services`: `TradeService` (submit, list) and the background expiry process
//!
//! - **Infrastructure**: Adapters
//!   - `persistence`: Ordered in-memory repository
//!   - `config`: Environment-driven settings
//!   - `telemetry`: Tracing subscriber setup

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Clean Architecture Layers
// =============================================================================

/// Domain layer - Core business logic with no external dependencies.
pub mod domain;

/// Application layer - Trade service and expiry scheduling.
pub mod application;

/// Infrastructure layer - Storage, configuration and tracing.
pub mod infrastructure;

// =============================================================================
// Re-exports from Clean Architecture
// =============================================================================

// Domain re-exports
pub use domain::shared::{EpochMillis, Timestamp};
pub use domain::trade::{
    CreateTradeCommand, RepositoryError, Trade, TradeError, TradeKey, TradeRepository,
};
pub use domain::validation::{
    MaturityDateValidator, TradeValidator, ValidationError, ValidatorChain, VersionValidator,
};

// Application re-exports
pub use application::services::{
    ExpiryError, SubmitOutcome, TradeService, TradeServiceConfig, TradeServiceError,
};

// Infrastructure re-exports
pub use infrastructure::config::{ConfigError, ExpirySettings, TradeStoreConfig};
pub use infrastructure::persistence::InMemoryTradeRepository;
