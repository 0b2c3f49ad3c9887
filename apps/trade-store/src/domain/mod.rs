//! Domain Layer
//!
//! Business logic with no infrastructure dependencies:
//!
//! - **Aggregates**: the versioned `Trade`
//! - **Value Objects**: identity keys and timestamps
//! - **Domain Services**: validation rules and their chain
//! - **Repository Traits**: storage abstractions (implemented in adapters)
//!
//! # Bounded Contexts
//!
//! - [`trade`]: Trade records and version history storage
//! - [`validation`]: Acceptance rules for submitted trades

pub mod shared;
pub mod trade;
pub mod validation;
