//! Trade Validation
//!
//! Business rules a trade must pass before it is stored.
//!
//! Rules implement [`TradeValidator`] and are composed into a
//! [`ValidatorChain`] at construction time. The chain is fail-fast: the first
//! rejection is returned and later rules are skipped.

pub mod errors;
pub mod maturity_date;
pub mod validator;
pub mod version;

pub use errors::ValidationError;
pub use maturity_date::MaturityDateValidator;
pub use validator::{TradeValidator, ValidatorChain};
pub use version::VersionValidator;
