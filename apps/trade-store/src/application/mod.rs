//! Application Layer
//!
//! Orchestrates domain logic:
//!
//! - **Services**: trade submission and the background expiry process

pub mod services;

pub use services::*;
