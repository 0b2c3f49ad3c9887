//! Infrastructure Layer
//!
//! Adapters and process-level plumbing:
//!
//! - `persistence`: Trade repository implementations
//! - `config`: Environment-driven configuration
//! - `telemetry`: Tracing subscriber setup

pub mod config;
pub mod persistence;
pub mod telemetry;
