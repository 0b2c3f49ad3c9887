//! Persistence Adapters
//!
//! Storage implementations of repository traits.

pub mod in_memory;

pub use in_memory::InMemoryTradeRepository;
