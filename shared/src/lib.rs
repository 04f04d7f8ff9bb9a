//! Exercise Tracker Shared Library
//!
//! This crate contains the wire types used across the backend and any
//! API clients.

pub mod types;

// Re-export commonly used items
pub use types::*;
