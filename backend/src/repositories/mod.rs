//! Database repositories
//!
//! Provides document-style data access to the user store.

pub mod user;

pub use user::{ExerciseEntry, UserRecord, UserRepository, UserSummary};
