//! Business logic services
//!
//! Services encapsulate the decision logic between the routes and the
//! repositories: the username uniqueness check and the log filter.

pub mod exercise;

pub use exercise::{ExerciseLogService, LogFilter};
