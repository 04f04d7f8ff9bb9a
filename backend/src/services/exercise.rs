//! Exercise log service
//!
//! Business logic for the four exposed operations:
//! - User creation with the username uniqueness check
//! - User listing
//! - Exercise append (read-modify-write of the user document)
//! - Log query with the single-pass date/limit filter

use crate::error::ApiError;
use crate::repositories::{ExerciseEntry, UserRecord, UserRepository, UserSummary};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Filter window for a log query
#[derive(Debug, Clone, Copy, Default)]
pub struct LogFilter {
    /// Inclusive lower bound on the entry date
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on the entry date
    pub to: Option<DateTime<Utc>>,
    /// Cap on the number of accepted entries
    pub limit: Option<i64>,
}

/// Exercise log service
pub struct ExerciseLogService;

impl ExerciseLogService {
    /// Create a user, enforcing username uniqueness.
    ///
    /// The existence check and the insert are two separate store round
    /// trips with no transaction between them; the unique index on
    /// `username` catches a concurrent insert that wins the race, and the
    /// resulting conflict maps to the same duplicate-user error.
    pub async fn create_user(pool: &PgPool, username: &str) -> Result<UserRecord, ApiError> {
        if UserRepository::username_exists(pool, username)
            .await
            .map_err(ApiError::Internal)?
        {
            return Err(ApiError::DuplicateUser);
        }

        match UserRepository::create(pool, username).await {
            Ok(user) => Ok(user),
            Err(err) if is_unique_violation(&err) => Err(ApiError::DuplicateUser),
            Err(err) => Err(ApiError::Internal(err)),
        }
    }

    /// List every user's identity
    pub async fn list_users(pool: &PgPool) -> Result<Vec<UserSummary>, ApiError> {
        UserRepository::list(pool).await.map_err(ApiError::Internal)
    }

    /// Append one exercise to a user's log and return the updated
    /// document. The date defaults to the time of the call.
    pub async fn add_exercise(
        pool: &PgPool,
        user_id: Uuid,
        description: String,
        duration: Option<f64>,
        date: Option<DateTime<Utc>>,
    ) -> Result<UserRecord, ApiError> {
        let user = UserRepository::find_by_id(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or(ApiError::UserNotFound)?;

        let mut exercises = user.exercises.0;
        exercises.push(ExerciseEntry {
            description,
            duration,
            date: date.unwrap_or_else(Utc::now),
        });

        UserRepository::save_exercises(pool, user_id, &exercises)
            .await
            .map_err(ApiError::Internal)?
            .ok_or(ApiError::UserNotFound)
    }

    /// Query a user's log through the date/limit filter
    pub async fn query_log(
        pool: &PgPool,
        user_id: Uuid,
        filter: LogFilter,
    ) -> Result<Vec<ExerciseEntry>, ApiError> {
        let user = UserRepository::find_by_id(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or(ApiError::UserNotFound)?;

        Ok(Self::filter_log(&user.exercises.0, filter))
    }

    /// Single pass over the stored sequence, in stored order.
    ///
    /// An entry is accepted when it passes both date bounds and fewer
    /// than `limit` entries have been accepted so far. The cap is
    /// evaluated per entry during the pass, not as a slice of the
    /// filtered list, so a limit of zero or less accepts nothing.
    pub fn filter_log(entries: &[ExerciseEntry], filter: LogFilter) -> Vec<ExerciseEntry> {
        let mut accepted = Vec::new();

        for entry in entries {
            let after_from = filter.from.map_or(true, |from| from <= entry.date);
            let before_to = filter.to.map_or(true, |to| to >= entry.date);
            let under_cap = filter
                .limit
                .map_or(true, |limit| (accepted.len() as i64) < limit);

            if after_from && before_to && under_cap {
                accepted.push(entry.clone());
            }
        }

        accepted
    }
}

/// True when the error is the store rejecting a duplicate key
fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .and_then(|err| err.as_database_error())
        .map(|db_err| db_err.is_unique_violation())
        .unwrap_or(false)
}
