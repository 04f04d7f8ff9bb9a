//! User repository for store operations
//!
//! Users are stored as whole documents: one row per user with the
//! exercise sequence embedded as a JSONB array. Appending an exercise is
//! a read-modify-write of the document; concurrent writers are not
//! serialized and the last write wins.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

/// One exercise entry inside a user's embedded log.
///
/// Entries keep insertion order, which is not necessarily date order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseEntry {
    pub description: String,
    pub duration: Option<f64>,
    pub date: DateTime<Utc>,
}

/// User document from the store
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub username: String,
    pub exercises: Json<Vec<ExerciseEntry>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Projection used by the user listing
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
}

/// User repository for store operations
pub struct UserRepository;

impl UserRepository {
    /// Insert a new user with an empty exercise log
    pub async fn create(pool: &PgPool, username: &str) -> Result<UserRecord> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (username)
            VALUES ($1)
            RETURNING id, username, exercises, created_at, updated_at
            "#,
        )
        .bind(username)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Check if a username is taken
    pub async fn username_exists(pool: &PgPool, username: &str) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)
            "#,
        )
        .bind(username)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }

    /// Find a user document by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, username, exercises, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// List every user's identity, in store-native enumeration order
    pub async fn list(pool: &PgPool) -> Result<Vec<UserSummary>> {
        let users = sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT id, username
            FROM users
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(users)
    }

    /// Replace a user's exercise sequence and return the updated document.
    ///
    /// Returns None if the user disappeared between fetch and save.
    pub async fn save_exercises(
        pool: &PgPool,
        id: Uuid,
        exercises: &[ExerciseEntry],
    ) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            UPDATE users
            SET exercises = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, username, exercises, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(Json(exercises))
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }
}
