//! Exercise tracker API routes

use crate::error::ApiError;
use crate::extract::FormOrJson;
use crate::repositories::ExerciseEntry;
use crate::services::exercise::{ExerciseLogService, LogFilter};
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use exercise_tracker_shared::types::{
    AddExerciseRequest, ExerciseResponse, LogQuery, LogResponse, NewUserRequest,
    UserDocumentResponse, UserResponse,
};
use uuid::Uuid;

/// Create exercise routes
pub fn exercise_routes() -> Router<AppState> {
    Router::new()
        .route("/new-user", post(create_user))
        .route("/users", get(list_users))
        .route("/add", post(add_exercise))
        .route("/log", get(get_log))
}

/// POST /api/exercise/new-user - Create a user
async fn create_user(
    State(state): State<AppState>,
    FormOrJson(req): FormOrJson<NewUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = ExerciseLogService::create_user(state.db(), &req.username).await?;

    Ok(Json(UserResponse {
        username: user.username,
        id: user.id.to_string(),
    }))
}

/// GET /api/exercise/users - List every user
async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = ExerciseLogService::list_users(state.db()).await?;

    let response = users
        .into_iter()
        .map(|user| UserResponse {
            username: user.username,
            id: user.id.to_string(),
        })
        .collect();

    Ok(Json(response))
}

/// POST /api/exercise/add - Append an exercise to a user's log
///
/// Returns the full updated user document, unlike the other endpoints
/// which return shaped subsets.
async fn add_exercise(
    State(state): State<AppState>,
    FormOrJson(req): FormOrJson<AddExerciseRequest>,
) -> Result<Json<UserDocumentResponse>, ApiError> {
    let user_id = parse_user_id(req.user_id.as_deref())?;
    let date = non_empty(req.date.as_deref()).map(parse_date).transpose()?;

    let user =
        ExerciseLogService::add_exercise(state.db(), user_id, req.description, req.duration, date)
            .await?;

    Ok(Json(UserDocumentResponse {
        id: user.id.to_string(),
        username: user.username,
        exercises: user.exercises.0.into_iter().map(convert_entry).collect(),
    }))
}

/// GET /api/exercise/log - Query a user's exercise log
async fn get_log(
    State(state): State<AppState>,
    Query(query): Query<LogQuery>,
) -> Result<Json<LogResponse>, ApiError> {
    let user_id = parse_user_id(query.user_id.as_deref())?;
    let filter = LogFilter {
        from: non_empty(query.from.as_deref()).map(parse_date).transpose()?,
        to: non_empty(query.to.as_deref()).map(parse_date).transpose()?,
        limit: query.limit,
    };

    let exercises = ExerciseLogService::query_log(state.db(), user_id, filter).await?;

    Ok(Json(LogResponse {
        count: exercises.len(),
        exercises: exercises.into_iter().map(convert_entry).collect(),
    }))
}

// Helper functions

/// Browser form posts send empty strings for untouched fields; treat them
/// as absent.
fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

/// A missing id field resolves to no user; a malformed one is a
/// store-level validation failure.
fn parse_user_id(raw: Option<&str>) -> Result<Uuid, ApiError> {
    let raw = raw.ok_or(ApiError::UserNotFound)?;
    Uuid::parse_str(raw).map_err(|_| ApiError::Validation(format!("invalid user id: {raw}")))
}

/// Accepts RFC 3339 timestamps or bare YYYY-MM-DD dates, read as
/// midnight UTC
fn parse_date(raw: &str) -> Result<DateTime<Utc>, ApiError> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
        .map_err(|_| ApiError::Validation(format!("invalid date: {raw}")))
}

fn convert_entry(entry: ExerciseEntry) -> ExerciseResponse {
    ExerciseResponse {
        description: entry.description,
        duration: entry.duration,
        date: entry.date,
    }
}
