//! API request and response types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Body of POST /api/exercise/new-user
#[derive(Debug, Clone, Deserialize)]
pub struct NewUserRequest {
    pub username: String,
}

/// Body of POST /api/exercise/add
///
/// `duration` goes through numeric coercion instead of strict decoding:
/// form posts always carry it as a string, and the store keeps whatever
/// the coercion produced, null included.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddExerciseRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    pub description: String,
    #[serde(default, deserialize_with = "coerce_duration")]
    pub duration: Option<f64>,
    #[serde(default)]
    pub date: Option<String>,
}

/// Query string of GET /api/exercise/log
///
/// The id parameter is spelled `userID` on this endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct LogQuery {
    #[serde(rename = "userID", default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub limit: Option<i64>,
}

/// User identity, returned by user creation and the user listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub username: String,
    pub id: String,
}

/// One exercise entry as it appears on the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseResponse {
    pub description: String,
    pub duration: Option<f64>,
    pub date: DateTime<Utc>,
}

/// Full user document, returned by POST /api/exercise/add
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDocumentResponse {
    pub id: String,
    pub username: String,
    pub exercises: Vec<ExerciseResponse>,
}

/// Response of GET /api/exercise/log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogResponse {
    pub count: usize,
    pub exercises: Vec<ExerciseResponse>,
}

/// Domain error payload, carried in a successful transport response.
/// Callers detect these by inspecting the body, not the status code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Coerce `duration` to a number: JSON numbers pass through, numeric
/// strings parse, anything else becomes null. Never rejects.
fn coerce_duration<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;

    Ok(match raw {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(r#"{"userId":"abc","description":"run","duration":60}"#, Some(60.0))]
    #[case(r#"{"userId":"abc","description":"run","duration":"45"}"#, Some(45.0))]
    #[case(r#"{"userId":"abc","description":"run","duration":" 12.5 "}"#, Some(12.5))]
    #[case(r#"{"userId":"abc","description":"run","duration":"soon"}"#, None)]
    #[case(r#"{"userId":"abc","description":"run","duration":null}"#, None)]
    #[case(r#"{"userId":"abc","description":"run"}"#, None)]
    fn duration_is_coerced_not_rejected(#[case] body: &str, #[case] expected: Option<f64>) {
        let req: AddExerciseRequest = serde_json::from_str(body).unwrap();
        assert_eq!(req.duration, expected);
    }

    #[test]
    fn add_request_fields_are_camel_case() {
        let req: AddExerciseRequest = serde_json::from_str(
            r#"{"userId":"u1","description":"swim","duration":"30","date":"2019-01-01"}"#,
        )
        .unwrap();

        assert_eq!(req.user_id.as_deref(), Some("u1"));
        assert_eq!(req.date.as_deref(), Some("2019-01-01"));
    }

    #[test]
    fn log_query_id_parameter_is_user_id_uppercase() {
        let query: LogQuery =
            serde_json::from_str(r#"{"userID":"u1","limit":2}"#).unwrap();

        assert_eq!(query.user_id.as_deref(), Some("u1"));
        assert_eq!(query.limit, Some(2));
        assert!(query.from.is_none());
    }

    #[test]
    fn exercise_response_serializes_null_duration() {
        let entry = ExerciseResponse {
            description: "yoga".to_string(),
            duration: None,
            date: "2019-01-01T00:00:00Z".parse().unwrap(),
        };

        let json = serde_json::to_value(&entry).unwrap();
        assert!(json.get("duration").unwrap().is_null());
    }
}
