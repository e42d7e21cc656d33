// src/error.rs

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

use crate::engine::{PoolViolation, ScoreError};

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    // 500 Internal Server Error
    InternalServerError(String),

    // 400 Bad Request
    BadRequest(String),

    // 400 Bad Request, with the broken pool rule in `details`
    Validation(PoolViolation),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict (e.g., concurrent pool replacement hit a unique constraint)
    Conflict(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(v) => write!(f, "Validation({})", v),
            other => write!(f, "{:?}", other),
        }
    }
}

impl std::error::Error for AppError {}

/// Implements `IntoResponse` for `AppError`.
/// Converts the error into a JSON response with appropriate HTTP status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message, details) = match self {
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                    None,
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            AppError::Validation(violation) => {
                let details = json!({
                    "rule": violation.rule(),
                    "questionNumber": violation.question_number(),
                });
                (StatusCode::BAD_REQUEST, violation.to_string(), Some(details))
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg, None),
        };

        let body = match details {
            Some(details) => Json(json!({ "error": error_message, "details": details })),
            None => Json(json!({ "error": error_message })),
        };

        (status, body).into_response()
    }
}

/// Converts `sqlx::Error` into `AppError`.
/// Unique violations (Postgres 23505) become `Conflict`, everything else is a 500.
/// Allows using `?` operator on database queries.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some("23505") {
                return AppError::Conflict(db_err.message().to_string());
            }
        }
        AppError::InternalServerError(err.to_string())
    }
}

/// Malformed or mistyped JSON bodies are answered in the same `{"error"}`
/// shape as every other 400.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PoolViolation> for AppError {
    fn from(violation: PoolViolation) -> Self {
        AppError::Validation(violation)
    }
}

impl From<ScoreError> for AppError {
    fn from(err: ScoreError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}
