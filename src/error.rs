use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

use crate::validation::ValidationError;

/// Closed set of request-level failures. Handlers and services return these;
/// `IntoResponse` below is the only place they become HTTP.
#[derive(Debug)]
pub enum AppError {
    Validation(ValidationError),
    DuplicateLike,
    UserAlreadyExists,
    UserNotFound,
    PostNotFound,
    Database(sqlx::Error),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(err) => write!(f, "Validation error: {}", err),
            AppError::DuplicateLike => write!(f, "You have already liked this post"),
            AppError::UserAlreadyExists => write!(f, "User already registered"),
            AppError::UserNotFound => write!(f, "User not found"),
            AppError::PostNotFound => write!(f, "Post not found"),
            AppError::Database(err) => write!(f, "Database error: {}", err),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // statusCode/message/error is the stable wire shape; clients key off it.
        let (status, message, error) = match &self {
            AppError::Validation(err) => {
                (StatusCode::BAD_REQUEST, err.to_string(), "ValidationError".to_string())
            }
            AppError::DuplicateLike => (
                StatusCode::CONFLICT,
                "You have already liked this post".to_string(),
                "DuplicateLikeError".to_string(),
            ),
            AppError::UserAlreadyExists => (
                StatusCode::CONFLICT,
                "User already registered".to_string(),
                "UserAlreadyExistsError".to_string(),
            ),
            AppError::UserNotFound => (
                StatusCode::NOT_FOUND,
                "User not found".to_string(),
                "UserNotFoundError".to_string(),
            ),
            AppError::PostNotFound => (
                StatusCode::NOT_FOUND,
                "Post not found".to_string(),
                "PostNotFoundError".to_string(),
            ),
            AppError::Database(err) => {
                tracing::error!("Database error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    err.to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    msg.clone(),
                )
            }
        };

        let body = Json(json!({
            "statusCode": status.as_u16(),
            "message": message,
            "error": error
        }));

        (status, body).into_response()
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err)
    }
}

pub type AppResult<T> = Result<T, AppError>;
