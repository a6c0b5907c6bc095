//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the application.
//! Every handler and store operation returns `Result<_, AppError>`, so the whole request
//! path can use the `?` operator and end in one consistent JSON error body.
//!
//! The body always carries a stable machine-readable `code` (`validation`, `conflict`,
//! `unauthenticated`, `not_found`, `internal`) next to a human-readable `error` message.
//! Internal and database failures are logged here and replaced by a generic message, so
//! store details never reach the caller.

use actix_web::{
    error::{BlockingError, ResponseError},
    http::{header, StatusCode},
    HttpResponse,
};
use serde_json::{json, Value};
use std::fmt;
use validator::ValidationErrors;

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// Malformed or missing input (HTTP 422). Carries field-level details.
    ValidationError(Value),
    /// The request collides with existing state, e.g. an already registered email (HTTP 409).
    Conflict(String),
    /// Missing, invalid or expired token, or rejected login credentials (HTTP 401).
    Unauthorized(String),
    /// The entity does not exist or is not owned by the caller (HTTP 404).
    /// The two cases are deliberately indistinguishable.
    NotFound(String),
    /// An unexpected server-side fault (HTTP 500).
    InternalServerError(String),
    /// A failure reported by the store (HTTP 500).
    DatabaseError(String),
}

impl AppError {
    /// Builds a validation error with a single message attached to `field`.
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        let mut details = serde_json::Map::new();
        details.insert(
            field.to_string(),
            json!([{ "message": message.into() }]),
        );
        AppError::ValidationError(Value::Object(details))
    }

    /// The stable error code sent to clients.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "validation",
            AppError::Conflict(_) => "conflict",
            AppError::Unauthorized(_) => "unauthenticated",
            AppError::NotFound(_) => "not_found",
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => "internal",
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::ValidationError(details) => write!(f, "Validation Error: {}", details),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Converts `AppError` variants into `HttpResponse` objects.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        let body = match self {
            AppError::ValidationError(details) => json!({
                "code": self.code(),
                "error": "Validation failed",
                "details": details
            }),
            AppError::Unauthorized(msg) => {
                builder.insert_header((header::WWW_AUTHENTICATE, "Bearer"));
                json!({ "code": self.code(), "error": msg })
            }
            AppError::Conflict(msg) | AppError::NotFound(msg) => {
                json!({ "code": self.code(), "error": msg })
            }
            AppError::InternalServerError(msg) | AppError::DatabaseError(msg) => {
                log::error!("{}", msg);
                json!({ "code": self.code(), "error": "Internal server error" })
            }
        };
        builder.json(body)
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// Unique-constraint violations become `Conflict`; the only unique constraint besides
/// primary keys is `users.email`. A foreign-key violation means the parent row vanished
/// (e.g. the account was deleted while its token is still valid) and becomes `NotFound`.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match &error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::Conflict("Email already registered".into())
            }
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                AppError::NotFound("Related record not found".into())
            }
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(error: sqlx::migrate::MigrateError) -> AppError {
        AppError::DatabaseError(format!("Migration failed: {}", error))
    }
}

/// Converts `validator::ValidationErrors` into `AppError::ValidationError`,
/// keeping the per-field details.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        let details = serde_json::to_value(&error).unwrap_or_else(|_| json!(error.to_string()));
        AppError::ValidationError(details)
    }
}

/// A closure submitted with `web::block` was cancelled or panicked.
impl From<BlockingError> for AppError {
    fn from(error: BlockingError) -> AppError {
        AppError::InternalServerError(format!("Blocking task failed: {}", error))
    }
}
