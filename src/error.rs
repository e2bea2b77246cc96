//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the service.
//! Every recoverable failure (authentication, validation, missing resources, storage)
//! travels as an `AppError` up to the handler boundary, where the
//! `actix_web::error::ResponseError` implementation turns it into a JSON response.
//!
//! Storage and internal failures are logged with their detail but reported to the
//! client with a generic message. Authentication failures are reported with a single
//! uniform message regardless of the underlying reason.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// The only message an unauthenticated caller ever sees.
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized";

const INTERNAL_MESSAGE: &str = "Internal server error";

/// Represents all possible errors that can occur within the service.
#[derive(Debug)]
pub enum AppError {
    /// Missing or malformed startup configuration. Fatal; surfaced before the server binds.
    Configuration(String),
    /// Authentication failed or is required but missing (HTTP 401).
    Unauthorized(String),
    /// Malformed request (HTTP 400).
    BadRequest(String),
    /// The requested resource does not exist (HTTP 404).
    NotFound(String),
    /// Unexpected server-side error (HTTP 500).
    InternalServerError(String),
    /// Error originating from the storage layer (HTTP 500).
    DatabaseError(String),
    /// Input failed field validation (HTTP 422 Unprocessable Entity).
    /// Carries the per-field detail from the `validator` crate.
    ValidationError(ValidationErrors),
}

impl AppError {
    /// The uniform authentication failure.
    pub fn unauthorized() -> Self {
        AppError::Unauthorized(UNAUTHORIZED_MESSAGE.into())
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Configuration(msg) => write!(f, "Configuration Error: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
            AppError::ValidationError(errors) => write!(f, "Validation Error: {}", errors),
        }
    }
}

impl std::error::Error for AppError {}

/// Converts `AppError` variants into `HttpResponse` objects.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Configuration(_)
            | AppError::InternalServerError(_)
            | AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::Unauthorized(msg) | AppError::BadRequest(msg) | AppError::NotFound(msg) => {
                json!({ "error": msg })
            }
            AppError::ValidationError(errors) => json!({
                "error": "Validation failed",
                "fields": errors
            }),
            // Internal detail stays in the server log.
            AppError::Configuration(msg)
            | AppError::InternalServerError(msg)
            | AppError::DatabaseError(msg) => {
                log::error!("{}", msg);
                json!({ "error": INTERNAL_MESSAGE })
            }
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// `RowNotFound` becomes `NotFound`; everything else is a storage failure.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(error: sqlx::migrate::MigrateError) -> AppError {
        AppError::DatabaseError(format!("Migration failed: {}", error))
    }
}

/// Converts `validator::ValidationErrors` into `AppError::ValidationError`.
impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> AppError {
        AppError::ValidationError(errors)
    }
}
