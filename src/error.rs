//!
//! # Application Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the
//! application. It centralizes error management, providing a consistent way to
//! represent the failure kinds the service distinguishes: bad input, uniqueness
//! conflicts, missing (or inaccessible) entities, failed authentication, denied
//! authorization, and storage or mail-transport trouble.
//!
//! `AppError` implements `actix_web::error::ResponseError` so handlers can return
//! `Result<_, AppError>` and have failures rendered as JSON responses with the
//! right status code. `From` implementations for `sqlx::Error`,
//! `validator::ValidationErrors`, `jsonwebtoken::errors::Error`, and
//! `bcrypt::BcryptError` allow conversion using the `?` operator.

use actix_web::{error::ResponseError, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Represents all failure kinds that can occur within the application.
///
/// Each variant carries a message detailing the issue and maps to a specific
/// HTTP status code at the boundary.
#[derive(Debug)]
pub enum AppError {
    /// Input failed business validation (HTTP 400).
    Validation(String),
    /// A uniqueness constraint would be violated, e.g. registering an
    /// already-taken email (HTTP 409).
    Conflict(String),
    /// The requested entity does not exist — or belongs to someone else, which
    /// is deliberately indistinguishable (HTTP 404).
    NotFound(String),
    /// Credentials or bearer token did not check out (HTTP 401).
    Authentication(String),
    /// The caller is authenticated but lacks the required role (HTTP 403).
    Forbidden(String),
    /// A storage operation failed; wraps the underlying cause (HTTP 500).
    Database(String),
    /// Outbound mail could not be sent (HTTP 500).
    Email(String),
    /// Any other unexpected server-side failure (HTTP 500).
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "Validation Error: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::Authentication(msg) => write!(f, "Authentication Error: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::Database(msg) => write!(f, "Database Error: {}", msg),
            AppError::Email(msg) => write!(f, "Email Error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

/// Converts `AppError` variants into `HttpResponse` objects.
///
/// This lets Actix Web translate `AppError` results from handlers into the
/// correct HTTP status codes and JSON error bodies. Storage and mail failures
/// are presented to the client as a generic internal error; the detail stays in
/// the server log.
impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Validation(msg) => HttpResponse::BadRequest().json(json!({
                "error": msg
            })),
            AppError::Conflict(msg) => HttpResponse::Conflict().json(json!({
                "error": msg
            })),
            AppError::NotFound(msg) => HttpResponse::NotFound().json(json!({
                "error": msg
            })),
            AppError::Authentication(msg) => HttpResponse::Unauthorized().json(json!({
                "error": msg
            })),
            AppError::Forbidden(msg) => HttpResponse::Forbidden().json(json!({
                "error": msg
            })),
            AppError::Database(_) | AppError::Email(_) => HttpResponse::InternalServerError()
                .json(json!({
                    "error": "internal server error"
                })),
            AppError::Internal(msg) => HttpResponse::InternalServerError().json(json!({
                "error": msg
            })),
        }
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// `sqlx::Error::RowNotFound` is mapped to `AppError::NotFound`; everything
/// else becomes `AppError::Database`.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            _ => AppError::Database(error.to_string()),
        }
    }
}

/// Converts `validator::ValidationErrors` into `AppError::Validation`,
/// preserving the detailed field messages.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::Validation(error.to_string())
    }
}

/// Converts `jsonwebtoken::errors::Error` into `AppError::Authentication`.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        AppError::Authentication(error.to_string())
    }
}

/// Converts `bcrypt::BcryptError` into `AppError::Internal`.
///
/// Hashing a fresh password should never fail; if it does, it is a server
/// problem, not a client one.
impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::Internal(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_responses() {
        let error = AppError::Validation("title length must be 3-100".into());
        assert_eq!(error.error_response().status(), 400);

        let error = AppError::Authentication("invalid email or password".into());
        assert_eq!(error.error_response().status(), 401);

        let error = AppError::Forbidden("admin access required".into());
        assert_eq!(error.error_response().status(), 403);

        let error = AppError::NotFound("Task not found".into());
        assert_eq!(error.error_response().status(), 404);

        let error = AppError::Conflict("email already exists".into());
        assert_eq!(error.error_response().status(), 409);

        let error = AppError::Database("connection refused".into());
        assert_eq!(error.error_response().status(), 500);

        let error = AppError::Email("relay unreachable".into());
        assert_eq!(error.error_response().status(), 500);
    }

    #[test]
    fn test_sqlx_row_not_found_maps_to_not_found() {
        let error: AppError = sqlx::Error::RowNotFound.into();
        assert!(matches!(error, AppError::NotFound(_)));
    }
}
