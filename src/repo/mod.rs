//! Data-access layer.
//!
//! Repositories own a cloned pool handle and are the only place SQL lives.
//! Every task predicate carries the owner scope and the soft-delete filter;
//! callers cannot forget them. Storage failures are logged once here and
//! surfaced as `AppError::Database`, while "no such row" stays a `None`.

pub mod reset_tokens;
pub mod tasks;
pub mod users;

pub use reset_tokens::ResetTokenRepo;
pub use tasks::TaskRepo;
pub use users::UserRepo;

use crate::error::AppError;

/// Logs a storage failure at the repository boundary and wraps it.
pub(crate) fn storage_error(context: &str, error: sqlx::Error) -> AppError {
    log::error!("database error while {}: {}", context, error);
    AppError::from(error)
}

/// True when the error is a uniqueness-constraint violation.
pub(crate) fn is_unique_violation(error: &sqlx::Error) -> bool {
    matches!(error, sqlx::Error::Database(db) if db.is_unique_violation())
}
