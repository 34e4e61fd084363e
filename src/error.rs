// src/error.rs

use thiserror::Error;

use crate::models::account::Role;

/// Global Application Error Enum.
/// Every core operation returns this; the console decides how to present it.
#[derive(Debug, Error)]
pub enum AppError {
    /// The store could not be reached (startup, pool timeout, I/O).
    #[error("connection failure: {0}")]
    ConnectionFailure(String),

    /// Schema bootstrap failed.
    #[error("schema bootstrap failed: {0}")]
    Schema(String),

    /// The (username, role) pair is already registered.
    #[error("username '{username}' is already registered as {role}")]
    DuplicateIdentity { username: String, role: Role },

    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// Malformed input, rejected before any store call.
    #[error("validation failure: {0}")]
    ValidationFailure(String),

    /// Any other store failure, passed through verbatim.
    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl AppError {
    /// Whether retrying the call might succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, AppError::ConnectionFailure(_))
    }
}

/// Classifies `sqlx::Error` so `?` can be used on queries.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                AppError::ConnectionFailure(err.to_string())
            }
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::ConstraintViolation(db_err.message().to_string())
            }
            sqlx::Error::Database(db_err) if db_err.is_check_violation() => {
                AppError::ConstraintViolation(db_err.message().to_string())
            }
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                AppError::NotFound(db_err.message().to_string())
            }
            _ => AppError::Database(err),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        AppError::Schema(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationFailure(err.to_string())
    }
}
