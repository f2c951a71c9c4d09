//! Error types for the reading tracker
//!
//! This module defines error types using thiserror for ergonomic error handling.
//! Errors are grouped by the layer that raises them (request validation,
//! storage, configuration) so the HTTP layer can map each one to a status code.
//!
//! ## Taxonomy
//!
//! - `NotFound` - a requested record does not exist (404)
//! - `Validation` - malformed request body or query string (422)
//! - `Conflict` - uniqueness or foreign-key violation in the store (409)
//! - everything else - storage, IO or internal failures (500)

use thiserror::Error;

/// Result type alias using our TrackerError type
pub type Result<T> = std::result::Result<T, TrackerError>;

/// Main error type for the reading tracker
#[derive(Error, Debug)]
pub enum TrackerError {
    // ===== Request Errors =====

    /// Requested record does not exist
    #[error("{0}")]
    NotFound(String),

    /// Request body or query string failed shape validation
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Store rejected a write because of a uniqueness or foreign-key constraint
    #[error("Conflict: {0}")]
    Conflict(String),

    // ===== Database Errors =====

    /// Database schema migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    // ===== Configuration/State Errors =====

    /// Configuration value is invalid
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Generic file I/O error with path context
    #[error("File I/O error: {0}")]
    FileIoError(String),

    /// Internal error that should not normally occur
    #[error("Internal error: {0}")]
    InternalError(String),

    // ===== External Library Errors =====

    /// Database driver error from sqlx
    #[error("Database error: {0}")]
    SqlxError(#[source] sqlx::Error),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

// Constraint violations surface as Conflict, everything else stays a driver error
impl From<sqlx::Error> for TrackerError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() || db_err.is_foreign_key_violation() {
                return TrackerError::Conflict(db_err.message().to_string());
            }
        }
        TrackerError::SqlxError(err)
    }
}

// Helper methods for creating common errors
impl TrackerError {
    /// Create a NotFound error with a message
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        TrackerError::NotFound(message.into())
    }

    /// Create a Validation error with a message
    pub fn validation<S: Into<String>>(message: S) -> Self {
        TrackerError::Validation(message.into())
    }

    /// Create a Conflict error with a message
    pub fn conflict<S: Into<String>>(message: S) -> Self {
        TrackerError::Conflict(message.into())
    }

    /// Create an InternalError with a message
    pub fn internal<S: Into<String>>(message: S) -> Self {
        TrackerError::InternalError(message.into())
    }

    /// HTTP status code this error maps to
    pub fn status_code(&self) -> u16 {
        match self {
            TrackerError::NotFound(_) => 404,
            TrackerError::Validation(_) => 422,
            TrackerError::Conflict(_) => 409,
            _ => 500,
        }
    }

    /// Check if the caller caused this error (4xx)
    ///
    /// Client errors are logged at `warn`, server errors at `error`.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            TrackerError::NotFound(_) | TrackerError::Validation(_) | TrackerError::Conflict(_)
        )
    }

    /// Get a message suitable for returning to API callers
    ///
    /// Server-side failures are reduced to a generic message so driver
    /// details and file paths are not leaked.
    pub fn user_message(&self) -> String {
        match self {
            TrackerError::NotFound(message) => message.clone(),
            TrackerError::Validation(message) => message.clone(),
            TrackerError::Conflict(message) => {
                format!("Request conflicts with existing data: {}", message)
            }
            _ => "Internal server error".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(TrackerError::not_found("No users found").status_code(), 404);
        assert_eq!(TrackerError::validation("missing field").status_code(), 422);
        assert_eq!(TrackerError::conflict("duplicate").status_code(), 409);
        assert_eq!(TrackerError::internal("boom").status_code(), 500);
    }

    #[test]
    fn test_user_message_hides_internal_details() {
        let err = TrackerError::FileIoError("/secret/path/books.db".to_string());
        assert_eq!(err.user_message(), "Internal server error");
        assert!(!err.is_client_error());

        let err = TrackerError::not_found("No users found");
        assert_eq!(err.user_message(), "No users found");
        assert!(err.is_client_error());
    }
}
