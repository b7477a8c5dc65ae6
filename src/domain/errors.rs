//! Domain error types
//!
//! These errors are framework-agnostic and represent business-level failures.

use std::fmt;

#[derive(Debug)]
pub enum DomainError {
    /// Resource not found
    NotFound,
    /// Validation error with message
    Validation(String),
    /// Uniqueness constraint rejected the write (duplicate ISBN)
    Conflict(String),
    /// External metadata provider unreachable or returned garbage
    External(String),
    /// Upload is not a JSON file or not parseable as JSON
    UnsupportedMedia(String),
    /// Database/persistence error
    Database(String),
    /// Generic internal error
    Internal(String),
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::NotFound => write!(f, "Resource not found"),
            DomainError::Validation(msg) => write!(f, "Validation error: {}", msg),
            DomainError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            DomainError::External(msg) => write!(f, "External service error: {}", msg),
            DomainError::UnsupportedMedia(msg) => write!(f, "Unsupported media: {}", msg),
            DomainError::Database(msg) => write!(f, "Database error: {}", msg),
            DomainError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}

// Conversion from SeaORM errors (used in infrastructure layer).
// Unique-constraint violations become Conflict so the API layer can answer 409.
impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        match e.sql_err() {
            Some(sea_orm::SqlErr::UniqueConstraintViolation(msg)) => {
                DomainError::Conflict(format!("unique constraint violated: {}", msg))
            }
            _ => DomainError::Database(e.to_string()),
        }
    }
}
