//! Error types for the payment code service.

use crate::ports::DeliveryError;

/// Domain-level errors (business rule violations).
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Inquiry transaction already exists: {0}")]
    DuplicateTransaction(String),

    #[error("No inquiry for transaction: {0}")]
    TransactionNotFound(String),

    #[error("{0}")]
    ValidationError(String),
}

impl DomainError {
    /// Validation error for a required field that is absent or blank.
    pub fn missing_field(field: &str) -> Self {
        DomainError::ValidationError(format!("field '{}' is required", field))
    }
}

/// Repository-level errors (data access failures).
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Conflict: {0}")]
    Conflict(String),
}

/// Application-level errors (for HTTP responses).
///
/// Maps cleanly to HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Transaction ID already used: {0}")]
    DuplicateTransaction(String),

    #[error("Transaction ID not found: {0}")]
    TransactionNotFound(String),

    /// The state change was persisted but the downstream signal failed.
    #[error("Delivery failed: {0}")]
    Delivery(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::DuplicateTransaction(id) => AppError::DuplicateTransaction(id),
            DomainError::TransactionNotFound(id) => AppError::TransactionNotFound(id),
            DomainError::ValidationError(msg) => AppError::BadRequest(msg),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Domain(e) => e.into(),
            RepoError::NotFound => AppError::NotFound("Resource not found".into()),
            RepoError::Database(e) => AppError::Internal(e),
            RepoError::Conflict(e) => AppError::BadRequest(e),
        }
    }
}

impl From<DeliveryError> for AppError {
    fn from(err: DeliveryError) -> Self {
        AppError::Delivery(err.to_string())
    }
}
