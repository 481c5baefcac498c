//! Student service errors

use thiserror::Error;

use crate::storage::StoreError;

/// Result type for student service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors the student service reports to its caller.
///
/// Cache failures never show up here; they are absorbed by the service.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// No student with this id
    #[error("Student not found with id: {0}")]
    NotFound(i64),

    /// The record store failed
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            // a concurrent delete won the race
            StoreError::Missing(id) => ServiceError::NotFound(id),
            other => ServiceError::Store(other),
        }
    }
}
