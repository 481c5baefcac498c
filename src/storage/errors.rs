//! Record store error types
//!
//! Store failures are never recovered by the service layer; they surface
//! to the caller as a 5xx.

use std::io;

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Record store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// The record vanished between lookup and write
    #[error("Student {0} does not exist")]
    Missing(i64),

    /// SQLite reported an error (constraint violation, I/O, corruption)
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// The database file or its directory could not be prepared
    #[error("Store I/O error: {0}")]
    Io(#[from] io::Error),

    /// A thread panicked while holding the store lock
    #[error("Store lock poisoned")]
    Poisoned,
}

impl<T> From<std::sync::PoisonError<T>> for StoreError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        StoreError::Poisoned
    }
}
