//! Document store errors
//!
//! Error codes:
//! - DOCSTORE_CONSTRAINT_VIOLATION: a write would duplicate a key
//! - DOCSTORE_NOT_FOUND: the targeted document is no longer present
//! - DOCSTORE_STORAGE_UNAVAILABLE: the backend could not complete the call
//!
//! Nothing is retried; every error surfaces from the call that caused it.

use thiserror::Error;

use crate::storage::StorageError;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Document store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Constraint violation: key '{key}' already exists")]
    ConstraintViolation { key: String },

    #[error("Document not found: {key}")]
    NotFound { key: String },

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(#[source] StorageError),
}

impl StoreError {
    pub fn constraint_violation(key: impl Into<String>) -> Self {
        StoreError::ConstraintViolation { key: key.into() }
    }

    pub fn not_found(key: impl Into<String>) -> Self {
        StoreError::NotFound { key: key.into() }
    }

    /// Stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::ConstraintViolation { .. } => "DOCSTORE_CONSTRAINT_VIOLATION",
            StoreError::NotFound { .. } => "DOCSTORE_NOT_FOUND",
            StoreError::StorageUnavailable(_) => "DOCSTORE_STORAGE_UNAVAILABLE",
        }
    }

    /// Wraps a backend error raised while writing `key`.
    ///
    /// A unique-key violation becomes `ConstraintViolation`; anything else
    /// is `StorageUnavailable`.
    pub(crate) fn from_write(key: &str, err: StorageError) -> Self {
        if err.is_unique_violation() {
            StoreError::constraint_violation(key)
        } else {
            StoreError::StorageUnavailable(err)
        }
    }
}

impl From<StorageError> for StoreError {
    fn from(err: StorageError) -> Self {
        StoreError::StorageUnavailable(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_codes() {
        assert_eq!(
            StoreError::constraint_violation("alice").code(),
            "DOCSTORE_CONSTRAINT_VIOLATION"
        );
        assert_eq!(StoreError::not_found("alice").code(), "DOCSTORE_NOT_FOUND");
        assert_eq!(
            StoreError::from(StorageError::data_corruption("bad")).code(),
            "DOCSTORE_STORAGE_UNAVAILABLE"
        );
    }

    #[test]
    fn test_unique_violation_maps_to_constraint_violation() {
        let err = StoreError::from_write("alice", StorageError::unique_violation("alice"));
        assert!(matches!(err, StoreError::ConstraintViolation { ref key } if key == "alice"));
    }

    #[test]
    fn test_io_failure_maps_to_storage_unavailable() {
        let io_err = io::Error::new(io::ErrorKind::Other, "disk full");
        let err = StoreError::from_write("alice", StorageError::write_failed("append", io_err));
        assert!(matches!(err, StoreError::StorageUnavailable(_)));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            StoreError::not_found("bob").to_string(),
            "Document not found: bob"
        );
    }
}
