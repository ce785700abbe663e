//! Storage error types
//!
//! Error codes:
//! - DOCSTORE_STORAGE_IO_ERROR (ERROR severity)
//! - DOCSTORE_STORAGE_WRITE_FAILED (ERROR severity)
//! - DOCSTORE_STORAGE_READ_FAILED (ERROR severity)
//! - DOCSTORE_UNIQUE_VIOLATION (ERROR severity)
//! - DOCSTORE_DATA_CORRUPTION (FATAL severity)

use std::fmt;
use std::io;

/// Severity levels for storage errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Operation fails, the store stays usable
    Error,
    /// The backend can no longer be trusted
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Storage-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageErrorCode {
    /// Disk I/O failure
    StorageIoError,
    /// Record write failed
    StorageWriteFailed,
    /// Record read failed
    StorageReadFailed,
    /// A row with the same key already exists
    UniqueViolation,
    /// Checksum, framing, or payload decode failure
    DataCorruption,
}

impl StorageErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            StorageErrorCode::StorageIoError => "DOCSTORE_STORAGE_IO_ERROR",
            StorageErrorCode::StorageWriteFailed => "DOCSTORE_STORAGE_WRITE_FAILED",
            StorageErrorCode::StorageReadFailed => "DOCSTORE_STORAGE_READ_FAILED",
            StorageErrorCode::UniqueViolation => "DOCSTORE_UNIQUE_VIOLATION",
            StorageErrorCode::DataCorruption => "DOCSTORE_DATA_CORRUPTION",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            StorageErrorCode::DataCorruption => Severity::Fatal,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for StorageErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Storage error with code, message, optional context, and I/O source
#[derive(Debug)]
pub struct StorageError {
    code: StorageErrorCode,
    message: String,
    details: Option<String>,
    source: Option<io::Error>,
}

impl StorageError {
    fn new(code: StorageErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            source: None,
        }
    }

    /// Create a new storage I/O error
    pub fn io_error(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            source: Some(source),
            ..Self::new(StorageErrorCode::StorageIoError, message)
        }
    }

    /// Create a new storage write failed error
    pub fn write_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            source: Some(source),
            ..Self::new(StorageErrorCode::StorageWriteFailed, message)
        }
    }

    /// Create a new storage read failed error
    pub fn read_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            source: Some(source),
            ..Self::new(StorageErrorCode::StorageReadFailed, message)
        }
    }

    /// Create a unique-key violation error for `key`
    pub fn unique_violation(key: &str) -> Self {
        Self {
            details: Some(format!("key: {}", key)),
            ..Self::new(
                StorageErrorCode::UniqueViolation,
                "A row with this key already exists",
            )
        }
    }

    /// Create a new data corruption error (FATAL)
    pub fn data_corruption(message: impl Into<String>) -> Self {
        Self::new(StorageErrorCode::DataCorruption, message)
    }

    /// Create a data corruption error with byte offset context
    pub fn corruption_at_offset(offset: u64, reason: impl Into<String>) -> Self {
        Self {
            details: Some(format!("byte_offset: {}", offset)),
            ..Self::new(StorageErrorCode::DataCorruption, reason)
        }
    }

    /// Returns the error code
    pub fn code(&self) -> StorageErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns additional error details
    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    /// Returns whether this error is fatal
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }

    /// Returns whether this error reports a duplicate key
    pub fn is_unique_violation(&self) -> bool {
        self.code == StorageErrorCode::UniqueViolation
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
