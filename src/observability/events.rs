//! Observable events
//!
//! Every log line names one of these.

use std::fmt;

/// Observable events in the document store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Store handle opened
    StoreOpen,
    /// Store handle closed
    StoreClose,
    /// Configuration loaded
    ConfigLoaded,
    /// Configuration value rejected; a default stays in effect
    ConfigInvalid,

    // File backend
    /// Log scan begins
    LogScanBegin,
    /// Log scan complete, index rebuilt
    LogScanComplete,
    /// Torn append cut back to the last complete record
    LogRollback,

    // Writes
    /// New document inserted
    DocumentInsert,
    /// Existing document rewritten
    DocumentUpdate,
    /// Document removed
    DocumentDelete,

    // Reads
    /// Find by key complete
    FindComplete,
    /// Search by type and attributes complete
    SearchComplete,

    // Failures
    /// Write rejected for a duplicate key
    ConstraintViolation,
    /// Operation targeted a missing document
    DocumentNotFound,
    /// Backend could not complete an operation
    StorageFailure,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::StoreOpen => "STORE_OPEN",
            Event::StoreClose => "STORE_CLOSE",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::ConfigInvalid => "CONFIG_INVALID",

            Event::LogScanBegin => "LOG_SCAN_BEGIN",
            Event::LogScanComplete => "LOG_SCAN_COMPLETE",
            Event::LogRollback => "LOG_ROLLBACK",

            Event::DocumentInsert => "DOCUMENT_INSERT",
            Event::DocumentUpdate => "DOCUMENT_UPDATE",
            Event::DocumentDelete => "DOCUMENT_DELETE",

            Event::FindComplete => "FIND_COMPLETE",
            Event::SearchComplete => "SEARCH_COMPLETE",

            Event::ConstraintViolation => "CONSTRAINT_VIOLATION",
            Event::DocumentNotFound => "DOCUMENT_NOT_FOUND",
            Event::StorageFailure => "STORAGE_FAILURE",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
