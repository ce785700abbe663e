//! Persistence collaborators for the document store
//!
//! A backend is a single table with an auto-assigned primary key, a unique
//! text key, a type tag, and a JSON attribute bag.
//!
//! # Backends
//!
//! - `MemoryBackend`: volatile, in-process
//! - `FileBackend`: append-only record log, checksum-verified on every read,
//!   fsync after every write (unless disabled)

mod backend;
mod checksum;
mod errors;
mod file;
mod memory;
mod reader;
mod record;
mod writer;

pub use backend::{Backend, Row, RowId};
pub use checksum::compute_checksum;
pub use errors::{Severity, StorageError, StorageErrorCode, StorageResult};
pub use file::FileBackend;
pub use memory::MemoryBackend;
pub use reader::LogReader;
pub use record::{LogRecord, RecordKind};
pub use writer::LogWriter;
