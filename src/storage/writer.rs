//! Append-only log writer with fsync enforcement
//!
//! A write is not acknowledged until the record is appended and, when
//! `sync_writes` is enabled, fsynced. There are no in-place updates.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::observability::{Event, Logger};

use super::errors::{StorageError, StorageResult};
use super::record::LogRecord;

/// Failure injected into the append path by durability tests.
#[cfg_attr(not(test), allow(dead_code))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WriteFault {
    /// Write only the first `n` bytes of the record, then fail
    TornWrite(usize),
    /// Write the whole record, then fail the fsync
    SyncFailure,
}

/// Writer that appends records to `<data_dir>/data/documents.log`.
pub struct LogWriter {
    log_path: PathBuf,
    file: File,
    current_offset: u64,
    sync_writes: bool,
    poisoned: bool,
    fault: Option<WriteFault>,
}

impl LogWriter {
    /// Opens or creates the log file under `data_dir`.
    ///
    /// Creates parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::write_failed` if the file cannot be created or opened.
    pub fn open(data_dir: &Path, sync_writes: bool) -> StorageResult<Self> {
        let log_path = Self::log_path(data_dir);
        let data_subdir = data_dir.join("data");

        if !data_subdir.exists() {
            fs::create_dir_all(&data_subdir).map_err(|e| {
                StorageError::write_failed(
                    format!("Failed to create data directory: {}", data_subdir.display()),
                    e,
                )
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&log_path)
            .map_err(|e| {
                StorageError::write_failed(
                    format!("Failed to open log file: {}", log_path.display()),
                    e,
                )
            })?;

        let current_offset = file
            .metadata()
            .map_err(|e| StorageError::write_failed("Failed to read file metadata", e))?
            .len();

        Ok(Self {
            log_path,
            file,
            current_offset,
            sync_writes,
            poisoned: false,
            fault: None,
        })
    }

    /// Location of the log file for a data directory.
    pub fn log_path(data_dir: &Path) -> PathBuf {
        data_dir.join("data").join("documents.log")
    }

    /// Returns the path to the log file.
    pub fn path(&self) -> &Path {
        &self.log_path
    }

    /// Returns the current end-of-log offset.
    pub fn current_offset(&self) -> u64 {
        self.current_offset
    }

    /// Appends a record, returning the byte offset it was written at.
    ///
    /// All or nothing: if the write or fsync fails, the file is cut back
    /// to the end of the last complete record before the error returns.
    ///
    /// # Errors
    ///
    /// Returns `DOCSTORE_STORAGE_WRITE_FAILED` if write or fsync fails, or
    /// if an earlier rollback failed and the log tail is unknown.
    pub fn append(&mut self, record: &LogRecord) -> StorageResult<u64> {
        if self.poisoned {
            return Err(StorageError::write_failed(
                "Log tail is unknown after a failed rollback; reopen the store",
                io::Error::new(io::ErrorKind::Other, "poisoned log writer"),
            ));
        }

        let serialized = record.serialize();
        let offset = self.current_offset;

        if let Err(e) = self.write_durable(&serialized, &record.key) {
            self.rollback()?;
            return Err(e);
        }

        self.current_offset += serialized.len() as u64;
        Ok(offset)
    }

    /// Forces all appended records to disk.
    pub fn sync(&mut self) -> StorageResult<()> {
        self.sync_file()
            .map_err(|e| StorageError::write_failed("fsync failed on log file", e))
    }

    fn write_durable(&mut self, bytes: &[u8], key: &str) -> StorageResult<()> {
        self.write_bytes(bytes).map_err(|e| {
            StorageError::write_failed(format!("Failed to write record for key: {}", key), e)
        })?;

        if self.sync_writes {
            self.sync()?;
        }
        Ok(())
    }

    /// Truncates the file to `current_offset`, dropping a torn tail.
    fn rollback(&mut self) -> StorageResult<()> {
        let offset = self.current_offset.to_string();
        let result = self
            .file
            .set_len(self.current_offset)
            .and_then(|()| self.file.sync_all());

        match result {
            Ok(()) => {
                Logger::warn(
                    Event::LogRollback.as_str(),
                    &[("offset", offset.as_str())],
                );
                Ok(())
            }
            Err(e) => {
                self.poisoned = true;
                Logger::fatal(
                    Event::StorageFailure.as_str(),
                    &[("error", e.to_string().as_str()), ("offset", offset.as_str())],
                );
                Err(StorageError::write_failed(
                    format!("Failed to roll back log to offset {}", offset),
                    e,
                ))
            }
        }
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        if let Some(WriteFault::TornWrite(len)) = self.fault {
            self.file.write_all(&bytes[..len.min(bytes.len())])?;
            return Err(io::Error::new(io::ErrorKind::WriteZero, "injected torn write"));
        }
        self.file.write_all(bytes)
    }

    fn sync_file(&mut self) -> io::Result<()> {
        if self.fault == Some(WriteFault::SyncFailure) {
            return Err(io::Error::new(io::ErrorKind::Other, "injected fsync failure"));
        }
        self.file.sync_all()
    }

    /// Arms (or clears) a failure for the next appends.
    #[cfg(test)]
    pub(crate) fn inject_fault(&mut self, fault: Option<WriteFault>) {
        self.fault = fault;
    }
}

#[cfg(test)]
mod tests {
    use super::super::reader::LogReader;
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_writer_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let data_path = temp_dir.path().join("data");
        assert!(!data_path.exists());

        let _writer = LogWriter::open(temp_dir.path(), true).unwrap();

        assert!(data_path.join("documents.log").exists());
    }

    #[test]
    fn test_offset_tracking() {
        let temp_dir = TempDir::new().unwrap();
        let mut writer = LogWriter::open(temp_dir.path(), false).unwrap();
        assert_eq!(writer.current_offset(), 0);

        let offset1 = writer.append(&LogRecord::delete(1, "a")).unwrap();
        let offset2 = writer.append(&LogRecord::delete(2, "b")).unwrap();
        assert_eq!(offset1, 0);
        assert!(offset2 > offset1);
        assert_eq!(
            writer.current_offset(),
            2 * LogRecord::delete(1, "a").serialize().len() as u64
        );
    }

    #[test]
    fn test_reopen_appends_after_existing_records() {
        let temp_dir = TempDir::new().unwrap();
        {
            let mut writer = LogWriter::open(temp_dir.path(), true).unwrap();
            writer.append(&LogRecord::delete(1, "a")).unwrap();
        }

        let mut writer = LogWriter::open(temp_dir.path(), true).unwrap();
        let offset = writer.append(&LogRecord::delete(2, "b")).unwrap();
        assert!(offset > 0);

        let mut reader = LogReader::open(writer.path()).unwrap();
        assert_eq!(reader.read_next().unwrap().unwrap().row_id, 1);
        assert_eq!(reader.read_next().unwrap().unwrap().row_id, 2);
    }

    fn file_len(writer: &LogWriter) -> u64 {
        fs::metadata(writer.path()).unwrap().len()
    }

    #[test]
    fn test_torn_write_is_cut_back() {
        let temp_dir = TempDir::new().unwrap();
        let mut writer = LogWriter::open(temp_dir.path(), true).unwrap();
        writer.append(&LogRecord::delete(1, "a")).unwrap();
        let committed = writer.current_offset();

        writer.inject_fault(Some(WriteFault::TornWrite(10)));
        let err = writer.append(&LogRecord::delete(2, "b")).unwrap_err();
        assert!(err.to_string().contains("Failed to write record for key: b"));
        assert_eq!(writer.current_offset(), committed);
        assert_eq!(file_len(&writer), committed);

        writer.inject_fault(None);
        let offset = writer.append(&LogRecord::delete(3, "c")).unwrap();
        assert_eq!(offset, committed);

        let mut reader = LogReader::open(writer.path()).unwrap();
        assert_eq!(reader.read_next().unwrap().unwrap().row_id, 1);
        assert_eq!(reader.read_at(offset).unwrap().row_id, 3);
        assert!(reader.read_next().unwrap().is_none());
    }

    #[test]
    fn test_failed_fsync_drops_whole_record() {
        let temp_dir = TempDir::new().unwrap();
        let mut writer = LogWriter::open(temp_dir.path(), true).unwrap();
        writer.append(&LogRecord::delete(1, "a")).unwrap();
        let committed = writer.current_offset();

        writer.inject_fault(Some(WriteFault::SyncFailure));
        assert!(writer.append(&LogRecord::delete(2, "b")).is_err());
        assert_eq!(file_len(&writer), committed);
        assert_eq!(writer.current_offset(), committed);
    }
}
