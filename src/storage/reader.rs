//! Log reader with strict corruption detection
//!
//! Every read validates the record checksum. Used for the startup scan
//! and for the fresh row reads behind find/search.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use super::errors::{StorageError, StorageResult};
use super::record::{LogRecord, MIN_RECORD_SIZE};

/// Sequential and positional reader over the record log.
pub struct LogReader {
    reader: BufReader<File>,
    current_offset: u64,
    file_size: u64,
}

impl LogReader {
    /// Opens the log file for reading.
    pub fn open(log_path: &Path) -> StorageResult<Self> {
        let file = File::open(log_path).map_err(|e| {
            StorageError::read_failed(
                format!("Failed to open log file: {}", log_path.display()),
                e,
            )
        })?;

        let file_size = file
            .metadata()
            .map_err(|e| StorageError::read_failed("Failed to read file metadata", e))?
            .len();

        Ok(Self {
            reader: BufReader::new(file),
            current_offset: 0,
            file_size,
        })
    }

    /// Returns the current read offset.
    pub fn current_offset(&self) -> u64 {
        self.current_offset
    }

    /// Reads the next record.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(record))` if a record was read
    /// - `Ok(None)` at end of file
    /// - `Err(DOCSTORE_DATA_CORRUPTION)` on truncation or checksum failure
    pub fn read_next(&mut self) -> StorageResult<Option<LogRecord>> {
        if self.current_offset >= self.file_size {
            return Ok(None);
        }

        let remaining = self.file_size - self.current_offset;
        let min_size = MIN_RECORD_SIZE as u64;

        if remaining < min_size {
            return Err(StorageError::corruption_at_offset(
                self.current_offset,
                format!(
                    "Truncated log: {} bytes remaining, minimum record size is {}",
                    remaining, min_size
                ),
            ));
        }

        let mut len_buf = [0u8; 4];
        self.reader.read_exact(&mut len_buf).map_err(|e| {
            StorageError::corruption_at_offset(
                self.current_offset,
                format!("Failed to read record length: {}", e),
            )
        })?;
        let record_length = u32::from_le_bytes(len_buf) as u64;

        if record_length < min_size {
            return Err(StorageError::corruption_at_offset(
                self.current_offset,
                format!("Invalid record length: {}", record_length),
            ));
        }

        if record_length > remaining {
            return Err(StorageError::corruption_at_offset(
                self.current_offset,
                format!(
                    "Record length {} exceeds remaining file size {}",
                    record_length, remaining
                ),
            ));
        }

        let mut record_buf = vec![0u8; record_length as usize];
        record_buf[0..4].copy_from_slice(&len_buf);

        self.reader.read_exact(&mut record_buf[4..]).map_err(|e| {
            StorageError::corruption_at_offset(
                self.current_offset,
                format!("Failed to read record body: {}", e),
            )
        })?;

        let (record, bytes_consumed) = LogRecord::deserialize(&record_buf)
            .map_err(|e| StorageError::corruption_at_offset(self.current_offset, e.to_string()))?;

        self.current_offset += bytes_consumed as u64;

        Ok(Some(record))
    }

    /// Seeks to a specific offset in the file.
    pub fn seek_to(&mut self, offset: u64) -> StorageResult<()> {
        self.reader.seek(SeekFrom::Start(offset)).map_err(|e| {
            StorageError::read_failed(format!("Failed to seek to offset {}", offset), e)
        })?;
        self.current_offset = offset;
        Ok(())
    }

    /// Reads a single record at the specified offset.
    pub fn read_at(&mut self, offset: u64) -> StorageResult<LogRecord> {
        self.seek_to(offset)?;
        match self.read_next()? {
            Some(record) => Ok(record),
            None => Err(StorageError::corruption_at_offset(
                offset,
                "No record at specified offset",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_records(path: &Path, records: &[LogRecord]) -> Vec<u64> {
        let mut bytes = Vec::new();
        let mut offsets = Vec::new();
        for record in records {
            offsets.push(bytes.len() as u64);
            bytes.extend_from_slice(&record.serialize());
        }
        fs::write(path, bytes).unwrap();
        offsets
    }

    #[test]
    fn test_sequential_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("documents.log");
        write_records(
            &path,
            &[LogRecord::delete(1, "a"), LogRecord::delete(2, "b")],
        );

        let mut reader = LogReader::open(&path).unwrap();
        assert_eq!(reader.read_next().unwrap().unwrap().key, "a");
        assert_eq!(reader.read_next().unwrap().unwrap().key, "b");
        assert!(reader.read_next().unwrap().is_none());
    }

    #[test]
    fn test_read_at_offset() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("documents.log");
        let offsets = write_records(
            &path,
            &[LogRecord::delete(1, "a"), LogRecord::delete(2, "b")],
        );

        let mut reader = LogReader::open(&path).unwrap();
        assert_eq!(reader.read_at(offsets[1]).unwrap().row_id, 2);
        assert_eq!(reader.read_at(offsets[0]).unwrap().row_id, 1);
    }

    #[test]
    fn test_truncated_tail_is_corruption() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("documents.log");
        write_records(&path, &[LogRecord::delete(1, "a")]);

        let mut contents = fs::read(&path).unwrap();
        contents.extend_from_slice(&[0x01, 0x02, 0x03]);
        fs::write(&path, contents).unwrap();

        let mut reader = LogReader::open(&path).unwrap();
        assert!(reader.read_next().unwrap().is_some());
        let err = reader.read_next().unwrap_err();
        assert!(err.is_fatal());
        assert!(err.to_string().contains("Truncated log"));
    }

    #[test]
    fn test_missing_file_is_read_failure() {
        let temp_dir = TempDir::new().unwrap();
        let result = LogReader::open(&temp_dir.path().join("missing.log"));
        assert!(!result.err().unwrap().is_fatal());
    }
}
