//! Durable backend over the append-only record log.
//!
//! # Design
//!
//! - Every insert, update, and delete appends exactly one record
//! - Latest record for a row id wins; a delete record drops the row
//! - Primary key, unique key, and type index live in memory and are
//!   rebuilt by scanning the log on open
//! - Row contents are always read back from disk, never cached
//! - Any checksum or framing failure during the scan aborts the open

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use crate::document::Attributes;
use crate::observability::{Event, Logger};
use crate::query::{matches_all, AttributeFilter};

use super::backend::{Backend, Row, RowId};
use super::errors::{StorageError, StorageResult};
use super::reader::LogReader;
use super::record::{LogRecord, RecordKind};
use super::writer::LogWriter;

/// Where the latest image of a live row sits in the log.
#[derive(Debug, Clone)]
struct RowLocation {
    offset: u64,
    key: String,
    doc_type: String,
}

/// Index state recovered from a log scan
#[derive(Debug, Default)]
struct LogIndex {
    rows: BTreeMap<RowId, RowLocation>,
    key_index: HashMap<String, RowId>,
    next_id: RowId,
}

impl LogIndex {
    fn new() -> Self {
        Self {
            next_id: 1,
            ..Self::default()
        }
    }

    fn apply(&mut self, record: &LogRecord, offset: u64) -> StorageResult<()> {
        self.next_id = self.next_id.max(record.row_id + 1);

        match record.kind {
            RecordKind::Row => {
                if let Some(&holder) = self.key_index.get(&record.key) {
                    if holder != record.row_id {
                        return Err(StorageError::corruption_at_offset(
                            offset,
                            format!(
                                "Key '{}' held by rows {} and {}",
                                record.key, holder, record.row_id
                            ),
                        ));
                    }
                }
                if let Some(previous) = self.rows.get(&record.row_id) {
                    if previous.key != record.key {
                        self.key_index.remove(&previous.key);
                    }
                }
                self.key_index.insert(record.key.clone(), record.row_id);
                self.rows.insert(
                    record.row_id,
                    RowLocation {
                        offset,
                        key: record.key.clone(),
                        doc_type: record.doc_type.clone(),
                    },
                );
            }
            RecordKind::Delete => {
                if let Some(previous) = self.rows.remove(&record.row_id) {
                    self.key_index.remove(&previous.key);
                }
            }
        }
        Ok(())
    }
}

/// File-backed table stored at `<data_dir>/data/documents.log`
pub struct FileBackend {
    writer: LogWriter,
    index: LogIndex,
}

impl std::fmt::Debug for FileBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileBackend")
            .field("log", &self.writer.path())
            .field("rows", &self.index.rows.len())
            .field("next_id", &self.index.next_id)
            .finish()
    }
}

impl FileBackend {
    /// Opens (or creates) the log under `data_dir` and rebuilds the index.
    ///
    /// # Errors
    ///
    /// - `DOCSTORE_STORAGE_WRITE_FAILED` if the log cannot be created
    /// - `DOCSTORE_DATA_CORRUPTION` if any record fails validation
    pub fn open(data_dir: &Path, sync_writes: bool) -> StorageResult<Self> {
        let writer = LogWriter::open(data_dir, sync_writes)?;
        let index = Self::scan(writer.path())?;

        Ok(Self { writer, index })
    }

    fn scan(log_path: &Path) -> StorageResult<LogIndex> {
        let path_str = log_path.display().to_string();
        Logger::info(Event::LogScanBegin.as_str(), &[("path", path_str.as_str())]);

        let mut index = LogIndex::new();
        let mut reader = LogReader::open(log_path)?;
        let mut records = 0u64;

        loop {
            let offset = reader.current_offset();
            match reader.read_next() {
                Ok(Some(record)) => {
                    index.apply(&record, offset)?;
                    records += 1;
                }
                Ok(None) => break,
                Err(e) => {
                    Logger::fatal(
                        Event::StorageFailure.as_str(),
                        &[("error", e.to_string().as_str()), ("path", path_str.as_str())],
                    );
                    return Err(e);
                }
            }
        }

        Logger::info(
            Event::LogScanComplete.as_str(),
            &[
                ("path", path_str.as_str()),
                ("records", records.to_string().as_str()),
                ("rows", index.rows.len().to_string().as_str()),
            ],
        );

        Ok(index)
    }

    fn read_row(reader: &mut LogReader, id: RowId, offset: u64) -> StorageResult<Row> {
        let record = reader.read_at(offset)?;
        if record.kind != RecordKind::Row || record.row_id != id {
            return Err(StorageError::corruption_at_offset(
                offset,
                format!("Expected row image for row {}", id),
            ));
        }
        record.to_row(offset)
    }

    fn append_row(&mut self, row: &Row) -> StorageResult<()> {
        let record = LogRecord::from_row(row)?;
        let offset = self.writer.append(&record)?;
        self.index.apply(&record, offset)
    }
}

impl Backend for FileBackend {
    fn insert(&mut self, key: &str, doc_type: &str, data: &Attributes) -> StorageResult<RowId> {
        if self.index.key_index.contains_key(key) {
            return Err(StorageError::unique_violation(key));
        }

        let row = Row {
            id: self.index.next_id,
            key: key.to_string(),
            doc_type: doc_type.to_string(),
            data: data.clone(),
        };
        self.append_row(&row)?;
        Ok(row.id)
    }

    fn update(&mut self, row: &Row) -> StorageResult<bool> {
        let key = match self.index.rows.get(&row.id) {
            Some(location) => location.key.clone(),
            None => return Ok(false),
        };

        self.append_row(&Row {
            id: row.id,
            key,
            doc_type: row.doc_type.clone(),
            data: row.data.clone(),
        })?;
        Ok(true)
    }

    fn delete(&mut self, id: RowId) -> StorageResult<bool> {
        let key = match self.index.rows.get(&id) {
            Some(location) => location.key.clone(),
            None => return Ok(false),
        };

        let record = LogRecord::delete(id, key);
        let offset = self.writer.append(&record)?;
        self.index.apply(&record, offset)?;
        Ok(true)
    }

    fn select_by_key(&self, key: &str) -> StorageResult<Option<Row>> {
        let id = match self.index.key_index.get(key) {
            Some(&id) => id,
            None => return Ok(None),
        };
        let offset = match self.index.rows.get(&id) {
            Some(location) => location.offset,
            None => return Ok(None),
        };

        let mut reader = LogReader::open(self.writer.path())?;
        Self::read_row(&mut reader, id, offset).map(Some)
    }

    fn select_by_type(
        &self,
        doc_type: &str,
        filters: &[AttributeFilter],
    ) -> StorageResult<Vec<Row>> {
        let candidates: Vec<(RowId, u64)> = self
            .index
            .rows
            .iter()
            .filter(|(_, location)| location.doc_type == doc_type)
            .map(|(&id, location)| (id, location.offset))
            .collect();

        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let mut reader = LogReader::open(self.writer.path())?;
        let mut rows = Vec::new();
        for (id, offset) in candidates {
            let row = Self::read_row(&mut reader, id, offset)?;
            if row.doc_type == doc_type && matches_all(&row.data, filters) {
                rows.push(row);
            }
        }
        Ok(rows)
    }

    fn count(&self) -> usize {
        self.index.rows.len()
    }

    fn flush(&mut self) -> StorageResult<()> {
        self.writer.sync()
    }
}
