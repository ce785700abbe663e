//! Log record format for the file backend
//!
//! ```text
//! +------------------+
//! | Record Length    | (u32 LE, includes itself and the checksum)
//! +------------------+
//! | Row ID           | (u64 LE)
//! +------------------+
//! | Kind             | (u8: 0 = row image, 1 = delete)
//! +------------------+
//! | Key              | (length-prefixed string)
//! +------------------+
//! | Type             | (length-prefixed string)
//! +------------------+
//! | Data             | (length-prefixed JSON bytes, empty for deletes)
//! +------------------+
//! | Checksum         | (u32 LE)
//! +------------------+
//! ```
//!
//! Checksum covers all bytes except the checksum itself.

use std::io::{self, Read};

use super::backend::{Row, RowId};
use super::checksum::{compute_checksum, verify_checksum};
use super::errors::{StorageError, StorageResult};

/// Smallest possible record: length + id + kind + three empty fields + checksum
pub const MIN_RECORD_SIZE: usize = 4 + 8 + 1 + 4 + 4 + 4 + 4;

/// What a log record does to its row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// Full image of the row's current state
    Row = 0,
    /// The row was removed
    Delete = 1,
}

impl RecordKind {
    fn from_byte(byte: u8) -> io::Result<Self> {
        match byte {
            0 => Ok(RecordKind::Row),
            1 => Ok(RecordKind::Delete),
            other => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Unknown record kind: {}", other),
            )),
        }
    }
}

/// A single entry of the append-only log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub row_id: RowId,
    pub kind: RecordKind,
    pub key: String,
    pub doc_type: String,
    /// Serialized attribute bag (empty for deletes)
    pub data: Vec<u8>,
}

impl LogRecord {
    /// Build a row-image record from a row.
    pub fn from_row(row: &Row) -> StorageResult<Self> {
        let data = serde_json::to_vec(&row.data).map_err(|e| {
            StorageError::write_failed(
                format!("Failed to serialize data for key: {}", row.key),
                io::Error::new(io::ErrorKind::InvalidData, e),
            )
        })?;
        Ok(Self {
            row_id: row.id,
            kind: RecordKind::Row,
            key: row.key.clone(),
            doc_type: row.doc_type.clone(),
            data,
        })
    }

    /// Build a delete record for a row.
    pub fn delete(row_id: RowId, key: impl Into<String>) -> Self {
        Self {
            row_id,
            kind: RecordKind::Delete,
            key: key.into(),
            doc_type: String::new(),
            data: Vec::new(),
        }
    }

    /// Decode the row image carried by this record.
    pub fn to_row(&self, offset: u64) -> StorageResult<Row> {
        let data = serde_json::from_slice(&self.data).map_err(|e| {
            StorageError::corruption_at_offset(offset, format!("Invalid row data: {}", e))
        })?;
        Ok(Row {
            id: self.row_id,
            key: self.key.clone(),
            doc_type: self.doc_type.clone(),
            data,
        })
    }

    fn serialize_body(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(
            8 + 1 + 12 + self.key.len() + self.doc_type.len() + self.data.len(),
        );

        buf.extend_from_slice(&self.row_id.to_le_bytes());
        buf.push(self.kind as u8);

        buf.extend_from_slice(&(self.key.len() as u32).to_le_bytes());
        buf.extend_from_slice(self.key.as_bytes());

        buf.extend_from_slice(&(self.doc_type.len() as u32).to_le_bytes());
        buf.extend_from_slice(self.doc_type.as_bytes());

        buf.extend_from_slice(&(self.data.len() as u32).to_le_bytes());
        buf.extend_from_slice(&self.data);

        buf
    }

    /// Serialize the complete record to bytes.
    pub fn serialize(&self) -> Vec<u8> {
        let body = self.serialize_body();
        let record_length = (4 + body.len() + 4) as u32;

        let mut record = Vec::with_capacity(record_length as usize);
        record.extend_from_slice(&record_length.to_le_bytes());
        record.extend_from_slice(&body);

        let checksum = compute_checksum(&record);
        record.extend_from_slice(&checksum.to_le_bytes());

        record
    }

    /// Deserialize a record from bytes, verifying checksum.
    ///
    /// Returns the record and the number of bytes consumed.
    pub fn deserialize(data: &[u8]) -> io::Result<(Self, usize)> {
        if data.len() < MIN_RECORD_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "Record too short",
            ));
        }

        let record_length = u32::from_le_bytes([data[0], data[1], data[2], data[3]]) as usize;

        if record_length < MIN_RECORD_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Invalid record length: {}", record_length),
            ));
        }

        if data.len() < record_length {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "Record truncated: expected {} bytes, got {}",
                    record_length,
                    data.len()
                ),
            ));
        }

        let checksum_offset = record_length - 4;
        let stored_checksum = u32::from_le_bytes([
            data[checksum_offset],
            data[checksum_offset + 1],
            data[checksum_offset + 2],
            data[checksum_offset + 3],
        ]);
        if !verify_checksum(&data[0..checksum_offset], stored_checksum) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Checksum mismatch: stored {:08x}", stored_checksum),
            ));
        }

        let mut cursor = io::Cursor::new(&data[4..checksum_offset]);

        fn read_bytes<R: Read>(reader: &mut R) -> io::Result<Vec<u8>> {
            let mut len_buf = [0u8; 4];
            reader.read_exact(&mut len_buf)?;
            let len = u32::from_le_bytes(len_buf) as usize;

            let mut buf = vec![0u8; len];
            reader.read_exact(&mut buf)?;
            Ok(buf)
        }

        fn read_string<R: Read>(reader: &mut R) -> io::Result<String> {
            String::from_utf8(read_bytes(reader)?).map_err(|e| {
                io::Error::new(io::ErrorKind::InvalidData, format!("Invalid UTF-8: {}", e))
            })
        }

        let mut id_buf = [0u8; 8];
        cursor.read_exact(&mut id_buf)?;
        let row_id = u64::from_le_bytes(id_buf);

        let mut kind_buf = [0u8; 1];
        cursor.read_exact(&mut kind_buf)?;
        let kind = RecordKind::from_byte(kind_buf[0])?;

        let key = read_string(&mut cursor)?;
        let doc_type = read_string(&mut cursor)?;
        let data = read_bytes(&mut cursor)?;

        Ok((
            Self {
                row_id,
                kind,
                key,
                doc_type,
                data,
            },
            record_length,
        ))
    }
}
