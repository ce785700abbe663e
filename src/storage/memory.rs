//! In-process table backend.
//!
//! Holds rows in id order plus a unique index on key. Nothing survives
//! the process.

use std::collections::{BTreeMap, HashMap};

use crate::document::Attributes;
use crate::query::{matches_all, AttributeFilter};

use super::backend::{Backend, Row, RowId};
use super::errors::{StorageError, StorageResult};

/// Volatile backend for embedding and tests
#[derive(Debug)]
pub struct MemoryBackend {
    rows: BTreeMap<RowId, Row>,
    key_index: HashMap<String, RowId>,
    next_id: RowId,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            key_index: HashMap::new(),
            next_id: 1,
        }
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Backend for MemoryBackend {
    fn insert(&mut self, key: &str, doc_type: &str, data: &Attributes) -> StorageResult<RowId> {
        if self.key_index.contains_key(key) {
            return Err(StorageError::unique_violation(key));
        }

        let id = self.next_id;
        self.next_id += 1;

        self.rows.insert(
            id,
            Row {
                id,
                key: key.to_string(),
                doc_type: doc_type.to_string(),
                data: data.clone(),
            },
        );
        self.key_index.insert(key.to_string(), id);
        Ok(id)
    }

    fn update(&mut self, row: &Row) -> StorageResult<bool> {
        match self.rows.get_mut(&row.id) {
            Some(existing) => {
                existing.doc_type = row.doc_type.clone();
                existing.data = row.data.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete(&mut self, id: RowId) -> StorageResult<bool> {
        match self.rows.remove(&id) {
            Some(row) => {
                self.key_index.remove(&row.key);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn select_by_key(&self, key: &str) -> StorageResult<Option<Row>> {
        Ok(self
            .key_index
            .get(key)
            .and_then(|id| self.rows.get(id))
            .cloned())
    }

    fn select_by_type(
        &self,
        doc_type: &str,
        filters: &[AttributeFilter],
    ) -> StorageResult<Vec<Row>> {
        Ok(self
            .rows
            .values()
            .filter(|row| row.doc_type == doc_type && matches_all(&row.data, filters))
            .cloned()
            .collect())
    }

    fn count(&self) -> usize {
        self.rows.len()
    }

    fn flush(&mut self) -> StorageResult<()> {
        Ok(())
    }
}
