//! DocumentStore: create, persist, update, delete, find, search
//!
//! The store is an explicit session handle over one backend. It is opened
//! once, threaded through every call, and closed explicitly.
//!
//! # Document lifecycle
//!
//! ```text
//! Transient --persist--> Persisted --delete--> Deleted
//!                         |    ^
//!                         +----+ update + persist
//! ```
//!
//! Every write is a single backend call and therefore a single atomic unit.
//! Reads always go to the backend; nothing is cached here.

use std::io;

use serde_json::Value;

use crate::config::{BackendKind, StoreConfig};
use crate::document::{Attributes, Document, DocumentState};
use crate::observability::{Event, Logger, StoreMetrics};
use crate::query::AttributeFilter;
use crate::storage::{Backend, FileBackend, MemoryBackend, Row, StorageError};

use super::errors::{StoreError, StoreResult};

/// Embedded document store over a single backend.
#[derive(Debug)]
pub struct DocumentStore {
    backend: Box<dyn Backend>,
    metrics: StoreMetrics,
}

impl DocumentStore {
    /// Opens a store over an already-open backend.
    pub fn open<B: Backend + 'static>(backend: B) -> Self {
        Logger::info(
            Event::StoreOpen.as_str(),
            &[("backend", format!("{:?}", backend).as_str())],
        );
        Self {
            backend: Box::new(backend),
            metrics: StoreMetrics::new(),
        }
    }

    /// Opens a volatile in-memory store.
    pub fn in_memory() -> Self {
        Self::open(MemoryBackend::new())
    }

    /// Opens the backend described by `config`.
    ///
    /// Also applies the configured log level. An unknown level is logged
    /// as `CONFIG_INVALID` and the current level stays in effect.
    ///
    /// # Errors
    ///
    /// `StorageUnavailable` if the file backend has no data directory,
    /// cannot be opened, or its log fails validation.
    pub fn open_config(config: &StoreConfig) -> StoreResult<Self> {
        match config.min_severity() {
            Ok(severity) => Logger::set_min_severity(severity),
            Err(e) => Logger::warn(
                Event::ConfigInvalid.as_str(),
                &[
                    ("error", e.to_string().as_str()),
                    ("kept", Logger::min_severity().as_str()),
                ],
            ),
        }

        match config.backend {
            BackendKind::Memory => Ok(Self::in_memory()),
            BackendKind::File => {
                let data_dir = config
                    .data_dir
                    .as_deref()
                    .filter(|dir| !dir.as_os_str().is_empty())
                    .ok_or_else(|| {
                        StoreError::StorageUnavailable(StorageError::io_error(
                            "No data_dir configured for file backend",
                            io::Error::new(io::ErrorKind::NotFound, "data_dir"),
                        ))
                    })?;
                let backend = FileBackend::open(data_dir, config.sync_writes).map_err(|e| {
                    Logger::error(
                        Event::StorageFailure.as_str(),
                        &[("error", e.to_string().as_str())],
                    );
                    StoreError::from(e)
                })?;
                Ok(Self::open(backend))
            }
        }
    }

    /// Flushes the backend and ends the session.
    pub fn close(mut self) -> StoreResult<()> {
        let result = self.backend.flush().map_err(StoreError::from);
        match &result {
            Ok(()) => Logger::info(
                Event::StoreClose.as_str(),
                &[("documents", self.backend.count().to_string().as_str())],
            ),
            Err(e) => Logger::error(
                Event::StorageFailure.as_str(),
                &[("error", e.to_string().as_str())],
            ),
        }
        result
    }

    /// Builds a new transient document. Nothing is written.
    ///
    /// An absent or empty `key` is replaced by a generated 32-character hex
    /// key. A duplicate key is only detected at persist time.
    pub fn create(
        &self,
        key: Option<&str>,
        doc_type: impl Into<String>,
        data: Option<Attributes>,
    ) -> Document {
        Document::new(key, doc_type, data)
    }

    /// Makes a document visible to subsequent reads.
    ///
    /// Inserts a transient document or rewrites `type` and `data` of a
    /// persisted one.
    ///
    /// # Errors
    ///
    /// - `ConstraintViolation` if another document holds the key
    /// - `NotFound` if the handle is deleted or its row is gone
    /// - `StorageUnavailable` if the backend rejects the write
    pub fn persist(&mut self, doc: &mut Document) -> StoreResult<()> {
        match (doc.state, doc.id) {
            (DocumentState::Transient, _) => {
                let id = self
                    .backend
                    .insert(&doc.key, &doc.doc_type, &doc.data)
                    .map_err(|e| self.failure(StoreError::from_write(&doc.key, e)))?;

                doc.id = Some(id);
                doc.state = DocumentState::Persisted;
                self.metrics.increment_inserts();
                Logger::info(
                    Event::DocumentInsert.as_str(),
                    &[
                        ("id", id.to_string().as_str()),
                        ("key", doc.key.as_str()),
                        ("type", doc.doc_type.as_str()),
                    ],
                );
                Ok(())
            }
            (DocumentState::Persisted, Some(id)) => {
                let row = Row {
                    id,
                    key: doc.key.clone(),
                    doc_type: doc.doc_type.clone(),
                    data: doc.data.clone(),
                };
                let updated = self
                    .backend
                    .update(&row)
                    .map_err(|e| self.failure(StoreError::from_write(&doc.key, e)))?;
                if !updated {
                    return Err(self.failure(StoreError::not_found(&doc.key)));
                }

                self.metrics.increment_updates();
                Logger::info(
                    Event::DocumentUpdate.as_str(),
                    &[
                        ("id", id.to_string().as_str()),
                        ("key", doc.key.as_str()),
                        ("type", doc.doc_type.as_str()),
                    ],
                );
                Ok(())
            }
            _ => Err(self.failure(StoreError::not_found(&doc.key))),
        }
    }

    /// Merges attributes into a document without persisting.
    ///
    /// # Errors
    ///
    /// `NotFound` if the handle is deleted.
    pub fn update<I, K, V>(&self, doc: &mut Document, fields: I) -> StoreResult<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        if doc.state == DocumentState::Deleted {
            return Err(self.failure(StoreError::not_found(&doc.key)));
        }
        doc.update(fields);
        Ok(())
    }

    /// Removes a persisted document permanently.
    ///
    /// The handle becomes `Deleted`. Deleting twice is an error.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the handle was never persisted, is already deleted,
    ///   or its row is gone
    /// - `StorageUnavailable` if the backend rejects the write
    pub fn delete(&mut self, doc: &mut Document) -> StoreResult<()> {
        let id = match (doc.state, doc.id) {
            (DocumentState::Persisted, Some(id)) => id,
            _ => return Err(self.failure(StoreError::not_found(&doc.key))),
        };

        let removed = self.backend.delete(id).map_err(|e| self.failure(e.into()))?;
        if !removed {
            return Err(self.failure(StoreError::not_found(&doc.key)));
        }

        doc.state = DocumentState::Deleted;
        self.metrics.increment_deletes();
        Logger::info(
            Event::DocumentDelete.as_str(),
            &[("id", id.to_string().as_str()), ("key", doc.key.as_str())],
        );
        Ok(())
    }

    /// Looks up a document by exact key, optionally requiring an exact type.
    ///
    /// Absence is `Ok(None)`, not an error.
    pub fn find(&self, key: &str, doc_type: Option<&str>) -> StoreResult<Option<Document>> {
        let row = self
            .backend
            .select_by_key(key)
            .map_err(|e| self.failure(e.into()))?
            .filter(|row| doc_type.map_or(true, |t| row.doc_type == t));

        self.metrics.increment_finds();
        Logger::trace(
            Event::FindComplete.as_str(),
            &[("found", if row.is_some() { "true" } else { "false" }), ("key", key)],
        );

        Ok(row.map(Self::to_document))
    }

    /// Every document of `doc_type` whose attributes satisfy all `filters`.
    ///
    /// Results come back in storage (id) order. No match is `Ok(vec![])`.
    pub fn search(
        &self,
        doc_type: &str,
        filters: &[AttributeFilter],
    ) -> StoreResult<Vec<Document>> {
        let rows = self
            .backend
            .select_by_type(doc_type, filters)
            .map_err(|e| self.failure(e.into()))?;

        self.metrics.increment_searches();
        Logger::trace(
            Event::SearchComplete.as_str(),
            &[
                ("filters", filters.len().to_string().as_str()),
                ("matches", rows.len().to_string().as_str()),
                ("type", doc_type),
            ],
        );

        Ok(rows.into_iter().map(Self::to_document).collect())
    }

    /// Number of persisted documents.
    pub fn count(&self) -> usize {
        self.backend.count()
    }

    pub fn metrics(&self) -> &StoreMetrics {
        &self.metrics
    }

    fn to_document(row: Row) -> Document {
        Document::persisted(row.id, row.key, row.doc_type, row.data)
    }

    /// Counts and logs a failure on its way back to the caller.
    fn failure(&self, err: StoreError) -> StoreError {
        let event = match &err {
            StoreError::ConstraintViolation { .. } => {
                self.metrics.increment_constraint_violations();
                Event::ConstraintViolation
            }
            StoreError::NotFound { .. } => {
                self.metrics.increment_not_found();
                Event::DocumentNotFound
            }
            StoreError::StorageUnavailable(_) => {
                self.metrics.increment_storage_failures();
                Event::StorageFailure
            }
        };
        Logger::error(
            event.as_str(),
            &[("code", err.code()), ("error", err.to_string().as_str())],
        );
        err
    }
}
