//! The table abstraction every persistence engine implements.
//!
//! One logical table: `id` (auto-assigned primary key), `key` (unique,
//! not null), `type` (not null), `data` (attribute bag).

use std::fmt;

use crate::document::Attributes;
use crate::query::AttributeFilter;

use super::errors::StorageResult;

/// Auto-assigned primary key
pub type RowId = u64;

/// A persisted table row.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub id: RowId,
    pub key: String,
    pub doc_type: String,
    pub data: Attributes,
}

/// Persistence collaborator behind a `DocumentStore`.
///
/// Each mutating call is one atomic unit: it either fully applies or
/// leaves the table untouched.
pub trait Backend: fmt::Debug {
    /// Inserts a new row and returns its assigned id.
    ///
    /// Ids increase monotonically and are never reused.
    /// Fails with a unique violation if `key` is taken.
    fn insert(&mut self, key: &str, doc_type: &str, data: &Attributes) -> StorageResult<RowId>;

    /// Rewrites `type` and `data` of the row with `row.id`.
    ///
    /// The stored key is immutable; `row.key` is ignored. Returns `false`
    /// if no such row.
    fn update(&mut self, row: &Row) -> StorageResult<bool>;

    /// Removes the row with `id`. Returns `false` if no such row.
    fn delete(&mut self, id: RowId) -> StorageResult<bool>;

    /// Exact-match lookup on the unique key.
    fn select_by_key(&self, key: &str) -> StorageResult<Option<Row>>;

    /// Rows with exactly `doc_type` whose data passes every filter,
    /// in ascending id order.
    fn select_by_type(&self, doc_type: &str, filters: &[AttributeFilter])
        -> StorageResult<Vec<Row>>;

    /// Number of live rows.
    fn count(&self) -> usize;

    /// Makes every acknowledged write durable.
    fn flush(&mut self) -> StorageResult<()>;
}

impl<B: Backend + ?Sized> Backend for Box<B> {
    fn insert(&mut self, key: &str, doc_type: &str, data: &Attributes) -> StorageResult<RowId> {
        (**self).insert(key, doc_type, data)
    }

    fn update(&mut self, row: &Row) -> StorageResult<bool> {
        (**self).update(row)
    }

    fn delete(&mut self, id: RowId) -> StorageResult<bool> {
        (**self).delete(id)
    }

    fn select_by_key(&self, key: &str) -> StorageResult<Option<Row>> {
        (**self).select_by_key(key)
    }

    fn select_by_type(
        &self,
        doc_type: &str,
        filters: &[AttributeFilter],
    ) -> StorageResult<Vec<Row>> {
        (**self).select_by_type(doc_type, filters)
    }

    fn count(&self) -> usize {
        (**self).count()
    }

    fn flush(&mut self) -> StorageResult<()> {
        (**self).flush()
    }
}
