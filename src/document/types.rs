//! The document entity
//!
//! A document is a unique key, a type tag, and an open attribute bag.
//! `id` and `key` never change once assigned; `type` and `data` may.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use super::key::resolve_key;

/// Attribute bag: attribute name -> arbitrary JSON value
pub type Attributes = Map<String, Value>;

/// Surrogate identity assigned by the backend on first persist
pub type DocumentId = u64;

/// Lifecycle of a document handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentState {
    /// Constructed, never persisted
    Transient,
    /// Visible to reads
    Persisted,
    /// Removed; terminal
    Deleted,
}

impl fmt::Display for DocumentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentState::Transient => write!(f, "transient"),
            DocumentState::Persisted => write!(f, "persisted"),
            DocumentState::Deleted => write!(f, "deleted"),
        }
    }
}

/// A document handle.
///
/// Handles are detached snapshots: changes made here are invisible to other
/// readers until passed to `DocumentStore::persist`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub(crate) id: Option<DocumentId>,
    pub(crate) key: String,
    #[serde(rename = "type")]
    pub(crate) doc_type: String,
    pub(crate) data: Attributes,
    #[serde(skip)]
    pub(crate) state: DocumentState,
}

impl Document {
    /// Creates a transient document.
    ///
    /// An absent or empty `key` is replaced by a generated one; an absent
    /// `data` becomes an empty bag.
    pub fn new(key: Option<&str>, doc_type: impl Into<String>, data: Option<Attributes>) -> Self {
        Self {
            id: None,
            key: resolve_key(key),
            doc_type: doc_type.into(),
            data: data.unwrap_or_default(),
            state: DocumentState::Transient,
        }
    }

    /// Rebuilds a persisted handle from stored parts.
    pub(crate) fn persisted(
        id: DocumentId,
        key: String,
        doc_type: String,
        data: Attributes,
    ) -> Self {
        Self {
            id: Some(id),
            key,
            doc_type,
            data,
            state: DocumentState::Persisted,
        }
    }

    /// Backend-assigned id; `None` until first persisted.
    pub fn id(&self) -> Option<DocumentId> {
        self.id
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn doc_type(&self) -> &str {
        &self.doc_type
    }

    pub fn data(&self) -> &Attributes {
        &self.data
    }

    /// Single attribute lookup.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.data.get(name)
    }

    pub fn state(&self) -> DocumentState {
        self.state
    }

    /// Reclassifies the document. Takes effect on the next persist.
    pub fn set_type(&mut self, doc_type: impl Into<String>) -> &mut Self {
        self.doc_type = doc_type.into();
        self
    }

    /// Merges attributes into the bag.
    ///
    /// Same-named attributes are overwritten; all others are left alone.
    /// Does not persist.
    pub fn update<I, K, V>(&mut self, fields: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        for (name, value) in fields {
            self.data.insert(name.into(), value.into());
        }
        self
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Document({:?})>", self.key)
    }
}
