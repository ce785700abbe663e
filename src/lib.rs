//! docstore - A minimal embedded key/value document store
//!
//! Each document has a unique string key, a type tag, and an open attribute
//! bag. Documents are created, persisted, updated, deleted, found by key,
//! and searched by type plus exact attribute values.
//!
//! ```ignore
//! use docstore::{AttributeFilter, DocumentStore};
//! use serde_json::json;
//!
//! let mut store = DocumentStore::in_memory();
//!
//! let mut doc = store.create(Some("britone"), "person", json!({"role": "manager"}).as_object().cloned());
//! store.persist(&mut doc)?;
//!
//! store.update(&mut doc, [("email", "britone@new-domain.com")])?;
//! store.persist(&mut doc)?;
//!
//! let managers = store.search("person", &[AttributeFilter::eq("role", "manager")])?;
//! store.delete(&mut doc)?;
//! store.close()?;
//! ```

pub mod cli;
pub mod config;
pub mod document;
pub mod observability;
pub mod query;
pub mod storage;
pub mod store;

pub use config::{BackendKind, StoreConfig};
pub use document::{Attributes, Document, DocumentId, DocumentState};
pub use query::AttributeFilter;
pub use store::{DocumentStore, StoreError, StoreResult};
