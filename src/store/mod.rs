//! The document store
//!
//! Owns every persisted document and exposes the public call surface:
//! `create`, `persist`, `update`, `delete`, `find`, `search`.

mod errors;
#[allow(clippy::module_inception)]
mod store;

pub use errors::{StoreError, StoreResult};
pub use store::DocumentStore;
