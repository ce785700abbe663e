//! Document model
//!
//! - `Document`: key, type tag, attribute bag, lifecycle state
//! - Key generation for documents created without a key

mod key;
mod types;

pub use key::{generate_key, resolve_key, GENERATED_KEY_LEN};
pub use types::{Attributes, Document, DocumentId, DocumentState};
