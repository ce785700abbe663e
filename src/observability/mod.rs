//! Observability for the document store
//!
//! - Structured logging (JSON lines on stderr)
//! - Typed events
//! - Per-store operation counters
//!
//! Observability is read-only: it never changes the outcome of an operation,
//! and errors are logged in addition to being returned, never instead.
//!
//! # Usage
//!
//! ```ignore
//! use docstore::observability::{Event, Logger};
//!
//! Logger::info(Event::DocumentInsert.as_str(), &[("key", "alice")]);
//! ```

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsSnapshot, StoreMetrics};
