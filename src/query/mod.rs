//! Search predicates over the attribute bag
//!
//! Shared by every backend so that all of them agree on what a match is.

mod filter;

pub use filter::{attribute_text, matches_all, AttributeFilter};
