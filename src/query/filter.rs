//! Attribute filtering for search
//!
//! Exact match only, compared on the textual form of the stored value.
//! No partial, prefix, or range matching.

use std::borrow::Cow;

use serde_json::Value;

use crate::document::Attributes;

/// Exact-match predicate on one attribute of the data bag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeFilter {
    pub name: String,
    pub value: String,
}

impl AttributeFilter {
    /// Matches documents whose `name` attribute reads as `value`.
    pub fn eq(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Parses a `name=value` pair. The value may itself contain `=`.
    pub fn parse(pair: &str) -> Option<Self> {
        let (name, value) = pair.split_once('=')?;
        if name.is_empty() {
            return None;
        }
        Some(Self::eq(name, value))
    }

    /// Checks this predicate against a data bag.
    pub fn matches(&self, data: &Attributes) -> bool {
        match data.get(&self.name).and_then(attribute_text) {
            Some(text) => text == self.value,
            None => false,
        }
    }
}

/// Checks a data bag against all filters (AND semantics).
pub fn matches_all(data: &Attributes, filters: &[AttributeFilter]) -> bool {
    filters.iter().all(|filter| filter.matches(data))
}

/// Textual form of a stored attribute value.
///
/// Strings read as their contents; other values as compact JSON.
/// Null has no text.
pub fn attribute_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        other => Some(Cow::Owned(other.to_string())),
    }
}
