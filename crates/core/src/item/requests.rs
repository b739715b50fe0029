//! Caller-facing input types for item operations.
//!
//! Following the Functional Core pattern, these are pure data types with no I/O.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::storage::Document;

use super::cursor::Cursor;

/// Attribute changes for an update.
///
/// Each entry is either present (`Some`) or explicitly absent (`None`).
/// Absent entries are skipped when the update expression is built, which is
/// how callers express a partial update from a sparse input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Patch {
    entries: BTreeMap<String, Option<Value>>,
}

impl Patch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an attribute to a new value.
    pub fn set(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries.insert(name.into(), Some(value.into()));
        self
    }

    /// Marks an attribute as absent so it is left untouched.
    pub fn skip(mut self, name: impl Into<String>) -> Self {
        self.entries.insert(name.into(), None);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Option<Value>) {
        self.entries.insert(name.into(), value);
    }

    /// Iterates over the entries that carry a value, in name order.
    pub fn present(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries
            .iter()
            .filter_map(|(name, value)| value.as_ref().map(|v| (name.as_str(), v)))
    }

    /// Returns true when at least one entry carries a value.
    pub fn has_values(&self) -> bool {
        self.entries.values().any(Option::is_some)
    }

    /// Removes an entry, returning whether it existed.
    pub fn remove(&mut self, name: &str) -> bool {
        self.entries.remove(name).is_some()
    }
}

impl From<Document> for Patch {
    fn from(document: Document) -> Self {
        document
            .into_iter()
            .map(|(name, value)| (name, Some(value)))
            .collect()
    }
}

impl FromIterator<(String, Option<Value>)> for Patch {
    fn from_iter<I: IntoIterator<Item = (String, Option<Value>)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// An equality match on a key attribute of a table or index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyMatch {
    pub name: String,
    pub value: Value,
}

impl KeyMatch {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A caller-written filter expression with its own placeholder bindings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSpec {
    pub expression: String,
    /// `#placeholder` -> attribute name.
    pub names: BTreeMap<String, String>,
    /// `:placeholder` -> value.
    pub values: Document,
}

impl FilterSpec {
    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            ..Default::default()
        }
    }

    /// Binds a `#placeholder` to an attribute name.
    pub fn name(mut self, placeholder: impl Into<String>, attribute: impl Into<String>) -> Self {
        self.names.insert(placeholder.into(), attribute.into());
        self
    }

    /// Binds a `:placeholder` to a value.
    pub fn value(mut self, placeholder: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(placeholder.into(), value.into());
        self
    }
}

/// Query options. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QuerySpec {
    /// Exact-id lookup; turns the result into a single item.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash_key: Option<KeyMatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range_key: Option<KeyMatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<FilterSpec>,
    /// Maximum number of items the store evaluates. Zero means no limit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<Cursor>,
}

impl QuerySpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a single item by id.
    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    pub fn on_index(mut self, index_name: impl Into<String>) -> Self {
        self.index_name = Some(index_name.into());
        self
    }

    pub fn with_hash_key(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.hash_key = Some(KeyMatch::new(name, value));
        self
    }

    pub fn with_range_key(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.range_key = Some(KeyMatch::new(name, value));
        self
    }

    pub fn with_filter(mut self, filter: FilterSpec) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Resumes after the page that produced `cursor`.
    pub fn after(mut self, cursor: Cursor) -> Self {
        self.cursor = Some(cursor);
        self
    }
}

/// Scan options: a [`QuerySpec`] without key fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScanSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<FilterSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<Cursor>,
}

impl ScanSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_index(mut self, index_name: impl Into<String>) -> Self {
        self.index_name = Some(index_name.into());
        self
    }

    pub fn with_filter(mut self, filter: FilterSpec) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn after(mut self, cursor: Cursor) -> Self {
        self.cursor = Some(cursor);
        self
    }
}
