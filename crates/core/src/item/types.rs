use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::serde::{format_timestamp, parse_timestamp};
use crate::storage::Document;

use super::cursor::Cursor;
use super::error::{ItemError, Result};

pub const ID_ATTRIBUTE: &str = "id";
pub const CREATED_AT_ATTRIBUTE: &str = "createdAt";
pub const UPDATED_AT_ATTRIBUTE: &str = "updatedAt";

/// Attribute names owned by this layer rather than by callers.
pub const RESERVED_ATTRIBUTES: [&str; 3] =
    [ID_ATTRIBUTE, CREATED_AT_ATTRIBUTE, UPDATED_AT_ATTRIBUTE];

/// Returns true when `name` is one of the bookkeeping attributes.
pub fn is_reserved_attribute(name: &str) -> bool {
    RESERVED_ATTRIBUTES.contains(&name)
}

/// A stored record: bookkeeping fields plus arbitrary caller attributes.
///
/// `attributes` never contains the reserved names.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub attributes: Document,
}

impl Item {
    /// Builds a freshly created item with `createdAt == updatedAt == now`.
    ///
    /// Reserved names present in `attributes` are dropped.
    pub fn new(id: impl Into<String>, now: DateTime<Utc>, mut attributes: Document) -> Self {
        attributes.retain(|name, _| !is_reserved_attribute(name));
        Self {
            id: id.into(),
            created_at: now,
            updated_at: now,
            attributes,
        }
    }

    /// Returns a caller attribute by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Flattens the item into the document written to the store.
    pub fn to_document(&self) -> Document {
        let mut document = self.attributes.clone();
        document.insert(ID_ATTRIBUTE.to_string(), Value::String(self.id.clone()));
        document.insert(
            CREATED_AT_ATTRIBUTE.to_string(),
            Value::String(format_timestamp(&self.created_at)),
        );
        document.insert(
            UPDATED_AT_ATTRIBUTE.to_string(),
            Value::String(format_timestamp(&self.updated_at)),
        );
        document
    }

    /// Parses a store document back into an item.
    pub fn from_document(mut document: Document) -> Result<Self> {
        let id = match document.remove(ID_ATTRIBUTE) {
            Some(Value::String(id)) if !id.is_empty() => id,
            _ => {
                return Err(ItemError::InvalidItem(format!(
                    "Missing or invalid field: {ID_ATTRIBUTE}"
                )))
            }
        };
        let created_at = take_timestamp(&mut document, CREATED_AT_ATTRIBUTE)?;
        let updated_at = take_timestamp(&mut document, UPDATED_AT_ATTRIBUTE)?;

        Ok(Self {
            id,
            created_at,
            updated_at,
            attributes: document,
        })
    }
}

impl Serialize for Item {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_document().serialize(serializer)
    }
}

fn take_timestamp(document: &mut Document, key: &str) -> Result<DateTime<Utc>> {
    match document.remove(key) {
        Some(Value::String(value)) => parse_timestamp(&value)
            .map_err(|e| ItemError::InvalidItem(format!("Invalid datetime {key}: {e}"))),
        _ => Err(ItemError::InvalidItem(format!(
            "Missing or invalid field: {key}"
        ))),
    }
}

/// One page of query or scan results.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult {
    pub items: Vec<Item>,
    /// Pass back verbatim to fetch the next page; absent on the last page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continuation_cursor: Option<Cursor>,
}

impl PageResult {
    /// Returns true when more pages remain.
    pub fn has_more(&self) -> bool {
        self.continuation_cursor.is_some()
    }
}

/// Result of a query: a single item for exact-id lookups, a page otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryOutput {
    Item(Item),
    Page(PageResult),
}

impl QueryOutput {
    pub fn into_item(self) -> Option<Item> {
        match self {
            Self::Item(item) => Some(item),
            Self::Page(_) => None,
        }
    }

    pub fn into_page(self) -> Option<PageResult> {
        match self {
            Self::Item(_) => None,
            Self::Page(page) => Some(page),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        parse_timestamp("2024-01-15T10:30:00.000Z").unwrap()
    }

    fn document(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_new_sets_both_timestamps() {
        let item = Item::new("abc", now(), document(json!({"name": "Ada"})));
        assert_eq!(item.created_at, item.updated_at);
        assert_eq!(item.get("name"), Some(&json!("Ada")));
    }

    #[test]
    fn test_new_drops_reserved_attributes() {
        let item = Item::new(
            "generated",
            now(),
            document(json!({"id": "mine", "createdAt": "x", "updatedAt": "y", "name": "Ada"})),
        );
        assert_eq!(item.id, "generated");
        assert_eq!(item.created_at, now());
        assert_eq!(item.attributes, document(json!({"name": "Ada"})));
    }

    #[test]
    fn test_to_document_flattens_fields() {
        let item = Item::new("abc", now(), document(json!({"count": 3})));
        assert_eq!(
            item.to_document(),
            document(json!({
                "id": "abc",
                "createdAt": "2024-01-15T10:30:00.000Z",
                "updatedAt": "2024-01-15T10:30:00.000Z",
                "count": 3
            }))
        );
    }

    #[test]
    fn test_from_document_restores_item() {
        let item = Item::new("abc", now(), document(json!({"tags": ["a", "b"]})));
        assert_eq!(Item::from_document(item.to_document()).unwrap(), item);
    }

    #[test]
    fn test_from_document_requires_id() {
        let result = Item::from_document(document(json!({
            "createdAt": "2024-01-15T10:30:00.000Z",
            "updatedAt": "2024-01-15T10:30:00.000Z"
        })));
        assert!(matches!(result, Err(ItemError::InvalidItem(_))));
    }

    #[test]
    fn test_from_document_rejects_empty_id() {
        let result = Item::from_document(document(json!({
            "id": "",
            "createdAt": "2024-01-15T10:30:00.000Z",
            "updatedAt": "2024-01-15T10:30:00.000Z"
        })));
        assert!(matches!(result, Err(ItemError::InvalidItem(_))));
    }

    #[test]
    fn test_from_document_rejects_bad_timestamp() {
        let result = Item::from_document(document(json!({
            "id": "abc",
            "createdAt": "last tuesday",
            "updatedAt": "2024-01-15T10:30:00.000Z"
        })));
        assert!(matches!(
            result,
            Err(ItemError::InvalidItem(msg)) if msg.starts_with("Invalid datetime createdAt")
        ));
    }

    #[test]
    fn test_item_serializes_flat() {
        let item = Item::new("abc", now(), document(json!({"name": "Ada"})));
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["id"], "abc");
        assert_eq!(value["name"], "Ada");
        assert_eq!(value["updatedAt"], "2024-01-15T10:30:00.000Z");
    }

    #[test]
    fn test_page_result_omits_absent_cursor() {
        let page = PageResult::default();
        assert!(!page.has_more());
        assert_eq!(serde_json::to_value(&page).unwrap(), json!({"items": []}));
    }

    #[test]
    fn test_query_output_accessors() {
        let item = Item::new("abc", now(), Document::new());
        assert_eq!(QueryOutput::Item(item.clone()).into_item(), Some(item));
        assert!(QueryOutput::Page(PageResult::default()).into_item().is_none());
        assert!(QueryOutput::Page(PageResult::default()).into_page().is_some());
    }
}
