//! DynamoDB attribute conversion functions.
//!
//! Pure functions for converting between DynamoDB AttributeValue maps and
//! JSON documents. These are testable in isolation without DynamoDB access.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use dynaglue_core::storage::{AttributeNames, Document, ReturnValues, StoreError, StoreResult};

pub type AttributeMap = HashMap<String, AttributeValue>;

/// Convert a JSON document to a DynamoDB attribute map.
pub fn document_to_item(document: &Document) -> StoreResult<AttributeMap> {
    serde_dynamo::to_item(document)
        .map_err(|e| StoreError::Serialization(format!("Failed to encode item: {e}")))
}

/// Convert a DynamoDB attribute map to a JSON document.
pub fn item_to_document(item: AttributeMap) -> StoreResult<Document> {
    serde_dynamo::from_item(item)
        .map_err(|e| StoreError::Serialization(format!("Failed to decode item: {e}")))
}

/// Expression attribute values, omitted entirely when there are none.
///
/// DynamoDB rejects an empty `ExpressionAttributeValues` map.
pub fn expression_values(values: &Document) -> StoreResult<Option<AttributeMap>> {
    if values.is_empty() {
        return Ok(None);
    }
    document_to_item(values).map(Some)
}

/// Expression attribute names, omitted entirely when there are none.
pub fn expression_names(names: &AttributeNames) -> Option<HashMap<String, String>> {
    if names.is_empty() {
        return None;
    }
    Some(names.clone().into_iter().collect())
}

/// Optional key document, e.g. an `ExclusiveStartKey`.
pub fn optional_key(key: Option<&Document>) -> StoreResult<Option<AttributeMap>> {
    key.map(document_to_item).transpose()
}

/// Decode a `LastEvaluatedKey`. An empty map means the result set is exhausted.
pub fn last_evaluated_key(key: Option<AttributeMap>) -> StoreResult<Option<Document>> {
    match key {
        Some(key) if !key.is_empty() => item_to_document(key).map(Some),
        _ => Ok(None),
    }
}

pub fn items_to_documents(items: Option<Vec<AttributeMap>>) -> StoreResult<Vec<Document>> {
    items
        .unwrap_or_default()
        .into_iter()
        .map(item_to_document)
        .collect()
}

pub fn return_value(return_values: ReturnValues) -> ReturnValue {
    match return_values {
        ReturnValues::None => ReturnValue::None,
        ReturnValues::AllOld => ReturnValue::AllOld,
        ReturnValues::AllNew => ReturnValue::AllNew,
    }
}

/// DynamoDB takes the page size as an `i32`.
pub fn page_limit(limit: Option<u32>) -> Option<i32> {
    limit.map(|limit| i32::try_from(limit).unwrap_or(i32::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document(value: serde_json::Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_document_to_item_types() {
        let item = document_to_item(&document(json!({
            "id": "abc",
            "age": 36,
            "active": true,
            "nickname": null,
            "tags": ["a", "b"],
            "address": {"city": "London"}
        })))
        .unwrap();

        assert_eq!(item.get("id"), Some(&AttributeValue::S("abc".to_string())));
        assert_eq!(item.get("age"), Some(&AttributeValue::N("36".to_string())));
        assert_eq!(item.get("active"), Some(&AttributeValue::Bool(true)));
        assert_eq!(item.get("nickname"), Some(&AttributeValue::Null(true)));
        assert!(matches!(item.get("tags"), Some(AttributeValue::L(list)) if list.len() == 2));
        assert!(matches!(item.get("address"), Some(AttributeValue::M(map)) if map.contains_key("city")));
    }

    #[test]
    fn test_item_to_document() {
        let mut item = AttributeMap::new();
        item.insert("id".to_string(), AttributeValue::S("abc".to_string()));
        item.insert("count".to_string(), AttributeValue::N("3".to_string()));

        let document = item_to_document(item).unwrap();

        assert_eq!(document.get("id"), Some(&json!("abc")));
        assert_eq!(document.get("count"), Some(&json!(3)));
    }

    #[test]
    fn test_empty_expression_maps_are_omitted() {
        assert_eq!(expression_values(&Document::new()).unwrap(), None);
        assert_eq!(expression_names(&AttributeNames::new()), None);
    }

    #[test]
    fn test_expression_names_are_copied() {
        let mut names = AttributeNames::new();
        names.insert("#name".to_string(), "name".to_string());

        let converted = expression_names(&names).unwrap();

        assert_eq!(converted.get("#name").map(String::as_str), Some("name"));
    }

    #[test]
    fn test_empty_last_evaluated_key_means_exhausted() {
        assert_eq!(last_evaluated_key(None).unwrap(), None);
        assert_eq!(last_evaluated_key(Some(AttributeMap::new())).unwrap(), None);

        let mut key = AttributeMap::new();
        key.insert("id".to_string(), AttributeValue::S("abc".to_string()));
        assert_eq!(
            last_evaluated_key(Some(key)).unwrap(),
            Some(document(json!({"id": "abc"})))
        );
    }

    #[test]
    fn test_return_value_mapping() {
        assert_eq!(return_value(ReturnValues::None), ReturnValue::None);
        assert_eq!(return_value(ReturnValues::AllOld), ReturnValue::AllOld);
        assert_eq!(return_value(ReturnValues::AllNew), ReturnValue::AllNew);
    }

    #[test]
    fn test_page_limit_saturates() {
        assert_eq!(page_limit(None), None);
        assert_eq!(page_limit(Some(25)), Some(25));
        assert_eq!(page_limit(Some(u32::MAX)), Some(i32::MAX));
    }
}
