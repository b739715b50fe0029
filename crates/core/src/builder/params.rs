//! Pure functions that shape native store requests and reshape responses.
//!
//! None of these perform I/O. The imperative shell sends what they build.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::item::{
    Cursor, Item, ItemError, PageResult, Patch, QuerySpec, Result, ScanSpec, ID_ATTRIBUTE,
};
use crate::storage::{
    DeleteRequest, Document, GetRequest, PutRequest, QueryRequest, ReturnValues, ScanRequest,
    StorePage, UpdateRequest,
};

use super::expressions::{filter_expression, key_condition, update_expression, ExpressionParams};

/// Condition attached to updates so a missing item is never upserted.
pub const ITEM_EXISTS_CONDITION: &str = "attribute_exists(id)";

/// Primary key document for an item id.
pub fn item_key(id: &str) -> Document {
    let mut key = Document::new();
    key.insert(ID_ATTRIBUTE.to_string(), Value::String(id.to_string()));
    key
}

/// Unconditional insert of a fully built item.
pub fn build_put(table: &str, item: &Item) -> PutRequest {
    PutRequest {
        table_name: table.to_string(),
        item: item.to_document(),
    }
}

pub fn build_get(table: &str, id: &str) -> GetRequest {
    GetRequest {
        table_name: table.to_string(),
        key: item_key(id),
    }
}

/// Update of the present patch entries plus `updatedAt`, returning the new image.
pub fn build_update(
    table: &str,
    id: &str,
    patch: &Patch,
    updated_at: &DateTime<Utc>,
) -> Result<UpdateRequest> {
    let mut params = ExpressionParams::new();
    let update_expression = update_expression(patch, updated_at, &mut params)?;
    let (names, values) = params.into_parts();

    Ok(UpdateRequest {
        table_name: table.to_string(),
        key: item_key(id),
        update_expression,
        condition_expression: Some(ITEM_EXISTS_CONDITION.to_string()),
        expression_attribute_names: names,
        expression_attribute_values: values,
        return_values: ReturnValues::AllNew,
    })
}

/// Delete by id, asking for the prior image so a missing item is detectable.
pub fn build_delete(table: &str, id: &str) -> DeleteRequest {
    DeleteRequest {
        table_name: table.to_string(),
        key: item_key(id),
        return_values: ReturnValues::AllOld,
    }
}

pub fn build_query(table: &str, spec: &QuerySpec) -> Result<QueryRequest> {
    let mut params = ExpressionParams::new();
    let key_condition_expression = key_condition(spec, &mut params)?;
    let filter_expression = filter_expression(spec.filter.as_ref(), &mut params)?;
    let exclusive_start_key = spec.cursor.as_ref().map(Cursor::decode).transpose()?;
    let (names, values) = params.into_parts();

    Ok(QueryRequest {
        table_name: table.to_string(),
        index_name: spec.index_name.clone(),
        key_condition_expression,
        filter_expression,
        expression_attribute_names: names,
        expression_attribute_values: values,
        limit: effective_limit(spec.limit),
        exclusive_start_key,
    })
}

pub fn build_scan(table: &str, spec: &ScanSpec) -> Result<ScanRequest> {
    let mut params = ExpressionParams::new();
    let filter_expression = filter_expression(spec.filter.as_ref(), &mut params)?;
    let exclusive_start_key = spec.cursor.as_ref().map(Cursor::decode).transpose()?;
    let (names, values) = params.into_parts();

    Ok(ScanRequest {
        table_name: table.to_string(),
        index_name: spec.index_name.clone(),
        filter_expression,
        expression_attribute_names: names,
        expression_attribute_values: values,
        limit: effective_limit(spec.limit),
        exclusive_start_key,
    })
}

/// Converts a store page into items and an encoded continuation cursor.
///
/// Every item must carry `id`, `createdAt` and `updatedAt`, so a table read
/// through here must only be written through the item operations. An item
/// without them fails the page with [`ItemError::InvalidItem`] naming its id.
pub fn page_from_response(page: StorePage) -> Result<PageResult> {
    let items = page
        .items
        .into_iter()
        .map(item_from_page_document)
        .collect::<Result<Vec<_>>>()?;
    let continuation_cursor = page
        .last_evaluated_key
        .as_ref()
        .map(Cursor::encode)
        .transpose()?;

    Ok(PageResult {
        items,
        continuation_cursor,
    })
}

fn item_from_page_document(document: Document) -> Result<Item> {
    let id = match document.get(ID_ATTRIBUTE) {
        Some(Value::String(id)) => id.clone(),
        _ => "<none>".to_string(),
    };
    Item::from_document(document).map_err(|err| match err {
        ItemError::InvalidItem(reason) => ItemError::InvalidItem(format!("{reason} (id {id})")),
        err => err,
    })
}

/// A zero limit means "no limit".
fn effective_limit(limit: Option<u32>) -> Option<u32> {
    limit.filter(|limit| *limit > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::FilterSpec;
    use crate::serde::parse_timestamp;
    use serde_json::json;

    fn document(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    fn now() -> DateTime<Utc> {
        parse_timestamp("2024-01-15T10:30:00.000Z").unwrap()
    }

    #[test]
    fn test_build_put_writes_full_item() {
        let item = Item::new("abc", now(), document(json!({"name": "Ada"})));
        let request = build_put("people", &item);
        assert_eq!(request.table_name, "people");
        assert_eq!(request.item, item.to_document());
    }

    #[test]
    fn test_build_get_and_delete_use_id_key() {
        assert_eq!(build_get("people", "abc").key, document(json!({"id": "abc"})));

        let delete = build_delete("people", "abc");
        assert_eq!(delete.key, document(json!({"id": "abc"})));
        assert_eq!(delete.return_values, ReturnValues::AllOld);
    }

    #[test]
    fn test_build_update_requests_new_image_and_existence() {
        let patch = Patch::new().set("name", "Grace");
        let request = build_update("people", "abc", &patch, &now()).unwrap();

        assert_eq!(request.key, document(json!({"id": "abc"})));
        assert_eq!(request.update_expression, "SET #p0 = :p0, #updatedAt = :updatedAt");
        assert_eq!(
            request.condition_expression.as_deref(),
            Some(ITEM_EXISTS_CONDITION)
        );
        assert_eq!(request.return_values, ReturnValues::AllNew);
        assert_eq!(
            request.expression_attribute_values,
            document(json!({":p0": "Grace", ":updatedAt": "2024-01-15T10:30:00.000Z"}))
        );
    }

    #[test]
    fn test_build_update_without_values_fails() {
        let patch = Patch::new().skip("name");
        assert_eq!(
            build_update("people", "abc", &patch, &now()),
            Err(ItemError::NoUpdateValues)
        );
    }

    #[test]
    fn test_build_query_by_id() {
        let request = build_query("people", &QuerySpec::by_id("abc")).unwrap();
        assert_eq!(request.key_condition_expression.as_deref(), Some("id = :id"));
        assert!(request.expression_attribute_names.is_empty());
        assert_eq!(
            request.expression_attribute_values,
            document(json!({":id": "abc"}))
        );
        assert!(request.filter_expression.is_none());
        assert!(request.index_name.is_none());
    }

    #[test]
    fn test_build_query_on_index_with_filter_limit_and_cursor() {
        let cursor = Cursor::encode(&document(json!({"id": "x", "ownerId": "u-1"}))).unwrap();
        let spec = QuerySpec::new()
            .on_index("byOwner")
            .with_hash_key("ownerId", "u-1")
            .with_filter(FilterSpec::new("#a >= :min").name("#a", "age").value(":min", 18))
            .with_limit(25)
            .after(cursor);

        let request = build_query("people", &spec).unwrap();

        assert_eq!(request.index_name.as_deref(), Some("byOwner"));
        assert_eq!(
            request.key_condition_expression.as_deref(),
            Some("#ownerId = :ownerId")
        );
        assert_eq!(request.filter_expression.as_deref(), Some("#a >= :min"));
        assert_eq!(request.expression_attribute_names.len(), 2);
        assert_eq!(
            request.expression_attribute_values,
            document(json!({":ownerId": "u-1", ":min": 18}))
        );
        assert_eq!(request.limit, Some(25));
        assert_eq!(
            request.exclusive_start_key,
            Some(document(json!({"id": "x", "ownerId": "u-1"})))
        );
    }

    #[test]
    fn test_build_query_rejects_conflicting_filter_placeholder() {
        let spec = QuerySpec::new()
            .with_hash_key("status", "open")
            .with_filter(FilterSpec::new(":status <> :x").value(":status", "closed"));
        assert_eq!(
            build_query("people", &spec),
            Err(ItemError::PlaceholderConflict(":status".to_string()))
        );
    }

    #[test]
    fn test_build_query_rejects_bad_cursor() {
        let spec = QuerySpec::new()
            .with_hash_key("ownerId", "u-1")
            .after(Cursor::from("%%%"));
        assert!(matches!(
            build_query("people", &spec),
            Err(ItemError::InvalidCursor(_))
        ));
    }

    #[test]
    fn test_zero_limit_is_ignored() {
        let request = build_scan("people", &ScanSpec::new().with_limit(0)).unwrap();
        assert_eq!(request.limit, None);
    }

    #[test]
    fn test_build_scan_has_only_filter_bindings() {
        let spec = ScanSpec::new()
            .with_filter(FilterSpec::new("#s = :s").name("#s", "status").value(":s", "open"))
            .with_limit(2);
        let request = build_scan("people", &spec).unwrap();

        assert_eq!(request.filter_expression.as_deref(), Some("#s = :s"));
        assert_eq!(
            request.expression_attribute_values,
            document(json!({":s": "open"}))
        );
        assert_eq!(request.limit, Some(2));
        assert!(request.exclusive_start_key.is_none());
    }

    #[test]
    fn test_page_from_response_encodes_cursor() {
        let item = Item::new("abc", now(), Document::new());
        let page = page_from_response(StorePage {
            items: vec![item.to_document()],
            last_evaluated_key: Some(document(json!({"id": "abc"}))),
        })
        .unwrap();

        assert_eq!(page.items, vec![item]);
        let cursor = page.continuation_cursor.unwrap();
        assert_eq!(cursor.decode().unwrap(), document(json!({"id": "abc"})));
    }

    #[test]
    fn test_page_from_response_without_key_has_no_cursor() {
        let page = page_from_response(StorePage::default()).unwrap();
        assert!(page.items.is_empty());
        assert!(page.continuation_cursor.is_none());
    }

    #[test]
    fn test_page_from_response_rejects_malformed_items() {
        let result = page_from_response(StorePage {
            items: vec![document(json!({"name": "no id"}))],
            last_evaluated_key: None,
        });
        assert!(matches!(result, Err(ItemError::InvalidItem(_))));
    }

    #[test]
    fn test_page_with_item_missing_timestamps_names_the_item() {
        let valid = Item::new("abc", now(), Document::new()).to_document();
        let foreign = document(json!({"id": "legacy-1", "name": "written elsewhere"}));

        let result = page_from_response(StorePage {
            items: vec![valid, foreign],
            last_evaluated_key: None,
        });

        assert_eq!(
            result,
            Err(ItemError::InvalidItem(
                "Missing or invalid field: createdAt (id legacy-1)".to_string()
            ))
        );
    }

    #[test]
    fn test_build_query_with_colliding_key_names() {
        let spec = QuerySpec::new()
            .on_index("byOwner")
            .with_hash_key("owner-id", "u-1")
            .with_range_key("owner_id", "x");

        let request = build_query("t", &spec).unwrap();

        assert_eq!(
            request.key_condition_expression.as_deref(),
            Some("#owner_id = :owner_id AND #owner_id_1 = :owner_id_1")
        );
        assert_eq!(
            request.expression_attribute_values,
            document(json!({":owner_id": "u-1", ":owner_id_1": "x"}))
        );
    }
}
