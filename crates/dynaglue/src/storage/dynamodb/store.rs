//! DynamoDB document store implementation.
//!
//! Implements `DocumentStore` from `dynaglue_core::storage` on top of
//! `aws-sdk-dynamodb`. Requests are forwarded one-to-one; this layer only
//! converts attribute maps and maps errors.

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;

use dynaglue_core::storage::{
    DeleteRequest, Document, DocumentStore, GetRequest, PutRequest, QueryRequest, ScanRequest,
    StorePage, StoreResult, UpdateRequest,
};

use super::conversions::{
    document_to_item, expression_names, expression_values, item_to_document, items_to_documents,
    last_evaluated_key, optional_key, page_limit, return_value,
};
use super::error::{
    map_delete_item_error, map_get_item_error, map_put_item_error, map_query_error,
    map_scan_error, map_update_item_error,
};

/// DynamoDB-backed document store.
///
/// The table is chosen per request, so one store serves any number of tables.
#[derive(Debug, Clone)]
pub struct DynamoDbStore {
    client: Client,
}

impl DynamoDbStore {
    /// Creates a new store around an existing DynamoDB client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DocumentStore for DynamoDbStore {
    async fn put(&self, request: PutRequest) -> StoreResult<()> {
        let item = document_to_item(&request.item)?;

        self.client
            .put_item()
            .table_name(request.table_name)
            .set_item(Some(item))
            .send()
            .await
            .map_err(map_put_item_error)?;

        Ok(())
    }

    async fn get(&self, request: GetRequest) -> StoreResult<Option<Document>> {
        let key = document_to_item(&request.key)?;

        let result = self
            .client
            .get_item()
            .table_name(request.table_name)
            .set_key(Some(key))
            .send()
            .await
            .map_err(map_get_item_error)?;

        result.item.map(item_to_document).transpose()
    }

    async fn update(&self, request: UpdateRequest) -> StoreResult<Document> {
        let key = document_to_item(&request.key)?;
        let values = expression_values(&request.expression_attribute_values)?;

        let result = self
            .client
            .update_item()
            .table_name(request.table_name)
            .set_key(Some(key))
            .update_expression(request.update_expression)
            .set_condition_expression(request.condition_expression)
            .set_expression_attribute_names(expression_names(&request.expression_attribute_names))
            .set_expression_attribute_values(values)
            .return_values(return_value(request.return_values))
            .send()
            .await
            .map_err(map_update_item_error)?;

        match result.attributes {
            Some(attributes) => item_to_document(attributes),
            None => Ok(Document::new()),
        }
    }

    async fn delete(&self, request: DeleteRequest) -> StoreResult<Option<Document>> {
        let key = document_to_item(&request.key)?;

        let result = self
            .client
            .delete_item()
            .table_name(request.table_name)
            .set_key(Some(key))
            .return_values(return_value(request.return_values))
            .send()
            .await
            .map_err(map_delete_item_error)?;

        match result.attributes {
            Some(attributes) if !attributes.is_empty() => item_to_document(attributes).map(Some),
            _ => Ok(None),
        }
    }

    async fn query(&self, request: QueryRequest) -> StoreResult<StorePage> {
        let values = expression_values(&request.expression_attribute_values)?;
        let exclusive_start_key = optional_key(request.exclusive_start_key.as_ref())?;

        let result = self
            .client
            .query()
            .table_name(request.table_name)
            .set_index_name(request.index_name)
            .set_key_condition_expression(request.key_condition_expression)
            .set_filter_expression(request.filter_expression)
            .set_expression_attribute_names(expression_names(&request.expression_attribute_names))
            .set_expression_attribute_values(values)
            .set_limit(page_limit(request.limit))
            .set_exclusive_start_key(exclusive_start_key)
            .send()
            .await
            .map_err(map_query_error)?;

        Ok(StorePage {
            items: items_to_documents(result.items)?,
            last_evaluated_key: last_evaluated_key(result.last_evaluated_key)?,
        })
    }

    async fn scan(&self, request: ScanRequest) -> StoreResult<StorePage> {
        let values = expression_values(&request.expression_attribute_values)?;
        let exclusive_start_key = optional_key(request.exclusive_start_key.as_ref())?;

        let result = self
            .client
            .scan()
            .table_name(request.table_name)
            .set_index_name(request.index_name)
            .set_filter_expression(request.filter_expression)
            .set_expression_attribute_names(expression_names(&request.expression_attribute_names))
            .set_expression_attribute_values(values)
            .set_limit(page_limit(request.limit))
            .set_exclusive_start_key(exclusive_start_key)
            .send()
            .await
            .map_err(map_scan_error)?;

        Ok(StorePage {
            items: items_to_documents(result.items)?,
            last_evaluated_key: last_evaluated_key(result.last_evaluated_key)?,
        })
    }
}
