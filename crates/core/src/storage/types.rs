//! Native request and response shapes for the document store.
//!
//! These mirror the store's own parameter names (`TableName`, `Key`,
//! `UpdateExpression`, `ExclusiveStartKey`, ...) as plain data. Backends
//! translate them one-to-one into their client calls.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

/// An untyped attribute map as exchanged with the store.
pub type Document = Map<String, Value>;

/// Placeholder name bindings (`#name` -> attribute name).
pub type AttributeNames = BTreeMap<String, String>;

/// Which item image a write returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReturnValues {
    #[default]
    None,
    AllOld,
    AllNew,
}

/// Unconditional insert of a full item.
#[derive(Debug, Clone, PartialEq)]
pub struct PutRequest {
    pub table_name: String,
    pub item: Document,
}

/// Lookup of a single item by primary key.
#[derive(Debug, Clone, PartialEq)]
pub struct GetRequest {
    pub table_name: String,
    pub key: Document,
}

/// Attribute update of a single item by primary key.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateRequest {
    pub table_name: String,
    pub key: Document,
    pub update_expression: String,
    pub condition_expression: Option<String>,
    pub expression_attribute_names: AttributeNames,
    pub expression_attribute_values: Document,
    pub return_values: ReturnValues,
}

/// Removal of a single item by primary key.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteRequest {
    pub table_name: String,
    pub key: Document,
    pub return_values: ReturnValues,
}

/// Key-condition query against a table or index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryRequest {
    pub table_name: String,
    pub index_name: Option<String>,
    pub key_condition_expression: Option<String>,
    pub filter_expression: Option<String>,
    pub expression_attribute_names: AttributeNames,
    pub expression_attribute_values: Document,
    pub limit: Option<u32>,
    pub exclusive_start_key: Option<Document>,
}

/// Full scan of a table or index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanRequest {
    pub table_name: String,
    pub index_name: Option<String>,
    pub filter_expression: Option<String>,
    pub expression_attribute_names: AttributeNames,
    pub expression_attribute_values: Document,
    pub limit: Option<u32>,
    pub exclusive_start_key: Option<Document>,
}

/// One page of query or scan results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StorePage {
    pub items: Vec<Document>,
    /// Present when the store stopped before exhausting the result set.
    pub last_evaluated_key: Option<Document>,
}
