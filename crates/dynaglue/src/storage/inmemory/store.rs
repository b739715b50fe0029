//! In-memory document store implementation.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use dynaglue_core::item::ID_ATTRIBUTE;
use dynaglue_core::storage::{
    DeleteRequest, Document, DocumentStore, GetRequest, PutRequest, QueryRequest, ReturnValues,
    ScanRequest, StoreError, StorePage, StoreResult, UpdateRequest,
};

use super::expression::Bindings;

type Table = BTreeMap<String, Document>;

/// In-memory storage backend for tests and local experiments.
///
/// Tables hold documents keyed by their `id` and iterate in `id` order.
/// Tables must exist before use, like in the remote store. Data is not
/// persisted and is lost when the last clone is dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<HashMap<String, Table>>>,
}

impl InMemoryStore {
    /// Creates a store without tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with the given empty tables.
    pub fn with_tables<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tables = names
            .into_iter()
            .map(|name| (name.into(), Table::new()))
            .collect();
        Self {
            tables: Arc::new(RwLock::new(tables)),
        }
    }

    /// Creates an empty table if it does not exist yet.
    pub async fn create_table(&self, name: impl Into<String>) {
        let mut tables = self.tables.write().await;
        tables.entry(name.into()).or_default();
    }

    /// Number of items stored in a table.
    pub async fn item_count(&self, table: &str) -> StoreResult<usize> {
        let tables = self.tables.read().await;
        Ok(table_ref(&tables, table)?.len())
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn put(&self, request: PutRequest) -> StoreResult<()> {
        let id = key_id(&request.item)?;
        let mut tables = self.tables.write().await;
        table_mut(&mut tables, &request.table_name)?.insert(id, request.item);
        Ok(())
    }

    async fn get(&self, request: GetRequest) -> StoreResult<Option<Document>> {
        let id = key_id(&request.key)?;
        let tables = self.tables.read().await;
        Ok(table_ref(&tables, &request.table_name)?.get(&id).cloned())
    }

    async fn update(&self, request: UpdateRequest) -> StoreResult<Document> {
        let id = key_id(&request.key)?;
        let bindings = Bindings::new(
            &request.expression_attribute_names,
            &request.expression_attribute_values,
        );

        let mut tables = self.tables.write().await;
        let table = table_mut(&mut tables, &request.table_name)?;
        let old = table.get(&id).cloned();

        let current = old.clone().unwrap_or_default();
        if let Some(condition) = &request.condition_expression {
            if !bindings.matches(condition, &current)? {
                return Err(StoreError::ConditionFailed);
            }
        }

        // A missing item is created from its key, as the remote store does.
        let mut updated = old.clone().unwrap_or_else(|| request.key.clone());
        bindings.apply_update(&request.update_expression, &mut updated)?;
        table.insert(id, updated.clone());

        Ok(match request.return_values {
            ReturnValues::AllNew => updated,
            ReturnValues::AllOld => old.unwrap_or_default(),
            ReturnValues::None => Document::new(),
        })
    }

    async fn delete(&self, request: DeleteRequest) -> StoreResult<Option<Document>> {
        let id = key_id(&request.key)?;
        let mut tables = self.tables.write().await;
        let old = table_mut(&mut tables, &request.table_name)?.remove(&id);

        Ok(match request.return_values {
            ReturnValues::AllOld => old,
            _ => None,
        })
    }

    async fn query(&self, request: QueryRequest) -> StoreResult<StorePage> {
        let key_condition = request.key_condition_expression.as_deref().ok_or_else(|| {
            StoreError::Validation("Query requires a key condition expression".to_string())
        })?;
        let bindings = Bindings::new(
            &request.expression_attribute_names,
            &request.expression_attribute_values,
        );

        let tables = self.tables.read().await;
        collect_page(
            table_ref(&tables, &request.table_name)?,
            Some(key_condition),
            request.filter_expression.as_deref(),
            &bindings,
            request.limit,
            request.exclusive_start_key.as_ref(),
        )
    }

    async fn scan(&self, request: ScanRequest) -> StoreResult<StorePage> {
        let bindings = Bindings::new(
            &request.expression_attribute_names,
            &request.expression_attribute_values,
        );

        let tables = self.tables.read().await;
        collect_page(
            table_ref(&tables, &request.table_name)?,
            None,
            request.filter_expression.as_deref(),
            &bindings,
            request.limit,
            request.exclusive_start_key.as_ref(),
        )
    }
}

fn table_ref<'t>(tables: &'t HashMap<String, Table>, name: &str) -> StoreResult<&'t Table> {
    tables
        .get(name)
        .ok_or_else(|| StoreError::TableNotFound(name.to_string()))
}

fn table_mut<'t>(tables: &'t mut HashMap<String, Table>, name: &str) -> StoreResult<&'t mut Table> {
    tables
        .get_mut(name)
        .ok_or_else(|| StoreError::TableNotFound(name.to_string()))
}

fn key_id(key: &Document) -> StoreResult<String> {
    match key.get(ID_ATTRIBUTE) {
        Some(Value::String(id)) if !id.is_empty() => Ok(id.clone()),
        _ => Err(StoreError::Validation(format!(
            "Missing key element: {ID_ATTRIBUTE}"
        ))),
    }
}

/// Walks the table in key order, mirroring the remote store's paging rules:
/// `limit` caps the items evaluated against the key condition, the filter is
/// applied afterwards, and a pagination key is returned only when items remain.
fn collect_page(
    table: &Table,
    key_condition: Option<&str>,
    filter: Option<&str>,
    bindings: &Bindings<'_>,
    limit: Option<u32>,
    exclusive_start_key: Option<&Document>,
) -> StoreResult<StorePage> {
    let start_after = exclusive_start_key.map(key_id).transpose()?;
    let limit = limit.map(|limit| limit as usize);

    let mut evaluated: Vec<(&String, &Document)> = Vec::new();
    let mut more = false;
    for (id, item) in table {
        if start_after.as_ref().is_some_and(|start| id <= start) {
            continue;
        }
        if let Some(condition) = key_condition {
            if !bindings.matches(condition, item)? {
                continue;
            }
        }
        if limit.is_some_and(|limit| evaluated.len() >= limit) {
            more = true;
            break;
        }
        evaluated.push((id, item));
    }

    let last_evaluated_key = match (more, evaluated.last()) {
        (true, Some((id, _))) => {
            let mut key = Document::new();
            key.insert(ID_ATTRIBUTE.to_string(), Value::String(id.to_string()));
            Some(key)
        }
        _ => None,
    };

    let mut items = Vec::with_capacity(evaluated.len());
    for (_, item) in evaluated {
        let keep = match filter {
            Some(filter) => bindings.matches(filter, item)?,
            None => true,
        };
        if keep {
            items.push(item.clone());
        }
    }

    Ok(StorePage {
        items,
        last_evaluated_key,
    })
}
