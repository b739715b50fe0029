//! Item operations over an injected document store (Imperative Shell).
//!
//! Each operation shapes its requests with the pure builders from
//! `dynaglue_core::builder`, awaits the store, and reshapes the response.

use chrono::Utc;
use uuid::Uuid;

use dynaglue_core::builder::{
    build_delete, build_get, build_put, build_query, build_scan, build_update, page_from_response,
};
use dynaglue_core::item::{
    is_reserved_attribute, Item, ItemError, PageResult, Patch, QueryOutput, QuerySpec, Result,
    ScanSpec, RESERVED_ATTRIBUTES,
};
use dynaglue_core::serde::{next_timestamp, truncate_to_millis};
use dynaglue_core::storage::{Document, DocumentStore, StoreError};

/// Create, update, delete, query and scan items in any table of a store.
///
/// Holds only the store handle. Build it once and share it.
#[derive(Debug, Clone)]
pub struct ItemClient<S> {
    store: S,
}

impl<S: DocumentStore> ItemClient<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Stores a new item with a generated id and fresh timestamps.
    ///
    /// Caller-supplied `id`, `createdAt` and `updatedAt` are ignored.
    pub async fn create(&self, table: &str, mut attributes: Document) -> Result<Item> {
        let ignored: Vec<String> = attributes
            .keys()
            .filter(|name| is_reserved_attribute(name))
            .cloned()
            .collect();
        if !ignored.is_empty() {
            tracing::warn!(table, ?ignored, "Ignoring reserved attributes on create");
            attributes.retain(|name, _| !is_reserved_attribute(name));
        }

        let now = truncate_to_millis(Utc::now());
        let item = Item::new(Uuid::new_v4().to_string(), now, attributes);

        self.store.put(build_put(table, &item)).await?;

        tracing::debug!(table, id = %item.id, "Item created");
        Ok(item)
    }

    /// Applies the present entries of `patch` to an existing item.
    ///
    /// Fails with [`ItemError::NoUpdateValues`] before touching the store when
    /// the patch carries nothing to write.
    pub async fn update(&self, table: &str, id: &str, mut patch: Patch) -> Result<Item> {
        for name in RESERVED_ATTRIBUTES {
            if patch.remove(name) {
                tracing::warn!(table, id, attribute = name, "Ignoring reserved attribute on update");
            }
        }
        if !patch.has_values() {
            return Err(ItemError::NoUpdateValues);
        }

        let current = self
            .store
            .get(build_get(table, id))
            .await?
            .ok_or_else(|| ItemError::not_found(table, id))?;
        let current = Item::from_document(current)?;

        let updated_at = next_timestamp(Utc::now(), current.updated_at);
        let request = build_update(table, id, &patch, &updated_at)?;

        let document = self.store.update(request).await.map_err(|err| match err {
            // The item was deleted after it was read.
            StoreError::ConditionFailed => ItemError::not_found(table, id),
            err => ItemError::Store(err),
        })?;

        tracing::debug!(table, id, count = patch.present().count(), "Item updated");
        Item::from_document(document)
    }

    /// Deletes an item, failing with [`ItemError::NotFound`] when it did not exist.
    pub async fn delete(&self, table: &str, id: &str) -> Result<()> {
        self.store
            .delete(build_delete(table, id))
            .await?
            .ok_or_else(|| ItemError::not_found(table, id))?;

        tracing::debug!(table, id, "Item deleted");
        Ok(())
    }

    /// Runs a query.
    ///
    /// With `spec.id` set the result is that single item, or
    /// [`ItemError::NotFound`] when nothing matches. Otherwise it is a page.
    pub async fn query(&self, table: &str, spec: &QuerySpec) -> Result<QueryOutput> {
        let request = build_query(table, spec)?;
        let page = self.store.query(request).await?;

        if let Some(id) = &spec.id {
            let document = page
                .items
                .into_iter()
                .next()
                .ok_or_else(|| ItemError::not_found(table, id.as_str()))?;
            return Item::from_document(document).map(QueryOutput::Item);
        }

        let page = page_from_response(page)?;
        tracing::debug!(table, count = page.items.len(), more = page.has_more(), "Query page");
        Ok(QueryOutput::Page(page))
    }

    /// Scans a table or index. Always returns a page.
    pub async fn scan(&self, table: &str, spec: &ScanSpec) -> Result<PageResult> {
        let request = build_scan(table, spec)?;
        let page = page_from_response(self.store.scan(request).await?)?;

        tracing::debug!(table, count = page.items.len(), more = page.has_more(), "Scan page");
        Ok(page)
    }
}
