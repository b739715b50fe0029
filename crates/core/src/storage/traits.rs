use async_trait::async_trait;

use super::{
    DeleteRequest, Document, GetRequest, PutRequest, QueryRequest, ScanRequest, StorePage,
    StoreResult, UpdateRequest,
};

/// Client boundary for a remote document store.
///
/// Each method is one request/response exchange and is atomic on its own.
/// Implementations do not retry.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Writes a full item, replacing any item with the same key.
    async fn put(&self, request: PutRequest) -> StoreResult<()>;

    /// Reads an item by key.
    async fn get(&self, request: GetRequest) -> StoreResult<Option<Document>>;

    /// Applies an update expression and returns the image selected by
    /// `return_values` (empty for `ReturnValues::None`).
    ///
    /// A failed `condition_expression` yields [`StoreError::ConditionFailed`](super::StoreError::ConditionFailed).
    async fn update(&self, request: UpdateRequest) -> StoreResult<Document>;

    /// Deletes an item by key, returning the prior image when requested and
    /// an item existed.
    async fn delete(&self, request: DeleteRequest) -> StoreResult<Option<Document>>;

    /// Runs a key-condition query.
    async fn query(&self, request: QueryRequest) -> StoreResult<StorePage>;

    /// Scans a whole table or index.
    async fn scan(&self, request: ScanRequest) -> StoreResult<StorePage>;
}
