mod error;
mod traits;
mod types;

pub use error::{StoreError, StoreResult};
pub use traits::DocumentStore;
pub use types::{
    AttributeNames, DeleteRequest, Document, GetRequest, PutRequest, QueryRequest, ReturnValues,
    ScanRequest, StorePage, UpdateRequest,
};
