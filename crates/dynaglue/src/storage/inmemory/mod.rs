//! In-memory storage backend.

mod expression;
mod store;

pub use store::InMemoryStore;
