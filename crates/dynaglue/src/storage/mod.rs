//! Storage backend implementations.
//!
//! This module provides concrete implementations of the `DocumentStore` trait
//! defined in `dynaglue_core::storage`.
//!
//! # Feature Flags
//!
//! - `dynamodb` (default): AWS DynamoDB backend using `aws-sdk-dynamodb`
//!
//! The in-memory backend is always available and backs the test suite.
//!
//! # Examples
//!
//! Build without DynamoDB (library only, in-memory backend):
//! ```bash
//! cargo build -p dynaglue --no-default-features
//! ```

#[cfg(feature = "dynamodb")]
pub mod dynamodb;

pub mod inmemory;

#[cfg(feature = "dynamodb")]
pub use dynamodb::DynamoDbStore;

pub use inmemory::InMemoryStore;
