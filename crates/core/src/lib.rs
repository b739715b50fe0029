//! dynaglue_core - pure request shaping for a document store.
//!
//! Data types, the store boundary trait and the request builders. Nothing in
//! this crate performs I/O.

pub mod builder;
pub mod item;
pub mod serde;
pub mod storage;
