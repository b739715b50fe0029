//! dynaglue - create, update, delete, query and scan document store items.
//!
//! Callers pass plain attribute maps and options; the request shaping lives in
//! `dynaglue_core`, the I/O lives here.

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod output;
pub mod storage;

pub use client::ItemClient;
pub use config::Config;
pub use error::CliError;
