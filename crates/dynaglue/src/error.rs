//! CLI error types.

use thiserror::Error;

/// Errors raised while turning command-line input into operation inputs.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CliError {
    #[error("Expected NAME=VALUE, got {0:?}")]
    InvalidPair(String),

    #[error("Attributes must be a JSON object: {0}")]
    InvalidAttributes(String),

    #[error("No table given; pass --table or set DYNAGLUE_TABLE")]
    MissingTable,
}
