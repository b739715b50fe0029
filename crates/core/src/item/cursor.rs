//! Continuation cursor codec.
//!
//! A cursor is the store's native pagination key serialized as UTF-8 JSON and
//! then base64 encoded (standard alphabet, padded). Callers treat it as an
//! opaque string and hand it back verbatim.

use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::storage::Document;

use super::error::{ItemError, Result};

/// Opaque pagination token returned with a page and accepted back to resume.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    /// Encodes a native pagination key.
    pub fn encode(key: &Document) -> Result<Self> {
        let json = serde_json::to_vec(key).map_err(|e| ItemError::InvalidCursor(e.to_string()))?;
        Ok(Self(STANDARD.encode(json)))
    }

    /// Decodes the cursor back into the native pagination key.
    pub fn decode(&self) -> Result<Document> {
        let bytes = STANDARD
            .decode(self.0.trim())
            .map_err(|e| ItemError::InvalidCursor(e.to_string()))?;
        match serde_json::from_slice(&bytes) {
            Ok(Value::Object(key)) => Ok(key),
            Ok(_) => Err(ItemError::InvalidCursor(
                "expected a JSON object".to_string(),
            )),
            Err(e) => Err(ItemError::InvalidCursor(e.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Cursor {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Cursor {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl FromStr for Cursor {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
