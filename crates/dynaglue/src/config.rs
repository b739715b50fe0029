use std::env;

use crate::error::CliError;

/// Default AWS region when none is configured.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Connection and target settings loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Table operations run against (`DYNAGLUE_TABLE`).
    pub table_name: Option<String>,
    /// AWS region (`AWS_REGION`, default: "us-east-1").
    pub region: String,
    /// Custom endpoint URL for local DynamoDB (`AWS_ENDPOINT_URL`).
    pub endpoint_url: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `DYNAGLUE_TABLE` - Default table name
    /// - `AWS_REGION` - AWS region (default: "us-east-1")
    /// - `AWS_ENDPOINT_URL` - Endpoint override, e.g. `http://localhost:8000`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        Self {
            table_name: non_empty("DYNAGLUE_TABLE"),
            region: non_empty("AWS_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string()),
            endpoint_url: non_empty("AWS_ENDPOINT_URL"),
        }
    }

    /// Overrides the table when one is given.
    pub fn with_table_name(mut self, table_name: Option<String>) -> Self {
        if table_name.is_some() {
            self.table_name = table_name;
        }
        self
    }

    /// Overrides the region when one is given.
    pub fn with_region(mut self, region: Option<String>) -> Self {
        if let Some(region) = region {
            self.region = region;
        }
        self
    }

    /// Overrides the endpoint when one is given.
    pub fn with_endpoint_url(mut self, endpoint_url: Option<String>) -> Self {
        if endpoint_url.is_some() {
            self.endpoint_url = endpoint_url;
        }
        self
    }

    /// The configured table, required by every item command.
    pub fn table(&self) -> Result<&str, CliError> {
        self.table_name.as_deref().ok_or(CliError::MissingTable)
    }

    /// Returns a display string for the target environment.
    pub fn target_display(&self) -> String {
        match &self.endpoint_url {
            Some(url) => format!("Local DynamoDB ({})", url),
            None => format!("AWS DynamoDB (region: {})", self.region),
        }
    }
}
