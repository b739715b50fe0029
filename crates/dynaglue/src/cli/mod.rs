//! CLI command definitions.

pub mod items;
pub mod parsers;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::Config;

/// Create, update, delete, query and scan items in a DynamoDB table.
#[derive(Debug, Parser)]
#[command(name = "dynaglue")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Table to operate on.
    #[arg(long, global = true, env = "DYNAGLUE_TABLE")]
    pub table: Option<String>,

    /// AWS region.
    #[arg(long, global = true, env = "AWS_REGION")]
    pub region: Option<String>,

    /// Custom endpoint URL, e.g. a local DynamoDB.
    #[arg(long, global = true, env = "AWS_ENDPOINT_URL")]
    pub endpoint_url: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "pretty")]
    pub format: OutputFormat,

    /// Suppress non-essential output.
    #[arg(long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Environment configuration with the command-line overrides applied.
    pub fn config(&self) -> Config {
        Config::from_env()
            .with_table_name(self.table.clone())
            .with_region(self.region.clone())
            .with_endpoint_url(self.endpoint_url.clone())
    }
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Raw JSON output.
    Json,
    /// Human-readable output.
    #[default]
    Pretty,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create an item with a generated id.
    Create(items::CreateArgs),
    /// Update attributes of an existing item.
    Update(items::UpdateArgs),
    /// Delete an item by id.
    Delete(items::DeleteArgs),
    /// Query by id or by key condition.
    Query(items::QueryArgs),
    /// Scan a table or index.
    Scan(items::ScanArgs),
}
