//! Item command arguments.

use clap::Args;
use serde_json::Value;

use dynaglue_core::item::{Cursor, FilterSpec, KeyMatch, Patch, QuerySpec, ScanSpec};
use dynaglue_core::storage::Document;

use super::parsers::{parse_attributes, parse_key_match, parse_pair, parse_value_pair};

/// Arguments for `create`.
#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Attributes as a JSON object.
    #[arg(long, value_parser = parse_attributes, default_value = "{}")]
    pub attributes: Document,
}

/// Arguments for `update`.
#[derive(Debug, Args)]
pub struct UpdateArgs {
    /// Item ID.
    pub id: String,

    /// Attributes to set, as a JSON object.
    #[arg(long, value_parser = parse_attributes)]
    pub attributes: Option<Document>,

    /// Attribute to set, NAME=VALUE. May be repeated.
    #[arg(long = "set", value_name = "NAME=VALUE", value_parser = parse_value_pair)]
    pub set: Vec<(String, Value)>,
}

impl UpdateArgs {
    /// Merges `--attributes` and `--set` into a patch. `--set` wins.
    pub fn patch(&self) -> Patch {
        let mut patch = self.attributes.clone().map(Patch::from).unwrap_or_default();
        for (name, value) in &self.set {
            patch.insert(name.clone(), Some(value.clone()));
        }
        patch
    }
}

/// Arguments for `delete`.
#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Item ID.
    pub id: String,
}

/// Filter and paging flags shared by `query` and `scan`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Secondary index to read from.
    #[arg(long)]
    pub index: Option<String>,

    /// Filter expression applied after key matching.
    #[arg(long)]
    pub filter: Option<String>,

    /// Filter name placeholder, #PLACEHOLDER=NAME. May be repeated.
    #[arg(long = "filter-name", value_name = "#P=NAME", value_parser = parse_pair)]
    pub filter_names: Vec<(String, String)>,

    /// Filter value placeholder, :PLACEHOLDER=VALUE. May be repeated.
    #[arg(long = "filter-value", value_name = ":P=VALUE", value_parser = parse_value_pair)]
    pub filter_values: Vec<(String, Value)>,

    /// Maximum number of items to evaluate.
    #[arg(long)]
    pub limit: Option<u32>,

    /// Continuation cursor from a previous page.
    #[arg(long)]
    pub cursor: Option<String>,
}

impl ListArgs {
    /// The filter, when an expression was given.
    pub fn filter_spec(&self) -> Option<FilterSpec> {
        let expression = self.filter.as_ref()?;
        let filter = self
            .filter_names
            .iter()
            .fold(FilterSpec::new(expression), |filter, (placeholder, name)| {
                filter.name(placeholder, name)
            });
        Some(
            self.filter_values
                .iter()
                .fold(filter, |filter, (placeholder, value)| {
                    filter.value(placeholder, value.clone())
                }),
        )
    }

    fn cursor(&self) -> Option<Cursor> {
        self.cursor.as_deref().map(Cursor::from)
    }
}

/// Arguments for `query`.
#[derive(Debug, Args)]
pub struct QueryArgs {
    /// Fetch the single item with this ID.
    #[arg(long)]
    pub id: Option<String>,

    /// Hash key equality match, NAME=VALUE.
    #[arg(long, value_name = "NAME=VALUE", value_parser = parse_key_match)]
    pub hash_key: Option<KeyMatch>,

    /// Range key equality match, NAME=VALUE.
    #[arg(long, value_name = "NAME=VALUE", value_parser = parse_key_match)]
    pub range_key: Option<KeyMatch>,

    #[command(flatten)]
    pub list: ListArgs,
}

impl QueryArgs {
    pub fn spec(&self) -> QuerySpec {
        QuerySpec {
            id: self.id.clone(),
            index_name: self.list.index.clone(),
            hash_key: self.hash_key.clone(),
            range_key: self.range_key.clone(),
            filter: self.list.filter_spec(),
            limit: self.list.limit,
            cursor: self.list.cursor(),
        }
    }
}

/// Arguments for `scan`.
#[derive(Debug, Args)]
pub struct ScanArgs {
    #[command(flatten)]
    pub list: ListArgs,
}

impl ScanArgs {
    pub fn spec(&self) -> ScanSpec {
        ScanSpec {
            index_name: self.list.index.clone(),
            filter: self.list.filter_spec(),
            limit: self.list.limit,
            cursor: self.list.cursor(),
        }
    }
}
