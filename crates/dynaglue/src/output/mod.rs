//! Output formatting functions.

pub mod json;
pub mod pretty;

use dynaglue_core::item::{Item, PageResult, QueryOutput};

use crate::cli::OutputFormat;

/// Human-readable rendering of a command result.
pub trait PrettyFormat {
    fn format_pretty(&self) -> String;
}

impl PrettyFormat for Item {
    fn format_pretty(&self) -> String {
        pretty::format_item(self)
    }
}

impl PrettyFormat for PageResult {
    fn format_pretty(&self) -> String {
        pretty::format_page(self)
    }
}

impl PrettyFormat for QueryOutput {
    fn format_pretty(&self) -> String {
        pretty::format_query_output(self)
    }
}

/// Format a command result in the requested format.
pub fn format_output<T>(value: &T, format: OutputFormat) -> String
where
    T: serde::Serialize + PrettyFormat,
{
    match format {
        OutputFormat::Json => json::format_json(value),
        OutputFormat::Pretty => value.format_pretty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dynaglue_core::serde::parse_timestamp;
    use serde_json::json;

    fn item() -> Item {
        let now = parse_timestamp("2024-01-15T10:30:00.000Z").unwrap();
        Item::new("abc", now, json!({"name": "Ada"}).as_object().cloned().unwrap())
    }

    #[test]
    fn test_json_format_is_compact_json() {
        let output = format_output(&item(), OutputFormat::Json);

        assert!(!output.contains('\n'));
        assert_eq!(
            serde_json::from_str::<serde_json::Value>(&output).unwrap()["name"],
            json!("Ada")
        );
    }

    #[test]
    fn test_pretty_format_uses_pretty_renderers() {
        let page = PageResult {
            items: vec![item()],
            continuation_cursor: None,
        };

        assert_eq!(
            format_output(&item(), OutputFormat::Pretty),
            pretty::format_item(&item())
        );
        assert_eq!(
            format_output(&page, OutputFormat::Pretty),
            pretty::format_page(&page)
        );
        assert_eq!(
            format_output(&QueryOutput::Item(item()), OutputFormat::Pretty),
            pretty::format_item(&item())
        );
    }
}
