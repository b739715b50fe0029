//! Pretty output formatting.

use dynaglue_core::item::{Item, PageResult, QueryOutput};
use dynaglue_core::serde::format_timestamp;

/// Format an item for display.
pub fn format_item(item: &Item) -> String {
    let mut output = format!(
        "{}\n  createdAt: {}\n  updatedAt: {}",
        item.id,
        format_timestamp(&item.created_at),
        format_timestamp(&item.updated_at)
    );
    for (name, value) in &item.attributes {
        output.push_str(&format!("\n  {}: {}", name, value));
    }
    output
}

/// Format a page of items for display.
pub fn format_page(page: &PageResult) -> String {
    if page.items.is_empty() && !page.has_more() {
        return "No items found.".to_string();
    }
    let mut output = format!("ITEMS ({})\n", page.items.len());
    output.push_str(&"-".repeat(40));
    for item in &page.items {
        output.push_str(&format!("\n{}", format_item(item)));
        output.push('\n');
    }
    if let Some(cursor) = &page.continuation_cursor {
        output.push_str(&format!("\nNext page: --cursor {}", cursor));
    }
    output
}

/// Format a query result for display.
pub fn format_query_output(output: &QueryOutput) -> String {
    match output {
        QueryOutput::Item(item) => format_item(item),
        QueryOutput::Page(page) => format_page(page),
    }
}
