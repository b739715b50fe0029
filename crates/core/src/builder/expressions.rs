//! Expression strings and their placeholder bindings.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::item::{
    is_reserved_attribute, FilterSpec, ItemError, KeyMatch, Patch, QuerySpec, Result,
    ID_ATTRIBUTE, UPDATED_AT_ATTRIBUTE,
};
use crate::serde::format_timestamp;
use crate::storage::{AttributeNames, Document};

/// Placeholder bindings shared by every expression of one request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpressionParams {
    names: AttributeNames,
    values: Document,
}

impl ExpressionParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `#placeholder` to an attribute name.
    ///
    /// Rebinding to the same name is a no-op; rebinding to a different name
    /// fails with [`ItemError::PlaceholderConflict`].
    pub fn bind_name(
        &mut self,
        placeholder: impl Into<String>,
        attribute: impl Into<String>,
    ) -> Result<()> {
        let placeholder = placeholder.into();
        let attribute = attribute.into();
        match self.names.get(&placeholder) {
            Some(existing) if *existing != attribute => {
                Err(ItemError::PlaceholderConflict(placeholder))
            }
            _ => {
                self.names.insert(placeholder, attribute);
                Ok(())
            }
        }
    }

    /// Binds `:placeholder` to a value, with the same conflict rule as names.
    pub fn bind_value(&mut self, placeholder: impl Into<String>, value: Value) -> Result<()> {
        let placeholder = placeholder.into();
        match self.values.get(&placeholder) {
            Some(existing) if *existing != value => Err(ItemError::PlaceholderConflict(placeholder)),
            _ => {
                self.values.insert(placeholder, value);
                Ok(())
            }
        }
    }

    /// Returns true when `placeholder` is free or already names `attribute`.
    fn name_fits(&self, placeholder: &str, attribute: &str) -> bool {
        self.names
            .get(placeholder)
            .map_or(true, |existing| existing == attribute)
    }

    /// Returns true when `placeholder` is free or already holds `value`.
    fn value_fits(&self, placeholder: &str, value: &Value) -> bool {
        self.values
            .get(placeholder)
            .map_or(true, |existing| existing == value)
    }

    pub fn into_parts(self) -> (AttributeNames, Document) {
        (self.names, self.values)
    }
}

/// Derives a placeholder token from an attribute name.
///
/// Placeholders only allow alphanumerics and underscores, so anything else is
/// replaced with `_`.
pub fn placeholder_token(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// Builds the `AND`-joined key condition: id, then hash key, then range key.
///
/// Returns `None` when the query names no key at all.
pub fn key_condition(spec: &QuerySpec, params: &mut ExpressionParams) -> Result<Option<String>> {
    let mut clauses = Vec::new();

    if let Some(id) = &spec.id {
        params.bind_value(format!(":{ID_ATTRIBUTE}"), Value::String(id.clone()))?;
        clauses.push(format!("{ID_ATTRIBUTE} = :{ID_ATTRIBUTE}"));
    }

    for key in [&spec.hash_key, &spec.range_key].into_iter().flatten() {
        clauses.push(key_clause(key, params)?);
    }

    if clauses.is_empty() {
        Ok(None)
    } else {
        Ok(Some(clauses.join(" AND ")))
    }
}

/// Binds one key equality. Distinct attributes can sanitize to the same
/// token (`owner-id`, `owner_id`), so taken tokens get a numeric suffix.
fn key_clause(key: &KeyMatch, params: &mut ExpressionParams) -> Result<String> {
    let base = placeholder_token(&key.name);
    let mut token = base.clone();
    let mut suffix = 0;
    while !params.name_fits(&format!("#{token}"), &key.name)
        || !params.value_fits(&format!(":{token}"), &key.value)
    {
        suffix += 1;
        token = format!("{base}_{suffix}");
    }
    params.bind_name(format!("#{token}"), key.name.clone())?;
    params.bind_value(format!(":{token}"), key.value.clone())?;
    Ok(format!("#{token} = :{token}"))
}

/// Merges a caller filter into `params` and returns its expression.
///
/// Empty expressions are ignored together with their bindings.
pub fn filter_expression(
    filter: Option<&FilterSpec>,
    params: &mut ExpressionParams,
) -> Result<Option<String>> {
    let Some(filter) = filter.filter(|f| !f.expression.trim().is_empty()) else {
        return Ok(None);
    };

    for (placeholder, attribute) in &filter.names {
        params.bind_name(placeholder.clone(), attribute.clone())?;
    }
    for (placeholder, value) in &filter.values {
        params.bind_value(placeholder.clone(), value.clone())?;
    }

    Ok(Some(filter.expression.clone()))
}

/// Builds a `SET` expression from the present patch entries plus `updatedAt`.
///
/// Reserved attributes in the patch are ignored. Fails with
/// [`ItemError::NoUpdateValues`] when nothing else is left to set.
pub fn update_expression(
    patch: &Patch,
    updated_at: &DateTime<Utc>,
    params: &mut ExpressionParams,
) -> Result<String> {
    let mut assignments = Vec::new();

    for (position, (name, value)) in patch
        .present()
        .filter(|(name, _)| !is_reserved_attribute(name))
        .enumerate()
    {
        params.bind_name(format!("#p{position}"), name)?;
        params.bind_value(format!(":p{position}"), value.clone())?;
        assignments.push(format!("#p{position} = :p{position}"));
    }

    if assignments.is_empty() {
        return Err(ItemError::NoUpdateValues);
    }

    params.bind_name(format!("#{UPDATED_AT_ATTRIBUTE}"), UPDATED_AT_ATTRIBUTE)?;
    params.bind_value(
        format!(":{UPDATED_AT_ATTRIBUTE}"),
        Value::String(format_timestamp(updated_at)),
    )?;
    assignments.push(format!("#{UPDATED_AT_ATTRIBUTE} = :{UPDATED_AT_ATTRIBUTE}"));

    Ok(format!("SET {}", assignments.join(", ")))
}
