//! Evaluation of the expression subset the in-memory store understands.
//!
//! Conditions: `AND`-joined comparisons (`=`, `<>`, `<`, `<=`, `>`, `>=`)
//! and the functions `attribute_exists`, `attribute_not_exists` and
//! `begins_with`. Updates: a single `SET a = :v, b = :w` clause.
//! Anything else is rejected as a validation error, as the real store would
//! reject malformed input.

use std::cmp::Ordering;

use serde_json::Value;

use dynaglue_core::storage::{AttributeNames, Document, StoreError, StoreResult};

/// Resolves placeholders against the bindings of one request.
pub struct Bindings<'a> {
    names: &'a AttributeNames,
    values: &'a Document,
}

enum Operand {
    Path(String),
    Literal(Value),
}

impl<'a> Bindings<'a> {
    pub fn new(names: &'a AttributeNames, values: &'a Document) -> Self {
        Self { names, values }
    }

    /// Evaluates a condition expression against an item.
    pub fn matches(&self, expression: &str, item: &Document) -> StoreResult<bool> {
        for clause in split_and(expression) {
            if !self.clause_matches(clause, item)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Applies a `SET` update expression to an item in place.
    pub fn apply_update(&self, expression: &str, item: &mut Document) -> StoreResult<()> {
        let trimmed = expression.trim();
        let assignments = trimmed
            .get(..4)
            .filter(|keyword| keyword.eq_ignore_ascii_case("SET "))
            .map(|_| &trimmed[4..])
            .ok_or_else(|| unsupported(expression))?;

        let mut updates = Vec::new();
        for assignment in assignments.split(',') {
            let (path, value) = assignment
                .split_once('=')
                .ok_or_else(|| unsupported(expression))?;
            let Operand::Path(path) = self.operand(path)? else {
                return Err(unsupported(expression));
            };
            let value = match self.operand(value)? {
                Operand::Literal(value) => value,
                Operand::Path(source) => item.get(&source).cloned().ok_or_else(|| {
                    StoreError::Validation(format!("Attribute {source} does not exist"))
                })?,
            };
            updates.push((path, value));
        }

        item.extend(updates);
        Ok(())
    }

    fn clause_matches(&self, clause: &str, item: &Document) -> StoreResult<bool> {
        let clause = strip_parens(clause.trim());

        if let Some(args) = function_args(clause, "attribute_exists") {
            return Ok(self.path_value(args, item)?.is_some());
        }
        if let Some(args) = function_args(clause, "attribute_not_exists") {
            return Ok(self.path_value(args, item)?.is_none());
        }
        if let Some(args) = function_args(clause, "begins_with") {
            let (path, prefix) = args.split_once(',').ok_or_else(|| unsupported(clause))?;
            let actual = self.resolve(path, item)?;
            let prefix = self.resolve(prefix, item)?;
            return Ok(match (actual, prefix) {
                (Some(Value::String(actual)), Some(Value::String(prefix))) => {
                    actual.starts_with(&prefix)
                }
                _ => false,
            });
        }

        let (left, comparator, right) = split_comparison(clause)?;
        let (Some(left), Some(right)) = (self.resolve(left, item)?, self.resolve(right, item)?)
        else {
            return Ok(false);
        };

        Ok(match comparator {
            "=" => values_equal(&left, &right),
            "<>" => !values_equal(&left, &right),
            "<" => compare(&left, &right) == Some(Ordering::Less),
            "<=" => matches!(
                compare(&left, &right),
                Some(Ordering::Less | Ordering::Equal)
            ),
            ">" => compare(&left, &right) == Some(Ordering::Greater),
            ">=" => matches!(
                compare(&left, &right),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            _ => return Err(unsupported(clause)),
        })
    }

    fn operand(&self, token: &str) -> StoreResult<Operand> {
        let token = token.trim();
        if token.is_empty() {
            return Err(StoreError::Validation("Empty operand".to_string()));
        }
        if token.starts_with(':') {
            return self
                .values
                .get(token)
                .cloned()
                .map(Operand::Literal)
                .ok_or_else(|| {
                    StoreError::Validation(format!("Value placeholder {token} is not defined"))
                });
        }
        if token.starts_with('#') {
            return self
                .names
                .get(token)
                .cloned()
                .map(Operand::Path)
                .ok_or_else(|| {
                    StoreError::Validation(format!("Name placeholder {token} is not defined"))
                });
        }
        Ok(Operand::Path(token.to_string()))
    }

    fn resolve(&self, token: &str, item: &Document) -> StoreResult<Option<Value>> {
        Ok(match self.operand(token)? {
            Operand::Literal(value) => Some(value),
            Operand::Path(path) => item.get(&path).cloned(),
        })
    }

    fn path_value<'i>(&self, token: &str, item: &'i Document) -> StoreResult<Option<&'i Value>> {
        match self.operand(token)? {
            Operand::Path(path) => Ok(item.get(&path)),
            Operand::Literal(_) => Err(unsupported(token)),
        }
    }
}

fn unsupported(expression: &str) -> StoreError {
    StoreError::Validation(format!("Unsupported expression: {}", expression.trim()))
}

/// Splits on the `AND` keyword, case-insensitively.
fn split_and(expression: &str) -> Vec<&str> {
    let lowered = expression.to_ascii_lowercase();
    let mut clauses = Vec::new();
    let mut start = 0;
    while let Some(offset) = lowered[start..].find(" and ") {
        clauses.push(&expression[start..start + offset]);
        start += offset + " and ".len();
    }
    clauses.push(&expression[start..]);
    clauses
}

fn strip_parens(clause: &str) -> &str {
    let mut clause = clause;
    while clause.starts_with('(') && clause.ends_with(')') {
        clause = clause[1..clause.len() - 1].trim();
    }
    clause
}

fn function_args<'c>(clause: &'c str, name: &str) -> Option<&'c str> {
    let rest = clause.strip_prefix(name)?.trim_start();
    rest.strip_prefix('(')?.strip_suffix(')')
}

fn split_comparison(clause: &str) -> StoreResult<(&str, &'static str, &str)> {
    let position = clause
        .find(|c: char| matches!(c, '<' | '>' | '='))
        .ok_or_else(|| unsupported(clause))?;
    let rest = &clause[position..];
    let comparator = ["<>", "<=", ">=", "=", "<", ">"]
        .into_iter()
        .find(|op| rest.starts_with(*op))
        .ok_or_else(|| unsupported(clause))?;
    Ok((
        &clause[..position],
        comparator,
        &clause[position + comparator.len()..],
    ))
}

fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(_), Value::Number(_)) => compare(left, right) == Some(Ordering::Equal),
        _ => left == right,
    }
}

fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => l.as_f64()?.partial_cmp(&r.as_f64()?),
        (Value::String(l), Value::String(r)) => Some(l.cmp(r)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    fn names(pairs: &[(&str, &str)]) -> AttributeNames {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_equality_with_placeholders() {
        let names = names(&[("#s", "status")]);
        let values = document(json!({":s": "open"}));
        let bindings = Bindings::new(&names, &values);

        assert!(bindings
            .matches("#s = :s", &document(json!({"status": "open"})))
            .unwrap());
        assert!(!bindings
            .matches("#s = :s", &document(json!({"status": "closed"})))
            .unwrap());
    }

    #[test]
    fn test_and_is_case_insensitive() {
        let names = AttributeNames::new();
        let values = document(json!({":id": "a", ":n": 3}));
        let bindings = Bindings::new(&names, &values);
        let item = document(json!({"id": "a", "count": 5}));

        assert!(bindings.matches("id = :id and count > :n", &item).unwrap());
        assert!(bindings.matches("id = :id AND count >= :n", &item).unwrap());
        assert!(!bindings.matches("id = :id AND count < :n", &item).unwrap());
    }

    #[test]
    fn test_numbers_compare_by_value() {
        let names = AttributeNames::new();
        let values = document(json!({":n": 2.0}));
        let bindings = Bindings::new(&names, &values);
        assert!(bindings
            .matches("count = :n", &document(json!({"count": 2})))
            .unwrap());
        assert!(bindings
            .matches("count <> :n", &document(json!({"count": 3})))
            .unwrap());
    }

    #[test]
    fn test_missing_attribute_never_matches_comparison() {
        let names = AttributeNames::new();
        let values = document(json!({":v": "x"}));
        let bindings = Bindings::new(&names, &values);
        let item = document(json!({"other": 1}));
        assert!(!bindings.matches("tag = :v", &item).unwrap());
        assert!(!bindings.matches("tag <> :v", &item).unwrap());
    }

    #[test]
    fn test_existence_functions() {
        let names = names(&[("#t", "tag")]);
        let values = Document::new();
        let bindings = Bindings::new(&names, &values);
        let item = document(json!({"id": "a", "tag": "x"}));

        assert!(bindings.matches("attribute_exists(id)", &item).unwrap());
        assert!(bindings.matches("attribute_exists(#t)", &item).unwrap());
        assert!(bindings.matches("attribute_not_exists(missing)", &item).unwrap());
        assert!(!bindings.matches("attribute_exists(missing)", &Document::new()).unwrap());
    }

    #[test]
    fn test_begins_with() {
        let names = AttributeNames::new();
        let values = document(json!({":p": "ab"}));
        let bindings = Bindings::new(&names, &values);
        assert!(bindings
            .matches("begins_with(code, :p)", &document(json!({"code": "abc"})))
            .unwrap());
        assert!(!bindings
            .matches("begins_with(code, :p)", &document(json!({"code": "xabc"})))
            .unwrap());
    }

    #[test]
    fn test_undefined_placeholder_is_rejected() {
        let names = AttributeNames::new();
        let values = Document::new();
        let bindings = Bindings::new(&names, &values);
        assert!(matches!(
            bindings.matches("a = :missing", &Document::new()),
            Err(StoreError::Validation(_))
        ));
    }

    #[test]
    fn test_unsupported_syntax_is_rejected() {
        let names = AttributeNames::new();
        let values = Document::new();
        let bindings = Bindings::new(&names, &values);
        assert!(matches!(
            bindings.matches("contains(tags, x)", &Document::new()),
            Err(StoreError::Validation(_))
        ));
    }

    #[test]
    fn test_apply_set_update() {
        let names = names(&[("#p0", "name"), ("#updatedAt", "updatedAt")]);
        let values = document(json!({":p0": "Grace", ":updatedAt": "2024-01-15T10:30:00.001Z"}));
        let bindings = Bindings::new(&names, &values);
        let mut item = document(json!({"id": "a", "name": "Ada", "age": 36}));

        bindings
            .apply_update("SET #p0 = :p0, #updatedAt = :updatedAt", &mut item)
            .unwrap();

        assert_eq!(
            item,
            document(json!({
                "id": "a",
                "name": "Grace",
                "age": 36,
                "updatedAt": "2024-01-15T10:30:00.001Z"
            }))
        );
    }

    #[test]
    fn test_apply_update_rejects_other_clauses() {
        let names = AttributeNames::new();
        let values = Document::new();
        let bindings = Bindings::new(&names, &values);
        let mut item = Document::new();
        assert!(matches!(
            bindings.apply_update("REMOVE tag", &mut item),
            Err(StoreError::Validation(_))
        ));
    }
}
