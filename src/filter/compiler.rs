//! # Clause Compiler
//!
//! Maps one `(field, operator, value)` triple onto a query-document clause.
//! Values are expected to be coerced already; whether the operator is legal
//! for the field's kind is decided by the caller.

use serde_json::{Map, Value};

use super::config::ClauseMerge;
use super::errors::{FilterError, FilterResult};
use super::operator::Operator;
use crate::schema::DataError;

/// Backend query document: field → scalar, or field → `{symbol: value}`
pub type QueryDocument = Map<String, Value>;

/// Writes operator clauses into a query document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClauseCompiler {
    merge: ClauseMerge,
}

impl ClauseCompiler {
    pub fn new(merge: ClauseMerge) -> Self {
        Self { merge }
    }

    /// Record `operator value` for `field` in `query`.
    ///
    /// `in` requires an array operand and `like` a string operand; the
    /// `like` operand is escaped and anchored so it matches as a literal
    /// prefix only.
    pub fn apply(
        &self,
        query: &mut QueryDocument,
        field: &str,
        operator: Operator,
        value: Value,
    ) -> FilterResult<()> {
        let operand = match operator {
            Operator::In => {
                if !value.is_array() {
                    return Err(FilterError::validation(
                        field,
                        DataError::type_mismatch("list", &value),
                    ));
                }
                value
            }
            Operator::Like => {
                let prefix = value.as_str().ok_or_else(|| {
                    FilterError::validation(field, DataError::type_mismatch("string", &value))
                })?;
                Value::String(prefix_pattern(prefix))
            }
            _ => value,
        };

        let symbol = operator.symbol().to_string();

        if self.merge == ClauseMerge::Combine {
            if let Some(Value::Object(existing)) = query.get_mut(field) {
                if is_operator_clause(existing) {
                    existing.insert(symbol, operand);
                    return Ok(());
                }
            }
        }

        let mut clause = Map::with_capacity(1);
        clause.insert(symbol, operand);
        query.insert(field.to_string(), Value::Object(clause));

        Ok(())
    }

    /// Like [`apply`](Self::apply), parsing the operator name first.
    pub fn apply_named(
        &self,
        query: &mut QueryDocument,
        field: &str,
        operator: &str,
        value: Value,
    ) -> FilterResult<()> {
        let operator: Operator = operator.parse()?;
        self.apply(query, field, operator, value)
    }
}

/// Apply one named operation with last-write-wins merging and return the
/// updated document.
pub fn apply_operation(
    mut query: QueryDocument,
    field: &str,
    operator: &str,
    value: Value,
) -> FilterResult<QueryDocument> {
    ClauseCompiler::default().apply_named(&mut query, field, operator, value)?;
    Ok(query)
}

/// Anchored regex matching `prefix` literally
pub fn prefix_pattern(prefix: &str) -> String {
    format!("^{}", regex::escape(prefix))
}

/// True if every key of `clause` is an operator symbol this compiler emits.
fn is_operator_clause(clause: &Map<String, Value>) -> bool {
    !clause.is_empty()
        && clause
            .keys()
            .all(|k| Operator::ALL.iter().any(|op| op.symbol() == k))
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;
    use serde_json::json;

    fn compile(operator: &str, value: Value) -> FilterResult<QueryDocument> {
        apply_operation(QueryDocument::new(), "f", operator, value)
    }

    #[test]
    fn test_comparison_symbols() {
        let cases = [
            ("eq", "$eq"),
            ("ne", "$ne"),
            ("lt", "$lt"),
            ("le", "$lte"),
            ("gt", "$gt"),
            ("ge", "$gte"),
        ];
        for (op, symbol) in cases {
            let query = compile(op, json!(5)).unwrap();
            assert_eq!(Value::Object(query), json!({"f": {symbol: 5}}), "operator {}", op);
        }
    }

    #[test]
    fn test_in_wraps_list() {
        let query = compile("in", json!([1, 2, 3])).unwrap();
        assert_eq!(Value::Object(query), json!({"f": {"$in": [1, 2, 3]}}));
    }

    #[test]
    fn test_in_requires_list() {
        let err = compile("in", json!(1)).unwrap_err();
        assert_eq!(err.code(), "FILTER_VALIDATION_FAILED");
    }

    #[test]
    fn test_like_escapes_and_anchors() {
        let query = compile("like", json!("a.b*c")).unwrap();
        let pattern = query["f"]["$regex"].as_str().unwrap();
        assert_eq!(pattern, r"^a\.b\*c");

        let re = Regex::new(pattern).unwrap();
        assert!(re.is_match("a.b*c"));
        assert!(re.is_match("a.b*cdef"));
        assert!(!re.is_match("Xa.b*c"));
        assert!(!re.is_match("a,b*c"));
        assert!(!re.is_match("abbbc"));
    }

    #[test]
    fn test_like_requires_string() {
        assert!(compile("like", json!(3)).is_err());
    }

    #[test]
    fn test_unknown_operation() {
        let err = compile("between", json!(1)).unwrap_err();
        assert_eq!(err, FilterError::UnknownOperation("between".into()));
    }

    #[test]
    fn test_replace_keeps_last_clause() {
        let compiler = ClauseCompiler::new(ClauseMerge::Replace);
        let mut query = QueryDocument::new();
        compiler.apply(&mut query, "age", Operator::Gt, json!(5)).unwrap();
        compiler.apply(&mut query, "age", Operator::Lt, json!(10)).unwrap();
        assert_eq!(Value::Object(query), json!({"age": {"$lt": 10}}));
    }

    #[test]
    fn test_combine_merges_clauses() {
        let compiler = ClauseCompiler::new(ClauseMerge::Combine);
        let mut query = QueryDocument::new();
        compiler.apply(&mut query, "age", Operator::Gt, json!(5)).unwrap();
        compiler.apply(&mut query, "age", Operator::Lt, json!(10)).unwrap();
        compiler.apply(&mut query, "age", Operator::Lt, json!(8)).unwrap();
        assert_eq!(Value::Object(query), json!({"age": {"$gt": 5, "$lt": 8}}));
    }

    #[test]
    fn test_combine_replaces_shorthand_value() {
        let compiler = ClauseCompiler::new(ClauseMerge::Combine);
        let mut query = QueryDocument::new();
        query.insert("_id".into(), json!({"$oid": "5f1d7a3e9b1e8a3f2c4d6e8f"}));
        compiler.apply(&mut query, "_id", Operator::Ne, json!(null)).unwrap();
        assert_eq!(Value::Object(query), json!({"_id": {"$ne": null}}));
    }

    #[test]
    fn test_other_fields_untouched() {
        let compiler = ClauseCompiler::default();
        let mut query = QueryDocument::new();
        query.insert("name".into(), json!("Alice"));
        compiler.apply(&mut query, "age", Operator::Ge, json!(18)).unwrap();
        assert_eq!(Value::Object(query), json!({"name": "Alice", "age": {"$gte": 18}}));
    }
}
