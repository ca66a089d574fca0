//! # Filter Builder
//!
//! Turns a client-supplied raw filter into a validated query document:
//!
//! ```json
//! {"name": "Alice", "age": {"ge": 18, "in": ["20", 21]}}
//! ```
//!
//! Each field is looked up in the schema, its kind is checked against the
//! permitted-operator table, and every value is coerced through the field's
//! validator before it reaches the [`ClauseCompiler`]. The first failure
//! aborts the translation.

use serde_json::{Map, Value};

use super::compiler::{ClauseCompiler, QueryDocument};
use super::config::FilterConfig;
use super::errors::{FilterError, FilterResult};
use super::operator::{permitted_operators, Operator};
use crate::schema::{DataError, FieldDescriptor, Schema};

/// Translates raw filters against one schema
#[derive(Debug, Clone)]
pub struct FilterBuilder<'a> {
    schema: &'a Schema,
    config: FilterConfig,
    compiler: ClauseCompiler,
}

impl<'a> FilterBuilder<'a> {
    /// Create a builder with the default configuration
    pub fn new(schema: &'a Schema) -> Self {
        Self::with_config(schema, FilterConfig::default())
    }

    pub fn with_config(schema: &'a Schema, config: FilterConfig) -> Self {
        Self {
            schema,
            compiler: ClauseCompiler::new(config.clause_merge),
            config,
        }
    }

    /// Translate a raw filter into a query document.
    ///
    /// # Errors
    ///
    /// - `InvalidFilter` if `raw` is not an object
    /// - `UnknownField` for a field absent from the schema
    /// - `UnsupportedColumnType` for a field kind that cannot be filtered
    /// - `UnknownOperation` / `UnsupportedOperation` for a bad operator
    /// - `Validation` when a value fails coercion
    pub fn build(&self, raw: &Value) -> FilterResult<QueryDocument> {
        let filter = raw
            .as_object()
            .ok_or_else(|| FilterError::InvalidFilter("filter must be an object".into()))?;

        let mut query = QueryDocument::with_capacity(filter.len());
        for (name, spec) in filter {
            let field = self
                .schema
                .field(name)
                .ok_or_else(|| FilterError::UnknownField(name.clone()))?;

            let permitted = permitted_operators(field.kind()).ok_or_else(|| {
                FilterError::UnsupportedColumnType {
                    field: name.clone(),
                    kind: field.kind(),
                }
            })?;

            match spec {
                Value::Object(ops) => self.apply_operations(&mut query, field, permitted, ops)?,
                scalar => {
                    let value = self.coerce(field, scalar)?;
                    query.insert(name.clone(), value);
                }
            }
        }

        tracing::debug!(fields = query.len(), "filter translated");
        Ok(query)
    }

    fn apply_operations(
        &self,
        query: &mut QueryDocument,
        field: &FieldDescriptor,
        permitted: &[Operator],
        ops: &Map<String, Value>,
    ) -> FilterResult<()> {
        for (op_name, value) in ops {
            let operator: Operator = op_name.parse()?;
            if !permitted.contains(&operator) {
                tracing::debug!(
                    field = field.name(),
                    kind = %field.kind(),
                    operator = %operator,
                    "operator rejected"
                );
                return Err(FilterError::UnsupportedOperation {
                    field: field.name().to_string(),
                    kind: field.kind(),
                    operator: operator.to_string(),
                });
            }

            if operator == Operator::In {
                self.check_in_list(field, value)?;
            }

            let coerced = self.coerce(field, value)?;
            self.compiler.apply(query, field.name(), operator, coerced)?;
        }
        Ok(())
    }

    /// Reject `in` operands that are not lists or exceed the configured size
    fn check_in_list(&self, field: &FieldDescriptor, value: &Value) -> FilterResult<()> {
        let items = value.as_array().ok_or_else(|| {
            FilterError::validation(field.name(), DataError::type_mismatch("list", value))
        })?;

        if items.len() > self.config.max_in_values {
            return Err(FilterError::validation(
                field.name(),
                DataError::new(format!(
                    "list has {} values, at most {} allowed",
                    items.len(),
                    self.config.max_in_values
                )),
            ));
        }
        Ok(())
    }

    /// Coerce a value, mapping over list elements in order
    fn coerce(&self, field: &FieldDescriptor, value: &Value) -> FilterResult<Value> {
        let validator = field.validator();
        let result = match value {
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(i, item)| validator.coerce(item).map_err(|e| e.at_index(i)))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            _ => validator.coerce(value),
        };

        result.map_err(|e| FilterError::validation(field.name(), e))
    }
}

/// Translate `raw` against `schema` with the default configuration.
pub fn create_filter(raw: &Value, schema: &Schema) -> FilterResult<QueryDocument> {
    FilterBuilder::new(schema).build(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::ClauseMerge;
    use crate::schema::{
        BoolField, DateTimeField, FieldKind, FloatField, IntField, ObjectIdField, StringField,
    };
    use serde_json::json;

    fn schema() -> Schema {
        Schema::new(vec![
            FieldDescriptor::new("_id", ObjectIdField),
            FieldDescriptor::new("name", StringField::new()),
            FieldDescriptor::new("age", IntField::new()),
            FieldDescriptor::new("score", FloatField::new()),
            FieldDescriptor::new("active", BoolField),
            FieldDescriptor::new("joined", DateTimeField),
        ])
        .unwrap()
    }

    fn translate(raw: Value) -> FilterResult<Value> {
        create_filter(&raw, &schema()).map(Value::Object)
    }

    #[test]
    fn test_scalar_shorthand() {
        assert_eq!(translate(json!({"name": "Alice"})).unwrap(), json!({"name": "Alice"}));
        assert_eq!(translate(json!({"age": "30"})).unwrap(), json!({"age": 30}));
    }

    #[test]
    fn test_explicit_eq_clause() {
        assert_eq!(
            translate(json!({"name": {"eq": "Alice"}})).unwrap(),
            json!({"name": {"$eq": "Alice"}})
        );
    }

    #[test]
    fn test_values_coerced_before_compiling() {
        assert_eq!(
            translate(json!({"age": {"ge": "18"}, "score": {"lt": 2}})).unwrap(),
            json!({"age": {"$gte": 18}, "score": {"$lt": 2.0}})
        );
    }

    #[test]
    fn test_in_coerces_each_element() {
        assert_eq!(
            translate(json!({"age": {"in": ["1", 2, "3"]}})).unwrap(),
            json!({"age": {"$in": [1, 2, 3]}})
        );
    }

    #[test]
    fn test_in_fails_on_bad_element() {
        let err = translate(json!({"age": {"in": [1, "two", 3]}})).unwrap_err();
        match err {
            FilterError::Validation(v) => {
                assert_eq!(v.field, "age");
                assert_eq!(v.path, vec!["1".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_in_requires_list() {
        let err = translate(json!({"age": {"in": 5}})).unwrap_err();
        assert_eq!(err.code(), "FILTER_VALIDATION_FAILED");
    }

    #[test]
    fn test_in_list_size_limit() {
        let schema = schema();
        let config = FilterConfig {
            max_in_values: 2,
            ..Default::default()
        };
        let builder = FilterBuilder::with_config(&schema, config);
        assert!(builder.build(&json!({"age": {"in": [1, 2]}})).is_ok());
        assert!(builder.build(&json!({"age": {"in": [1, 2, 3]}})).is_err());
    }

    #[test]
    fn test_default_in_limit_can_be_raised() {
        let long: Vec<i64> = (0..1001).collect();
        let raw = json!({"age": {"in": long}});

        let err = translate(raw.clone()).unwrap_err();
        assert!(err.to_string().contains("list has 1001 values, at most 1000 allowed"));

        let schema = schema();
        let config = FilterConfig {
            max_in_values: 5000,
            ..Default::default()
        };
        let query = FilterBuilder::with_config(&schema, config).build(&raw).unwrap();
        assert_eq!(query["age"]["$in"].as_array().map(Vec::len), Some(1001));
    }

    #[test]
    fn test_like_on_string() {
        assert_eq!(
            translate(json!({"name": {"like": "Al"}})).unwrap(),
            json!({"name": {"$regex": "^Al"}})
        );
    }

    #[test]
    fn test_operator_not_permitted() {
        let err = translate(json!({"name": {"lt": "M"}})).unwrap_err();
        assert_eq!(
            err,
            FilterError::UnsupportedOperation {
                field: "name".into(),
                kind: FieldKind::String,
                operator: "lt".into(),
            }
        );
    }

    #[test]
    fn test_unknown_operator() {
        let err = translate(json!({"age": {"between": [1, 2]}})).unwrap_err();
        assert_eq!(err, FilterError::UnknownOperation("between".into()));
    }

    #[test]
    fn test_unsupported_column_type() {
        let err = translate(json!({"active": true})).unwrap_err();
        assert_eq!(err.code(), "FILTER_UNSUPPORTED_COLUMN_TYPE");
        assert_eq!(err.field(), Some("active"));
    }

    #[test]
    fn test_datetime_not_filterable() {
        let expected = FilterError::UnsupportedColumnType {
            field: "joined".into(),
            kind: FieldKind::DateTime,
        };
        assert_eq!(
            translate(json!({"joined": "2024-03-01T08:00:00Z"})).unwrap_err(),
            expected
        );
        assert_eq!(
            translate(json!({"joined": {"gt": "2024-03-01T08:00:00Z"}})).unwrap_err(),
            expected
        );
    }

    #[test]
    fn test_scalar_type_mismatch_keeps_expected() {
        match translate(json!({"name": 5})).unwrap_err() {
            FilterError::Validation(v) => {
                assert_eq!(v.field, "name");
                assert_eq!(v.expected.as_deref(), Some("string"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_field() {
        let err = translate(json!({"ghost": "x"})).unwrap_err();
        assert_eq!(err, FilterError::UnknownField("ghost".into()));
    }

    #[test]
    fn test_filter_must_be_object() {
        let err = translate(json!(["name"])).unwrap_err();
        assert_eq!(err.code(), "FILTER_INVALID");
    }

    #[test]
    fn test_object_id_uses_conversion() {
        assert_eq!(
            translate(json!({"_id": {"in": ["5F1D7A3E9B1E8A3F2C4D6E8F"]}})).unwrap(),
            json!({"_id": {"$in": [{"$oid": "5f1d7a3e9b1e8a3f2c4d6e8f"}]}})
        );
        assert!(translate(json!({"_id": {"$oid": "5f1d7a3e9b1e8a3f2c4d6e8f"}})).is_err());
    }

    #[test]
    fn test_object_id_eq_and_ne() {
        assert_eq!(
            translate(json!({"_id": {"eq": "5f1d7a3e9b1e8a3f2c4d6e8f"}})).unwrap(),
            json!({"_id": {"$eq": {"$oid": "5f1d7a3e9b1e8a3f2c4d6e8f"}}})
        );
        assert_eq!(
            translate(json!({"_id": {"ne": "5F1D7A3E9B1E8A3F2C4D6E8F"}})).unwrap(),
            json!({"_id": {"$ne": {"$oid": "5f1d7a3e9b1e8a3f2c4d6e8f"}}})
        );
        assert_eq!(
            translate(json!({"_id": "5f1d7a3e9b1e8a3f2c4d6e8f"})).unwrap(),
            json!({"_id": {"$oid": "5f1d7a3e9b1e8a3f2c4d6e8f"}})
        );
    }

    #[test]
    fn test_object_id_range_rejected() {
        let err = translate(json!({"_id": {"gt": "5f1d7a3e9b1e8a3f2c4d6e8f"}})).unwrap_err();
        assert_eq!(
            err,
            FilterError::UnsupportedOperation {
                field: "_id".into(),
                kind: FieldKind::ObjectId,
                operator: "gt".into(),
            }
        );
    }

    #[test]
    fn test_empty_operator_object() {
        assert_eq!(translate(json!({"age": {}})).unwrap(), json!({}));
    }

    #[test]
    fn test_combine_policy() {
        let schema = schema();
        let config = FilterConfig::with_merge(ClauseMerge::Combine);
        let builder = FilterBuilder::with_config(&schema, config);
        let query = builder.build(&json!({"age": {"gt": 5, "lt": 10}})).unwrap();
        assert_eq!(Value::Object(query), json!({"age": {"$gt": 5, "$lt": 10}}));
    }

    #[test]
    fn test_replace_policy_is_default() {
        assert_eq!(
            translate(json!({"age": {"gt": 5, "lt": 10}})).unwrap(),
            json!({"age": {"$lt": 10}})
        );
    }
}
