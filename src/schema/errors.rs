//! Structured coercion failures raised by field validators
//!
//! A `DataError` describes why a single value (or one of its elements)
//! could not be coerced into a field's declared type. The path is kept as
//! segments so callers can prefix the field name or an element index
//! without re-parsing the message.

use std::fmt;

/// Coercion failure with an optional location inside the value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataError {
    /// Human-readable reason
    message: String,
    /// Path segments, outermost first (e.g. `["tags", "2"]`)
    path: Vec<String>,
    /// Expected type or condition, if the validator reports one
    expected: Option<String>,
}

impl DataError {
    /// Create an error with no location
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: Vec::new(),
            expected: None,
        }
    }

    /// Value had the wrong JSON shape for the field
    pub fn type_mismatch(expected: impl Into<String>, actual: &serde_json::Value) -> Self {
        let expected = expected.into();
        Self {
            message: format!("value is not {}, got {}", expected, json_type_name(actual)),
            path: Vec::new(),
            expected: Some(expected),
        }
    }

    /// Required field absent from a payload
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::new("is required").at(field)
    }

    /// Payload key not declared by the schema
    pub fn extra_field(field: impl Into<String>) -> Self {
        Self::new("is not allowed key").at(field)
    }

    /// Prefix the path with an enclosing segment
    pub fn at(mut self, segment: impl Into<String>) -> Self {
        self.path.insert(0, segment.into());
        self
    }

    /// Prefix the path with an element index
    pub fn at_index(self, index: usize) -> Self {
        self.at(index.to_string())
    }

    /// Returns the message without location
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the path segments
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Returns the dotted path, or `None` at the root
    pub fn dotted_path(&self) -> Option<String> {
        if self.path.is_empty() {
            None
        } else {
            Some(self.path.join("."))
        }
    }

    /// Returns the expected type, if known
    pub fn expected(&self) -> Option<&str> {
        self.expected.as_deref()
    }
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.dotted_path() {
            Some(path) => write!(f, "{}: {}", path, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for DataError {}

/// Result type for coercion and schema operations
pub type DataResult<T> = Result<T, DataError>;

/// Returns the JSON type name for error messages.
pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;

    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "int"
            } else {
                "float"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_type_mismatch_message() {
        let err = DataError::type_mismatch("int", &json!("abc"));
        assert_eq!(err.message(), "value is not int, got string");
        assert_eq!(err.expected(), Some("int"));
        assert!(err.path().is_empty());
    }

    #[test]
    fn test_path_prefixing() {
        let err = DataError::new("bad").at_index(2).at("tags");
        assert_eq!(err.path(), ["tags".to_string(), "2".to_string()]);
        assert_eq!(err.to_string(), "tags.2: bad");
    }

    #[test]
    fn test_root_display_has_no_path() {
        let err = DataError::new("value is blank");
        assert_eq!(err.dotted_path(), None);
        assert_eq!(err.to_string(), "value is blank");
    }

    #[test]
    fn test_missing_and_extra_fields() {
        assert_eq!(DataError::missing_field("name").to_string(), "name: is required");
        assert_eq!(
            DataError::extra_field("ghost").to_string(),
            "ghost: is not allowed key"
        );
    }
}
