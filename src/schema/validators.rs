//! Built-in field validators
//!
//! Filter values usually arrive as query-string text, so numeric and boolean
//! validators accept their textual forms and normalize them to JSON
//! numbers/booleans. Every validator rejects `null`.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Number, Value};

use super::errors::{DataError, DataResult};
use super::types::{FieldKind, FieldValidator};

/// UTF-8 string field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringField {
    /// Accept empty or whitespace-only strings
    pub allow_blank: bool,
    /// Minimum length in characters
    pub min_length: Option<usize>,
    /// Maximum length in characters
    pub max_length: Option<usize>,
}

impl StringField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allow_blank(mut self) -> Self {
        self.allow_blank = true;
        self
    }

    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }
}

impl FieldValidator for StringField {
    fn kind(&self) -> FieldKind {
        FieldKind::String
    }

    fn check(&self, value: &Value) -> DataResult<Value> {
        let s = value
            .as_str()
            .ok_or_else(|| DataError::type_mismatch("string", value))?;

        if !self.allow_blank && s.trim().is_empty() {
            return Err(DataError::new("blank value is not allowed"));
        }

        let len = s.chars().count();
        if let Some(min) = self.min_length {
            if len < min {
                return Err(DataError::new(format!(
                    "string is shorter than {} characters",
                    min
                )));
            }
        }
        if let Some(max) = self.max_length {
            if len > max {
                return Err(DataError::new(format!(
                    "string is longer than {} characters",
                    max
                )));
            }
        }

        Ok(Value::String(s.to_string()))
    }
}

/// 64-bit signed integer field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntField {
    /// Inclusive lower bound
    pub gte: Option<i64>,
    /// Inclusive upper bound
    pub lte: Option<i64>,
}

impl IntField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gte(mut self, bound: i64) -> Self {
        self.gte = Some(bound);
        self
    }

    pub fn lte(mut self, bound: i64) -> Self {
        self.lte = Some(bound);
        self
    }

    fn parse(value: &Value) -> DataResult<i64> {
        match value {
            Value::Number(n) => n.as_i64().ok_or_else(|| {
                if n.is_u64() {
                    DataError::new("value is out of range for int")
                } else {
                    DataError::type_mismatch("int", value)
                }
            }),
            Value::String(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| DataError::new("value can't be converted to int")),
            _ => Err(DataError::type_mismatch("int", value)),
        }
    }
}

impl FieldValidator for IntField {
    fn kind(&self) -> FieldKind {
        FieldKind::Integer
    }

    fn check(&self, value: &Value) -> DataResult<Value> {
        let n = Self::parse(value)?;
        check_bounds(n, self.gte, self.lte)?;
        Ok(Value::from(n))
    }
}

/// 64-bit floating point field
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FloatField {
    /// Inclusive lower bound
    pub gte: Option<f64>,
    /// Inclusive upper bound
    pub lte: Option<f64>,
}

impl FloatField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gte(mut self, bound: f64) -> Self {
        self.gte = Some(bound);
        self
    }

    pub fn lte(mut self, bound: f64) -> Self {
        self.lte = Some(bound);
        self
    }
}

impl FieldValidator for FloatField {
    fn kind(&self) -> FieldKind {
        FieldKind::Float
    }

    fn check(&self, value: &Value) -> DataResult<Value> {
        let f = match value {
            Value::Number(n) => n
                .as_f64()
                .ok_or_else(|| DataError::type_mismatch("float", value))?,
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| DataError::new("value can't be converted to float"))?,
            _ => return Err(DataError::type_mismatch("float", value)),
        };

        check_bounds(f, self.gte, self.lte)?;

        Number::from_f64(f)
            .map(Value::Number)
            .ok_or_else(|| DataError::new("value is not a finite number"))
    }
}

/// Boolean field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoolField;

impl FieldValidator for BoolField {
    fn kind(&self) -> FieldKind {
        FieldKind::Boolean
    }

    fn check(&self, value: &Value) -> DataResult<Value> {
        match value {
            Value::Bool(b) => Ok(Value::Bool(*b)),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Ok(Value::Bool(true)),
                "false" | "0" => Ok(Value::Bool(false)),
                _ => Err(DataError::new("value can't be converted to bool")),
            },
            _ => Err(DataError::type_mismatch("bool", value)),
        }
    }
}

/// RFC 3339 timestamp field, normalized to UTC
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateTimeField;

impl FieldValidator for DateTimeField {
    fn kind(&self) -> FieldKind {
        FieldKind::DateTime
    }

    fn check(&self, value: &Value) -> DataResult<Value> {
        let s = value
            .as_str()
            .ok_or_else(|| DataError::type_mismatch("datetime", value))?;

        let parsed = DateTime::parse_from_rfc3339(s.trim())
            .map_err(|e| DataError::new(format!("value is not a valid datetime: {}", e)))?;

        Ok(Value::String(
            parsed
                .with_timezone(&Utc)
                .to_rfc3339_opts(SecondsFormat::AutoSi, true),
        ))
    }
}

/// Document identifier field.
///
/// Filter values go through [`ObjectIdField::convert`] only, the
/// identity-style conversion of a hex string. Payload checks also accept the
/// extended-JSON `{"$oid": ".."}` form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObjectIdField;

impl ObjectIdField {
    const HEX_LEN: usize = 24;

    /// Convert a 24-digit hex string into `{"$oid": "<lowercase hex>"}`
    pub fn convert(value: &Value) -> DataResult<Value> {
        let s = value
            .as_str()
            .ok_or_else(|| DataError::type_mismatch("objectid", value))?;

        if s.len() != Self::HEX_LEN || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(DataError::new(format!("'{}' is not a valid ObjectId", s)));
        }

        Ok(json!({ "$oid": s.to_ascii_lowercase() }))
    }
}

impl FieldValidator for ObjectIdField {
    fn kind(&self) -> FieldKind {
        FieldKind::ObjectId
    }

    fn check(&self, value: &Value) -> DataResult<Value> {
        if let Some(obj) = value.as_object() {
            if let (1, Some(inner)) = (obj.len(), obj.get("$oid")) {
                return Self::convert(inner);
            }
        }
        Self::convert(value)
    }

    fn coerce(&self, value: &Value) -> DataResult<Value> {
        Self::convert(value)
    }
}

fn check_bounds<T>(n: T, gte: Option<T>, lte: Option<T>) -> DataResult<()>
where
    T: PartialOrd + std::fmt::Display,
{
    if let Some(min) = gte {
        if n < min {
            return Err(DataError::new(format!("value is less than {}", min)));
        }
    }
    if let Some(max) = lte {
        if n > max {
            return Err(DataError::new(format!("value is greater than {}", max)));
        }
    }
    Ok(())
}
