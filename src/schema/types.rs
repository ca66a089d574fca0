//! Schema type definitions
//!
//! A schema is an ordered list of field descriptors. Each descriptor names a
//! field and carries the validator that coerces untrusted values into the
//! field's declared type. The declared type is never stored separately; it
//! is whatever the validator reports through [`FieldValidator::kind`].

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::errors::{DataError, DataResult};

/// Closed set of value kinds a field validator can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// UTF-8 string
    String,
    /// 64-bit signed integer
    Integer,
    /// 64-bit floating point
    Float,
    /// Document identifier (24 hex digits)
    ObjectId,
    /// Boolean
    Boolean,
    /// Timestamp with timezone
    DateTime,
}

impl FieldKind {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Integer => "int",
            FieldKind::Float => "float",
            FieldKind::ObjectId => "objectid",
            FieldKind::Boolean => "bool",
            FieldKind::DateTime => "datetime",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Coercion capability attached to a schema field.
///
/// Implementations must be pure: the same input always produces the same
/// output, and validators are shared across threads.
pub trait FieldValidator: fmt::Debug + Send + Sync {
    /// Kind of value this validator produces
    fn kind(&self) -> FieldKind;

    /// Validate and normalize a value
    fn check(&self, value: &Value) -> DataResult<Value>;

    /// Coerce a filter value.
    ///
    /// Defaults to [`check`](Self::check). Identity-like validators (document
    /// keys) override this with a plain conversion.
    fn coerce(&self, value: &Value) -> DataResult<Value> {
        self.check(value)
    }
}

/// A named schema entry
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    name: String,
    validator: Arc<dyn FieldValidator>,
    optional: bool,
}

impl FieldDescriptor {
    /// Create a required field
    pub fn new(name: impl Into<String>, validator: impl FieldValidator + 'static) -> Self {
        Self::from_arc(name, Arc::new(validator))
    }

    /// Create a required field from an already shared validator
    pub fn from_arc(name: impl Into<String>, validator: Arc<dyn FieldValidator>) -> Self {
        Self {
            name: name.into(),
            validator,
            optional: false,
        }
    }

    /// Mark the field as optional for payload validation
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Returns the field name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the field validator
    pub fn validator(&self) -> &dyn FieldValidator {
        self.validator.as_ref()
    }

    /// Returns the declared kind
    pub fn kind(&self) -> FieldKind {
        self.validator.kind()
    }

    /// Whether the field may be absent from a payload
    pub fn is_optional(&self) -> bool {
        self.optional
    }
}

/// Ordered set of field descriptors with unique names
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<FieldDescriptor>,
}

impl Schema {
    /// Create a schema, rejecting duplicate field names
    pub fn new(fields: Vec<FieldDescriptor>) -> DataResult<Self> {
        let mut seen = HashSet::with_capacity(fields.len());
        for field in &fields {
            if !seen.insert(field.name()) {
                return Err(DataError::new("duplicate field name").at(field.name()));
            }
        }
        Ok(Self { fields })
    }

    /// Build from descriptors already known to be unique
    pub(crate) fn from_unique(fields: Vec<FieldDescriptor>) -> Self {
        Self { fields }
    }

    /// Returns the descriptor for a field name
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Returns all descriptors in declaration order
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Returns field names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Validates a create/update payload and returns the normalized document.
    ///
    /// Rejects non-object payloads, undeclared keys and missing required
    /// fields. Present values go through each validator's `check` path.
    /// Output keys follow schema order.
    pub fn check_payload(&self, payload: &Value) -> DataResult<Map<String, Value>> {
        let obj = payload
            .as_object()
            .ok_or_else(|| DataError::type_mismatch("object", payload))?;

        for key in obj.keys() {
            if self.field(key).is_none() {
                return Err(DataError::extra_field(key.as_str()));
            }
        }

        let mut normalized = Map::with_capacity(obj.len());
        for field in &self.fields {
            match obj.get(field.name()) {
                Some(value) => {
                    let checked = field
                        .validator()
                        .check(value)
                        .map_err(|e| e.at(field.name()))?;
                    normalized.insert(field.name().to_string(), checked);
                }
                None if field.is_optional() => {}
                None => return Err(DataError::missing_field(field.name())),
            }
        }

        tracing::trace!(fields = normalized.len(), "payload validated");
        Ok(normalized)
    }
}
