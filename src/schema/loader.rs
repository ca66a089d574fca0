//! Schema definitions loaded from JSON
//!
//! Format:
//!
//! ```json
//! {
//!   "fields": [
//!     { "name": "_id", "type": "objectid" },
//!     { "name": "name", "type": "string", "max_length": 64 },
//!     { "name": "age", "type": "int", "gte": 0, "optional": true }
//!   ]
//! }
//! ```
//!
//! Field order in the file is the schema order.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::{DataError, DataResult};
use super::types::{FieldDescriptor, Schema};
use super::validators::{
    BoolField, DateTimeField, FloatField, IntField, ObjectIdField, StringField,
};

/// Field type with its validator options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldTypeDef {
    String {
        #[serde(default)]
        allow_blank: bool,
        #[serde(default)]
        min_length: Option<usize>,
        #[serde(default)]
        max_length: Option<usize>,
    },
    Int {
        #[serde(default)]
        gte: Option<i64>,
        #[serde(default)]
        lte: Option<i64>,
    },
    Float {
        #[serde(default)]
        gte: Option<f64>,
        #[serde(default)]
        lte: Option<f64>,
    },
    Bool,
    DateTime,
    ObjectId,
}

/// Keys every field entry may carry
const FIELD_KEYS: &[&str] = &["name", "type", "optional"];

const STRING_OPTIONS: &[&str] = &["allow_blank", "min_length", "max_length"];
const BOUND_OPTIONS: &[&str] = &["gte", "lte"];
const NO_OPTIONS: &[&str] = &[];

impl FieldTypeDef {
    /// Option keys accepted for a `type` tag, or `None` for an unknown tag
    fn option_keys(tag: &str) -> Option<&'static [&'static str]> {
        match tag {
            "string" => Some(STRING_OPTIONS),
            "int" | "float" => Some(BOUND_OPTIONS),
            "bool" | "datetime" | "objectid" => Some(NO_OPTIONS),
            _ => None,
        }
    }
}

/// One field entry of a schema definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(flatten)]
    pub field_type: FieldTypeDef,
    #[serde(default)]
    pub optional: bool,
}

impl FieldDef {
    fn into_descriptor(self) -> FieldDescriptor {
        let descriptor = match self.field_type {
            FieldTypeDef::String {
                allow_blank,
                min_length,
                max_length,
            } => FieldDescriptor::new(
                self.name,
                StringField {
                    allow_blank,
                    min_length,
                    max_length,
                },
            ),
            FieldTypeDef::Int { gte, lte } => {
                FieldDescriptor::new(self.name, IntField { gte, lte })
            }
            FieldTypeDef::Float { gte, lte } => {
                FieldDescriptor::new(self.name, FloatField { gte, lte })
            }
            FieldTypeDef::Bool => FieldDescriptor::new(self.name, BoolField),
            FieldTypeDef::DateTime => FieldDescriptor::new(self.name, DateTimeField),
            FieldTypeDef::ObjectId => FieldDescriptor::new(self.name, ObjectIdField),
        };

        if self.optional {
            descriptor.optional()
        } else {
            descriptor
        }
    }
}

/// Serialized schema definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDef {
    pub fields: Vec<FieldDef>,
}

impl SchemaDef {
    /// Build the schema, rejecting duplicate field names
    pub fn into_schema(self) -> DataResult<Schema> {
        Schema::new(
            self.fields
                .into_iter()
                .map(FieldDef::into_descriptor)
                .collect(),
        )
    }
}

/// Parse a schema definition from a JSON string
pub fn parse_schema(content: &str) -> DataResult<Schema> {
    let raw: Value = serde_json::from_str(content).map_err(invalid_definition)?;
    check_option_keys(&raw)?;

    let def: SchemaDef = serde_json::from_value(raw).map_err(invalid_definition)?;
    def.into_schema()
}

fn invalid_definition(e: serde_json::Error) -> DataError {
    DataError::new(format!("invalid schema definition: {}", e))
}

/// Reject option keys the field's type does not declare.
///
/// Flattened entries cannot use `deny_unknown_fields`, so leftover keys are
/// checked here. Shape errors (missing `type`, non-object entries) are left
/// for serde to report.
fn check_option_keys(raw: &Value) -> DataResult<()> {
    let Some(fields) = raw.get("fields").and_then(Value::as_array) else {
        return Ok(());
    };

    for entry in fields.iter().filter_map(Value::as_object) {
        let Some(tag) = entry.get("type").and_then(Value::as_str) else {
            continue;
        };
        let Some(options) = FieldTypeDef::option_keys(tag) else {
            continue;
        };

        let unknown = entry
            .keys()
            .find(|k| !FIELD_KEYS.contains(&k.as_str()) && !options.contains(&k.as_str()));

        if let Some(key) = unknown {
            let name = entry.get("name").and_then(Value::as_str).unwrap_or("<unnamed>");
            return Err(
                DataError::new(format!("unknown option '{}' for type {}", key, tag)).at(name),
            );
        }
    }
    Ok(())
}

/// Load a schema definition file
pub fn load_schema_file(path: &Path) -> DataResult<Schema> {
    let content = fs::read_to_string(path).map_err(|e| {
        DataError::new(format!("failed to read schema file: {}", e)).at(path.display().to_string())
    })?;

    let schema = parse_schema(&content).map_err(|e| e.at(path.display().to_string()))?;
    tracing::debug!(path = %path.display(), fields = schema.len(), "schema loaded");
    Ok(schema)
}
