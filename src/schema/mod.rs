//! Schema subsystem
//!
//! Ordered field descriptors and the validators that coerce untrusted values
//! into each field's declared type.
//!
//! # Design Principles
//!
//! - Schemas are read-only once built and shared across threads
//! - Declared type comes from the validator, never stored separately
//! - Field names are unique; order is declaration order
//! - Coercion failures are structured (`DataError`), never panics

mod errors;
mod loader;
mod projector;
mod types;
mod validators;

pub use errors::{DataError, DataResult};
pub use loader::{load_schema_file, parse_schema, FieldDef, FieldTypeDef, SchemaDef};
pub use projector::create_validator;
pub use types::{FieldDescriptor, FieldKind, FieldValidator, Schema};
pub use validators::{BoolField, DateTimeField, FloatField, IntField, ObjectIdField, StringField};
