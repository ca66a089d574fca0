//! docfilter - Schema-checked filter translation for document database admin APIs
//!
//! Client filters are untrusted: every field must exist in the schema, every
//! operator must be legal for the field's kind, and every value is coerced
//! by the field's validator before it reaches the query document.

pub mod cli;
pub mod filter;
pub mod schema;

pub use filter::{create_filter, FilterBuilder, FilterConfig, FilterError, QueryDocument};
pub use schema::{create_validator, FieldDescriptor, FieldKind, FieldValidator, Schema};
