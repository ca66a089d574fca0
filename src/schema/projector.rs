//! Schema projection for create/update validation
//!
//! Document keys are assigned by the database, never by the client, so
//! create/update payloads are validated against a copy of the schema with
//! the primary-key field removed.

use super::types::Schema;

impl Schema {
    /// Returns a copy of this schema without the field named `primary_key`.
    ///
    /// Exact name match. Order of the remaining fields is preserved; an
    /// absent name yields an identical schema.
    pub fn without(&self, primary_key: &str) -> Schema {
        let fields: Vec<_> = self
            .fields()
            .iter()
            .filter(|f| f.name() != primary_key)
            .cloned()
            .collect();

        tracing::debug!(
            primary_key,
            removed = self.len() - fields.len(),
            "projected schema"
        );

        Schema::from_unique(fields)
    }
}

/// Build the create/update validator for a schema keyed by `primary_key`.
pub fn create_validator(schema: &Schema, primary_key: &str) -> Schema {
    schema.without(primary_key)
}
