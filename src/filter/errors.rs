//! # Filter Errors
//!
//! Error types for filter translation. The first failure aborts the whole
//! translation; no partial query document is ever returned.

use thiserror::Error;

use crate::schema::{DataError, FieldKind};

/// Result type for filter operations
pub type FilterResult<T> = Result<T, FilterError>;

/// Coercion failure scoped to a filter field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Filter field the value belonged to
    pub field: String,
    /// Reason reported by the field validator
    pub message: String,
    /// Location inside the value (element index for `in` lists)
    pub path: Vec<String>,
    /// Expected type or condition, if the validator reported one
    pub expected: Option<String>,
}

impl ValidationError {
    /// Attach a field name to a validator failure
    pub fn from_data(field: impl Into<String>, err: DataError) -> Self {
        Self {
            field: field.into(),
            message: err.message().to_string(),
            path: err.path().to_vec(),
            expected: err.expected().map(str::to_string),
        }
    }

    /// Dotted location, starting at the field
    pub fn location(&self) -> String {
        if self.path.is_empty() {
            self.field.clone()
        } else {
            format!("{}.{}", self.field, self.path.join("."))
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.location(), self.message)
    }
}

/// Filter translation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// Operator string outside the supported set
    #[error("Operation not supported: {0}")]
    UnknownOperation(String),

    /// Field kind cannot be filtered on
    #[error("Filtering for column type {kind} not supported (field '{field}')")]
    UnsupportedColumnType { field: String, kind: FieldKind },

    /// Operator not permitted for the field kind
    #[error("Operation '{operator}' not supported for column type {kind} (field '{field}')")]
    UnsupportedOperation {
        field: String,
        kind: FieldKind,
        operator: String,
    },

    /// Filter references a field absent from the schema
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// Value failed coercion
    #[error("Invalid value for {0}")]
    Validation(ValidationError),

    /// Raw filter is not a mapping
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),
}

impl FilterError {
    /// Build a validation error for a field
    pub fn validation(field: impl Into<String>, err: DataError) -> Self {
        FilterError::Validation(ValidationError::from_data(field, err))
    }

    /// Stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            FilterError::UnknownOperation(_) => "FILTER_UNKNOWN_OPERATION",
            FilterError::UnsupportedColumnType { .. } => "FILTER_UNSUPPORTED_COLUMN_TYPE",
            FilterError::UnsupportedOperation { .. } => "FILTER_UNSUPPORTED_OPERATION",
            FilterError::UnknownField(_) => "FILTER_UNKNOWN_FIELD",
            FilterError::Validation(_) => "FILTER_VALIDATION_FAILED",
            FilterError::InvalidFilter(_) => "FILTER_INVALID",
        }
    }

    /// HTTP status hint for the calling layer
    pub fn status_code(&self) -> u16 {
        // All filter failures are client errors
        400
    }

    /// Field the error refers to, if any
    pub fn field(&self) -> Option<&str> {
        match self {
            FilterError::UnsupportedColumnType { field, .. }
            | FilterError::UnsupportedOperation { field, .. }
            | FilterError::UnknownField(field) => Some(field),
            FilterError::Validation(v) => Some(&v.field),
            FilterError::UnknownOperation(_) | FilterError::InvalidFilter(_) => None,
        }
    }
}
