//! CLI-specific error types

use std::io;

use thiserror::Error;

use crate::filter::FilterError;
use crate::schema::DataError;

/// CLI errors
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration or schema file could not be used
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error (stdin/stdout)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed JSON input
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Filter rejected
    #[error("{0}")]
    Filter(#[from] FilterError),

    /// Payload rejected
    #[error("Invalid payload: {0}")]
    Payload(DataError),
}

impl CliError {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            CliError::Config(_) => "CLI_CONFIG_ERROR",
            CliError::Io(_) => "CLI_IO_ERROR",
            CliError::Json(_) => "CLI_JSON_ERROR",
            CliError::Filter(e) => e.code(),
            CliError::Payload(_) => "PAYLOAD_VALIDATION_FAILED",
        }
    }

    /// Whether the input itself was rejected (as opposed to a setup failure)
    pub fn is_rejection(&self) -> bool {
        matches!(self, CliError::Filter(_) | CliError::Payload(_))
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_error_keeps_code() {
        let err = CliError::from(FilterError::UnknownField("ghost".into()));
        assert_eq!(err.code(), "FILTER_UNKNOWN_FIELD");
        assert!(err.is_rejection());
        assert_eq!(err.to_string(), "Unknown field: ghost");
    }

    #[test]
    fn test_setup_errors_are_not_rejections() {
        let err = CliError::Config("missing".into());
        assert_eq!(err.code(), "CLI_CONFIG_ERROR");
        assert!(!err.is_rejection());
    }
}
