//! CLI command implementations
//!
//! Each command reads one JSON document from stdin, writes one JSON
//! response to stdout, and exits non-zero if the input was rejected.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing_subscriber::EnvFilter;

use crate::filter::{FilterBuilder, FilterConfig};
use crate::schema::{create_validator, load_schema_file, Schema};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::{read_request, write_error, write_response};

/// Default log filter when `RUST_LOG` is unset
const DEFAULT_LOG_FILTER: &str = "warn";

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    init_logging();
    let cli = Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    let input = read_request()?;

    let result = match cmd {
        Command::Filter { schema, config } => filter(&schema, config.as_deref(), &input),
        Command::Payload {
            schema,
            primary_key,
        } => payload(&schema, &primary_key, &input),
    };

    match result {
        Ok(data) => write_response(data),
        Err(e) if e.is_rejection() => {
            write_error(e.code(), &e.to_string())?;
            Err(e)
        }
        Err(e) => Err(e),
    }
}

/// Translate a raw filter against the schema file
pub fn filter(schema_path: &Path, config_path: Option<&Path>, raw: &Value) -> CliResult<Value> {
    let schema = load_schema(schema_path)?;
    let config = load_config(config_path)?;

    let query = FilterBuilder::with_config(&schema, config).build(raw)?;
    Ok(Value::Object(query))
}

/// Validate a create/update payload against the schema file minus its
/// primary key
pub fn payload(schema_path: &Path, primary_key: &str, payload: &Value) -> CliResult<Value> {
    let schema = load_schema(schema_path)?;
    let validator = create_validator(&schema, primary_key);

    let normalized = validator
        .check_payload(payload)
        .map_err(CliError::Payload)?;
    Ok(Value::Object(normalized))
}

fn load_schema(path: &Path) -> CliResult<Schema> {
    load_schema_file(path).map_err(|e| CliError::Config(e.to_string()))
}

fn load_config(path: Option<&Path>) -> CliResult<FilterConfig> {
    let Some(path) = path else {
        return Ok(FilterConfig::default());
    };

    let content = fs::read_to_string(path)
        .map_err(|e| CliError::Config(format!("{}: {}", path.display(), e)))?;
    serde_json::from_str(&content)
        .map_err(|e| CliError::Config(format!("{}: {}", path.display(), e)))
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    // Ignore the error if a subscriber is already installed
    let _ = tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init();
}
