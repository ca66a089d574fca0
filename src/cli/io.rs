//! JSON I/O handling for CLI
//!
//! - Input: single JSON document via stdin
//! - Output: single JSON object via stdout
//! - Logs go to stderr, never stdout

use std::io::{self, Read, Write};

use serde_json::Value;

use super::errors::{CliError, CliResult};

/// Read a JSON document from stdin
pub fn read_request() -> CliResult<Value> {
    let mut input = String::new();
    io::stdin().lock().read_to_string(&mut input)?;
    parse_request(&input)
}

/// Parse a JSON document, rejecting empty input
pub fn parse_request(input: &str) -> CliResult<Value> {
    if input.trim().is_empty() {
        return Err(CliError::Io(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "empty input",
        )));
    }
    Ok(serde_json::from_str(input)?)
}

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    write_line(&serde_json::json!({
        "status": "ok",
        "data": data
    }))
}

/// Write an error response to stdout
pub fn write_error(code: &str, message: &str) -> CliResult<()> {
    write_line(&serde_json::json!({
        "status": "error",
        "code": code,
        "message": message
    }))
}

fn write_line(response: &Value) -> CliResult<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, response)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}
