//! CLI module for docfilter
//!
//! Provides command-line interface for:
//! - filter: translate a raw filter into a query document
//! - payload: validate a create/update payload

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{filter, payload, run, run_command};
pub use errors::{CliError, CliResult};
pub use io::{parse_request, read_request, write_error, write_response};
