//! CLI argument definitions using clap
//!
//! Commands:
//! - docfilter filter --schema <path> [--config <path>]
//! - docfilter payload --schema <path> [--primary-key <name>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// docfilter - Schema-checked filter translation
#[derive(Parser, Debug)]
#[command(name = "docfilter")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Translate a raw filter read from stdin into a query document
    Filter {
        /// Path to schema definition file
        #[arg(long)]
        schema: PathBuf,

        /// Path to filter configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate a create/update payload read from stdin
    Payload {
        /// Path to schema definition file
        #[arg(long)]
        schema: PathBuf,

        /// Primary-key field excluded from payloads
        #[arg(long, default_value = "_id")]
        primary_key: String,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
