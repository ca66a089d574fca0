//! docfilter CLI entry point
//!
//! All logic is delegated to the CLI module; errors go to stderr with a
//! non-zero exit code.

use docfilter::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
