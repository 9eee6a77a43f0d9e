//! read-filter-redact entry point
//!
//! Exit status:
//! - 0: success
//! - 1: failure
//! - 2: run cancelled
//!
//! All logic is delegated to the CLI module.

use read_filter_redact::cli;

fn main() {
    match cli::run() {
        Ok(outcome) => std::process::exit(outcome.exit_code()),
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}
