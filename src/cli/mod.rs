//! CLI module for read-filter-redact
//!
//! Provides the command-line interface for:
//! - redaction of listed spots (`-F LIST [-r] RUN`)
//! - list validation (`--check`)
//! - QC audit of the latest redaction (`--verify`)

mod args;
mod commands;
mod config;
mod errors;

pub use args::Cli;
pub use commands::{check, redact, run, run_command, verify, Outcome};
pub use config::RedactConfig;
pub use errors::{CliError, CliErrorCode, CliResult};
