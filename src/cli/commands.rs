//! CLI command implementations
//!
//! One invocation does exactly one of:
//! - redact: sweep the run and save it back
//! - check: validate the list against the run, write nothing
//! - verify: audit the latest QC event of the run, write nothing

use crate::observability::{self, log_event_with_fields, Event};
use crate::pipeline::{self, CancelToken, RedactRequest, RunReport};
use crate::redact::RedactMode;
use crate::spotlist::InputDir;
use crate::store::RunArchive;

use super::args::Cli;
use super::config::RedactConfig;
use super::errors::{CliError, CliResult};

/// How a successful invocation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Work finished
    Completed,
    /// Redaction stopped on a cancellation request
    Cancelled,
}

impl Outcome {
    /// Process exit status
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Completed => 0,
            Outcome::Cancelled => 2,
        }
    }
}

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<Outcome> {
    let cli = Cli::parse_args();
    run_command(cli, &CancelToken::new())
}

/// Loads settings, installs logging and runs the selected command
pub fn run_command(cli: Cli, cancel: &CancelToken) -> CliResult<Outcome> {
    let config = load_config(&cli)?;
    observability::init(&config.log_level);

    if let Some(path) = &cli.config {
        log_event_with_fields(
            Event::ConfigLoaded,
            &[
                ("path", path.display().to_string()),
                ("max_line_length", config.max_line_length.to_string()),
            ],
        );
    }

    if cli.verify {
        return verify(&cli);
    }

    let list = cli
        .file
        .clone()
        .ok_or_else(|| CliError::config_error("missing spot list (-F)"))?;

    if cli.check {
        return check(&cli, &config, &list);
    }

    let request = RedactRequest::new(list, RedactMode::from_flag(cli.redact))
        .with_max_line(config.max_line_length)
        .with_tool_name(config.tool_name.as_str());
    redact(&cli, &request, cancel)
}

fn load_config(cli: &Cli) -> CliResult<RedactConfig> {
    let config = match &cli.config {
        Some(path) => RedactConfig::load(path)?,
        None => RedactConfig::default(),
    };
    match &cli.log_level {
        Some(level) => config.with_log_level(level.as_str()),
        None => Ok(config),
    }
}

/// Redacts the run and prints the summary
pub fn redact(cli: &Cli, request: &RedactRequest, cancel: &CancelToken) -> CliResult<Outcome> {
    let report = pipeline::run_archive(&cli.run, &InputDir::native(), request, cancel)?;
    print_report(&report);

    if report.cancelled {
        Ok(Outcome::Cancelled)
    } else {
        Ok(Outcome::Completed)
    }
}

fn print_report(report: &RunReport) {
    for line in report.summary() {
        println!("{}", line);
    }
}

/// Validates the list against the run
pub fn check(cli: &Cli, config: &RedactConfig, list: &std::path::Path) -> CliResult<Outcome> {
    let archive = RunArchive::load(&cli.run).map_err(pipeline::PipelineError::from)?;
    let summary =
        pipeline::check_list(&archive, &InputDir::native(), list, config.max_line_length)?;

    match (summary.first, summary.last) {
        (Some(first), Some(last)) => println!(
            "List is valid: {} spots to redact ({}..={})",
            summary.count, first, last
        ),
        _ => println!("List is valid: no spots to redact"),
    }
    Ok(Outcome::Completed)
}

/// Audits the latest QC event
pub fn verify(cli: &Cli) -> CliResult<Outcome> {
    let archive = RunArchive::load(&cli.run).map_err(pipeline::PipelineError::from)?;
    let report = pipeline::verify_run(&archive)?;

    if !report.is_consistent() {
        return Err(CliError::audit_failed(format!(
            "original + added - removed does not match current in: {}",
            report.differences.join(", ")
        )));
    }

    println!("Audit passed: latest redaction is consistent");
    Ok(Outcome::Completed)
}
