//! CLI argument definitions using clap
//!
//! read-filter-redact [--config <path>] [--log-level <level>]
//!                    -F <list> [-r] [--check | --verify] <RUN>

use clap::Parser;
use std::path::PathBuf;

/// Redact listed spots of a sequencing-read run
#[derive(Parser, Debug)]
#[command(name = "read-filter-redact")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to a JSON settings file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides the settings file
    #[arg(long)]
    pub log_level: Option<String>,

    /// File with ascending spot ids to redact, one per line
    #[arg(short = 'F', long = "file", value_name = "LIST", required_unless_present = "verify")]
    pub file: Option<PathBuf>,

    /// Also mask READ and QUALITY of redacted spots
    #[arg(short = 'r', long)]
    pub redact: bool,

    /// Only validate the list against the run
    #[arg(long, conflicts_with = "verify")]
    pub check: bool,

    /// Only audit the latest QC event of the run
    #[arg(long)]
    pub verify: bool,

    /// Run document to redact
    #[arg(value_name = "RUN")]
    pub run: PathBuf,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
