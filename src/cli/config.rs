//! Settings file
//!
//! Every field is optional. Without `--config` all defaults apply.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::errors::{CliError, CliResult};
use crate::pipeline::TOOL_NAME;
use crate::spotlist::DEFAULT_MAX_LINE;

const MAX_LINE_LIMIT: usize = 4096;
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Run settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedactConfig {
    /// Longest accepted list line, terminators excluded (default 255)
    #[serde(default = "default_max_line_length")]
    pub max_line_length: usize,

    /// Default log level when RUST_LOG is unset (default "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Tool name recorded in history events
    #[serde(default = "default_tool_name")]
    pub tool_name: String,
}

fn default_max_line_length() -> usize {
    DEFAULT_MAX_LINE
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_tool_name() -> String {
    TOOL_NAME.to_string()
}

impl Default for RedactConfig {
    fn default() -> Self {
        Self {
            max_line_length: default_max_line_length(),
            log_level: default_log_level(),
            tool_name: default_tool_name(),
        }
    }
}

impl RedactConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: RedactConfig = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Overrides the log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> CliResult<Self> {
        self.log_level = level.into();
        self.validate()?;
        Ok(self)
    }

    /// Validate configuration
    pub fn validate(&self) -> CliResult<()> {
        if self.max_line_length == 0 || self.max_line_length > MAX_LINE_LIMIT {
            return Err(CliError::config_error(format!(
                "max_line_length must be in 1..={}, got {}",
                MAX_LINE_LIMIT, self.max_line_length
            )));
        }

        if !LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(CliError::config_error(format!(
                "Invalid log_level: '{}'",
                self.log_level
            )));
        }

        if self.tool_name.trim().is_empty() {
            return Err(CliError::config_error("tool_name must not be empty"));
        }

        Ok(())
    }
}
