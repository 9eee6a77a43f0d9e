//! Structured logger over `tracing`
//!
//! - One log record = one event
//! - Deterministic field ordering (alphabetical by key)
//! - Synchronous; the subscriber decides where records go

use std::fmt;

use tracing_subscriber::EnvFilter;

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Per-record detail
    Debug = 0,
    /// Normal operations
    Info = 1,
    /// Recoverable issues, the run continues
    Warn = 2,
    /// Run failures
    Error = 3,
}

impl Severity {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Stateless structured logger.
///
/// The event name goes into the `event` field of the `tracing` record and
/// the rendered `key=value` pairs become its message.
pub struct Logger;

impl Logger {
    /// Log an event with the given severity and fields
    pub fn log(severity: Severity, event: &str, fields: &[(&str, String)]) {
        let rendered = render_fields(fields);
        match severity {
            Severity::Debug => tracing::debug!(event = %event, "{}", rendered),
            Severity::Info => tracing::info!(event = %event, "{}", rendered),
            Severity::Warn => tracing::warn!(event = %event, "{}", rendered),
            Severity::Error => tracing::error!(event = %event, "{}", rendered),
        }
    }
}

/// Renders fields as space-separated `key=value`, sorted by key.
///
/// Values containing whitespace or quotes are quoted with `{:?}`.
pub fn render_fields(fields: &[(&str, String)]) -> String {
    let mut sorted: Vec<_> = fields.iter().collect();
    sorted.sort_by_key(|(k, _)| *k);

    let mut output = String::with_capacity(64);
    for (i, (key, value)) in sorted.into_iter().enumerate() {
        if i > 0 {
            output.push(' ');
        }
        output.push_str(key);
        output.push('=');
        if value.is_empty() || value.contains(|c: char| c.is_whitespace() || c == '"') {
            output.push_str(&format!("{:?}", value));
        } else {
            output.push_str(value);
        }
    }
    output
}

/// Installs the global fmt subscriber.
///
/// `RUST_LOG` wins over `default_level` when set. Calling this twice is
/// harmless: the second installation is ignored.
pub fn init(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
