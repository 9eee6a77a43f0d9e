//! Observability for redaction runs
//!
//! - Typed lifecycle events with stable names
//! - Structured key/value fields in deterministic order
//! - Emission through `tracing`; the binary installs the subscriber
//!
//! # Usage
//!
//! ```ignore
//! use read_filter_redact::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::SpotRedacted, &[("spot", spot.to_string())]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{init, render_fields, Logger, Severity};

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, String)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
