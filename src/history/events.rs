//! Content of history and QC events

use super::current::write_fingerprint;
use super::errors::HistoryResult;
use crate::fingerprint::FingerprintSet;
use crate::redact::RedactMode;
use crate::store::MetaNode;

/// Value of the QC `reason` child
pub const REASON: &str = "REDACTION";

/// Identity written into every history event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolIdentity {
    pub name: String,
    pub version: String,
    pub build: String,
}

impl ToolIdentity {
    /// This binary under `name`
    pub fn current(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            build: format!("{}-{}", std::env::consts::ARCH, std::env::consts::OS),
        }
    }
}

/// Fills a `HISTORY/EVENT_<n>` node
pub fn write_run_event(event: &mut MetaNode, tool: &ToolIdentity, mode: RedactMode, timestamp: &str) {
    event.write_attr("run", timestamp);
    event.write_attr("tool", tool.name.as_str());
    event.write_attr("vers", tool.version.as_str());
    event.write_attr("build", tool.build.as_str());
    event.write_attr("updated", mode.updated_columns());
}

/// Fills a `QC/history/event_<n>` node.
///
/// `original` is the previous current snapshot copied verbatim, or the
/// input fingerprint of this run when there is none.
pub fn write_qc_event(
    event: &mut MetaNode,
    previous_current: Option<&MetaNode>,
    fingerprints: &FingerprintSet,
    timestamp: &str,
) -> HistoryResult<()> {
    event.write_child("reason", REASON);

    let original = event.open_update("original");
    match previous_current {
        Some(current) => original.copy_from(current),
        None => {
            write_fingerprint(original, fingerprints.input(), timestamp)?;
        }
    }

    write_fingerprint(event.open_update("removed"), fingerprints.removed(), timestamp)?;
    write_fingerprint(event.open_update("added"), fingerprints.added(), timestamp)?;
    Ok(())
}
