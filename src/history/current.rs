//! Fingerprint nodes and the current snapshot
//!
//! A fingerprint node has six children: algorithm, digest, fingerprint,
//! format, version and timestamp. `QC/current` is the only metadata node
//! that is overwritten rather than appended.

use super::errors::{HistoryError, HistoryResult};
use crate::fingerprint::{digest_of, Fingerprint, FingerprintContent};
use crate::observability::{log_event_with_fields, Event};
use crate::store::MetaNode;

/// Path of the current snapshot
pub const CURRENT: &str = "QC/current";

/// Writes the fingerprint children into `node`.
///
/// Nothing is written if the fingerprint cannot be serialized.
pub fn write_fingerprint(
    node: &mut MetaNode,
    fp: &Fingerprint,
    timestamp: &str,
) -> HistoryResult<String> {
    let json = fp.json().map_err(|e| HistoryError::serialization(&e))?;
    let digest = digest_of(&json);

    node.write_child("algorithm", fp.algorithm());
    node.write_child("digest", digest.as_str());
    node.write_child("fingerprint", json);
    node.write_child("format", fp.format());
    node.write_child("version", fp.version());
    node.write_child("timestamp", timestamp);
    Ok(digest)
}

/// Overwrites `QC/current` with `fp`
pub fn update_current(
    meta: &mut MetaNode,
    fp: &Fingerprint,
    timestamp: &str,
) -> HistoryResult<()> {
    let mut node = MetaNode::new();
    let digest =
        write_fingerprint(&mut node, fp, timestamp).map_err(|e| e.with_path(CURRENT))?;
    *meta.open_update(CURRENT) = node;

    log_event_with_fields(
        Event::CurrentUpdated,
        &[("digest", digest), ("records", fp.records().to_string())],
    );
    Ok(())
}

/// Reads back the fingerprint stored under `node`, checking its digest.
///
/// `path` is used in error messages.
pub fn read_fingerprint(node: &MetaNode, path: &str) -> HistoryResult<FingerprintContent> {
    let json = node
        .child("fingerprint")
        .and_then(MetaNode::read)
        .ok_or_else(|| HistoryError::missing_node(format!("{}/fingerprint", path)))?;
    let digest = node
        .child("digest")
        .and_then(MetaNode::read)
        .ok_or_else(|| HistoryError::missing_node(format!("{}/digest", path)))?;

    if digest_of(json) != digest {
        return Err(HistoryError::format("fingerprint digest mismatch").with_path(path));
    }

    FingerprintContent::from_json(json).map_err(|e| {
        HistoryError::format(format!("cannot parse fingerprint: {}", e)).with_path(path)
    })
}
