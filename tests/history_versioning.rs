//! History versioning tests
//!
//! - Sequential runs get sequential, never colliding indexes
//! - Existing events are never rewritten
//! - QC/current is the only node replaced between runs
//! - Interrupted events are detectable

use read_filter_redact::fingerprint::FingerprintSet;
use read_filter_redact::history::{
    audit_latest_redaction, read_fingerprint, EventState, HistoryErrorCode, HistoryWriter,
    IndexedLog, CURRENT,
};
use read_filter_redact::redact::RedactMode;
use read_filter_redact::store::{MetaNode, RunArchive};

fn fingerprints(redacted: &[u8]) -> FingerprintSet {
    let mut set = FingerprintSet::new(RedactMode::FullContent);
    set.record_spot(&[&b"ACGTTGCA"[..]], &[&b"ACGTTGCA"[..]], false);
    set.record_spot(&[redacted], &[&b"NNNNNNNN"[..]], true);
    set
}

#[test]
fn test_two_runs_get_index_one_then_two() {
    let writer = HistoryWriter::new("read-filter-redact");
    let mut meta = MetaNode::new();

    let first = writer
        .record_run(&mut meta, RedactMode::FilterOnly, &FingerprintSet::new(RedactMode::FilterOnly))
        .unwrap();
    let second = writer
        .record_run(&mut meta, RedactMode::FilterOnly, &FingerprintSet::new(RedactMode::FilterOnly))
        .unwrap();

    assert_eq!(first.event, 1);
    assert_eq!(second.event, 2);
    assert_eq!(meta.open("HISTORY").unwrap().child_count(), 2);
}

#[test]
fn test_earlier_events_are_not_rewritten() {
    let first_writer = HistoryWriter::new("read-filter-redact").with_timestamp("2024-01-01T00:00:00+00:00");
    let second_writer = HistoryWriter::new("read-filter-redact").with_timestamp("2024-06-01T00:00:00+00:00");
    let mut meta = MetaNode::new();

    first_writer
        .record_run(&mut meta, RedactMode::FullContent, &fingerprints(b"GGGGCCCC"))
        .unwrap();
    let event_1 = meta.open("HISTORY/EVENT_1").unwrap().clone();
    let qc_1 = meta.open("QC/history/event_1").unwrap().clone();
    let current_1 = meta.open(CURRENT).unwrap().clone();

    second_writer
        .record_run(&mut meta, RedactMode::FullContent, &fingerprints(b"TTTTAAAA"))
        .unwrap();

    assert_eq!(meta.open("HISTORY/EVENT_1"), Some(&event_1));
    assert_eq!(meta.open("QC/history/event_1"), Some(&qc_1));
    assert_ne!(meta.open(CURRENT), Some(&current_1));
    assert_eq!(meta.open("QC/history/event_2/original"), Some(&current_1));
    assert_eq!(
        meta.open(CURRENT).unwrap().child("timestamp").unwrap().read(),
        Some("2024-06-01T00:00:00+00:00")
    );
}

#[test]
fn test_run_event_attributes() {
    let writer = HistoryWriter::new("custom-tool").with_timestamp("ts");
    let mut meta = MetaNode::new();
    writer
        .record_run(&mut meta, RedactMode::FullContent, &fingerprints(b"GGGGCCCC"))
        .unwrap();

    let event = meta.open("HISTORY/EVENT_1").unwrap();
    assert_eq!(event.attr("run"), Some("ts"));
    assert_eq!(event.attr("tool"), Some("custom-tool"));
    assert_eq!(event.attr("vers"), Some(writer.tool().version.as_str()));
    assert_eq!(event.attr("build"), Some(writer.tool().build.as_str()));
    assert_eq!(event.attr("updated"), Some("READ_FILTER,READ"));
}

#[test]
fn test_current_holds_output_fingerprint() {
    let set = fingerprints(b"GGGGCCCC");
    let mut meta = MetaNode::new();
    HistoryWriter::new("read-filter-redact")
        .record_run(&mut meta, RedactMode::FullContent, &set)
        .unwrap();

    let current = read_fingerprint(meta.open(CURRENT).unwrap(), CURRENT).unwrap();
    assert_eq!(current, set.output().canonical_form());
}

#[test]
fn test_interrupted_event_is_reported() {
    let log = IndexedLog::qc_history();
    let mut meta = MetaNode::new();
    HistoryWriter::new("read-filter-redact")
        .record_run(&mut meta, RedactMode::FullContent, &fingerprints(b"GGGGCCCC"))
        .unwrap();

    // an event cut short before its seal
    meta.open_update(&log.event_path(2)).write_child("reason", "REDACTION");

    assert_eq!(log.inspect(&meta, 1), EventState::Sealed);
    assert_eq!(log.inspect(&meta, 2), EventState::Partial);
    let err = audit_latest_redaction(&meta).unwrap_err();
    assert_eq!(err.code(), HistoryErrorCode::RfrHistoryPartialEvent);

    // the next run still appends after it
    assert_eq!(log.next_index(&meta).unwrap(), 3);
}

#[test]
fn test_history_survives_save_and_load() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("run.json");

    let mut archive = RunArchive::default();
    HistoryWriter::new("read-filter-redact")
        .record_run(archive.metadata_mut(), RedactMode::FullContent, &fingerprints(b"GGGGCCCC"))
        .unwrap();
    archive.save(&path).unwrap();

    let loaded = RunArchive::load(&path).unwrap();
    assert_eq!(loaded.metadata(), archive.metadata());
    assert_eq!(IndexedLog::history().inspect(loaded.metadata(), 1), EventState::Sealed);
    assert!(audit_latest_redaction(loaded.metadata()).unwrap().is_consistent());
}
