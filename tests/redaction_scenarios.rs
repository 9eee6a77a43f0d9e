//! End-to-end redaction scenarios
//!
//! Runs the whole pipeline over in-memory runs:
//! - filter-only and full-content sweeps
//! - empty and out-of-range lists
//! - lock restoration on success and failure
//! - QC audit after a full-content run
//! - cancellation at a spot boundary

use std::fs;
use std::path::PathBuf;

use read_filter_redact::pipeline::{execute, CancelToken, PipelineError, RedactRequest};
use read_filter_redact::redact::{RedactMode, RedactionEngine, REDACTED_FILTER};
use read_filter_redact::spotlist::{InputDir, SpotIterator, SpotListErrorCode, SpotListReader};
use read_filter_redact::store::{
    DestinationTable, Lockable, MemoryTable, RowWrite, RunArchive, SourceTable, SpotRow,
    StagedWriter, StoreResult, WriteColumns,
};
use tempfile::TempDir;

// =============================================================================
// Test Utilities
// =============================================================================

const READS: [&str; 3] = ["ACGTACGTAC", "TTGCAAGGCT", "GATTACAGAT"];

fn run(spots: usize) -> RunArchive {
    let rows = (0..spots)
        .map(|i| SpotRow::new(READS[i % READS.len()], vec![4, 6], vec![35; 10]))
        .collect();
    RunArchive::new(MemoryTable::new(rows)).with_name("scenario")
}

fn write_list(dir: &TempDir, ids: &str) -> PathBuf {
    let path = dir.path().join("ids.txt");
    fs::write(&path, ids).expect("Failed to write list");
    path
}

fn redacted_ids(archive: &RunArchive) -> Vec<u64> {
    archive
        .table()
        .rows()
        .iter()
        .enumerate()
        .filter(|(_, row)| row.read_filter.iter().all(|&f| f == REDACTED_FILTER))
        .map(|(i, _)| i as u64 + 1)
        .collect()
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_filter_only_marks_listed_spots() {
    let dir = TempDir::new().unwrap();
    let list = write_list(&dir, "3\n7\n");
    let mut archive = run(10);
    let before = archive.table().clone();

    let report = execute(
        &mut archive,
        &InputDir::native(),
        &RedactRequest::new(list, RedactMode::FilterOnly),
        &CancelToken::new(),
    )
    .unwrap();

    assert_eq!(report.spots, 10);
    assert_eq!(report.redacted, 2);
    assert!(!report.read_updated());
    assert_eq!(redacted_ids(&archive), vec![3, 7]);

    for (after, before) in archive.table().rows().iter().zip(before.rows()) {
        assert_eq!(after.read, before.read);
        assert_eq!(after.quality, before.quality);
    }

    assert!(archive.metadata().exists("HISTORY/EVENT_1"));
    assert!(!archive.metadata().exists("QC"));
}

#[test]
fn test_full_content_masks_reads() {
    let dir = TempDir::new().unwrap();
    let list = write_list(&dir, "2\n");
    let mut archive = run(3);

    let report = execute(
        &mut archive,
        &InputDir::native(),
        &RedactRequest::new(list, RedactMode::FullContent),
        &CancelToken::new(),
    )
    .unwrap();

    assert!(report.read_updated());
    assert_eq!(report.history.qc_event, Some(1));

    let row = archive.table().row(2).unwrap();
    assert_eq!(row.read, "NNNNNNNNNN");
    assert_eq!(row.quality, vec![0; 10]);
    assert_eq!(row.read_filter, vec![REDACTED_FILTER; 2]);
    assert_eq!(archive.table().row(1).unwrap().read, READS[0]);
}

#[test]
fn test_empty_list_passes_everything_through() {
    let dir = TempDir::new().unwrap();
    let list = write_list(&dir, "");
    let source = run(5);
    let range = source.table().id_range().unwrap();

    let reader = SpotListReader::open(&InputDir::native(), &list, range.first, range.last())
        .unwrap();
    let spots = SpotIterator::new(reader, range).unwrap();
    let mut engine = RedactionEngine::new(RedactMode::FullContent);
    let mut dest = StagedWriter::new(WriteColumns::FilterAndReads);
    let stats = engine
        .run(spots, source.table(), &mut dest, &CancelToken::new())
        .unwrap();

    assert_eq!(stats.redacted, 0);
    let fps = engine.fingerprints();
    assert_eq!(fps.input().digest().unwrap(), fps.output().digest().unwrap());
    assert_eq!(fps.removed().records(), 0);
    assert_eq!(fps.added().records(), 0);
}

#[test]
fn test_out_of_range_fails_before_traversal() {
    let dir = TempDir::new().unwrap();
    let list = write_list(&dir, "11\n");
    let mut archive = run(10);
    let before = archive.table().clone();

    let err = execute(
        &mut archive,
        &InputDir::native(),
        &RedactRequest::new(list, RedactMode::FullContent),
        &CancelToken::new(),
    )
    .unwrap_err();

    match err {
        PipelineError::SpotList(e) => {
            assert_eq!(e.code(), SpotListErrorCode::RfrListOutOfRange);
            assert_eq!(e.line_number(), Some(1));
        }
        other => panic!("Expected a list error, got {}", other),
    }
    assert_eq!(archive.table(), &before);
    assert!(!archive.metadata().exists("HISTORY"));
}

#[test]
fn test_locked_run_is_relocked_after_success() {
    let dir = TempDir::new().unwrap();
    let list = write_list(&dir, "1\n");
    let mut archive = run(2).with_locked(true);

    execute(
        &mut archive,
        &InputDir::native(),
        &RedactRequest::new(list, RedactMode::FilterOnly),
        &CancelToken::new(),
    )
    .unwrap();

    assert!(archive.is_locked());
}

#[test]
fn test_locked_run_is_relocked_after_failure() {
    let dir = TempDir::new().unwrap();
    let list = write_list(&dir, "2\n2\n");
    let mut archive = run(4).with_locked(true);

    let err = execute(
        &mut archive,
        &InputDir::native(),
        &RedactRequest::new(list, RedactMode::FilterOnly),
        &CancelToken::new(),
    )
    .unwrap_err();

    assert!(matches!(err, PipelineError::Redact(_)));
    assert!(archive.is_locked());
    assert!(redacted_ids(&archive).is_empty());
}

#[test]
fn test_qc_audit_balances_after_two_runs() {
    let dir = TempDir::new().unwrap();
    let mut archive = run(9);

    for ids in ["2\n4\n", "4\n8\n9\n"] {
        let list = write_list(&dir, ids);
        execute(
            &mut archive,
            &InputDir::native(),
            &RedactRequest::new(list, RedactMode::FullContent),
            &CancelToken::new(),
        )
        .unwrap();
    }

    assert!(archive.metadata().exists("QC/history/event_2"));
    let report = read_filter_redact::pipeline::verify_run(&archive).unwrap();
    assert!(report.is_consistent(), "differences: {:?}", report.differences);
}

// =============================================================================
// Cancellation
// =============================================================================

/// Destination that requests cancellation after a number of writes
struct CancelAfter {
    inner: StagedWriter,
    cancel: CancelToken,
    limit: usize,
}

impl DestinationTable for CancelAfter {
    fn write_row(&mut self, row: u64, write: &RowWrite<'_>) -> StoreResult<()> {
        self.inner.write_row(row, write)?;
        if self.inner.len() >= self.limit {
            self.cancel.cancel();
        }
        Ok(())
    }

    fn commit(&mut self) -> StoreResult<()> {
        self.inner.commit()
    }
}

#[test]
fn test_cancel_stops_at_spot_boundary() {
    let source = run(10);
    let cancel = CancelToken::new();
    let mut dest = CancelAfter {
        inner: StagedWriter::new(WriteColumns::Filter),
        cancel: cancel.clone(),
        limit: 4,
    };

    let reader = SpotListReader::new("2\n9\n".as_bytes(), "ids.txt", 1, 10);
    let spots = SpotIterator::new(reader, source.table().id_range().unwrap()).unwrap();
    let stats = RedactionEngine::new(RedactMode::FilterOnly)
        .run(spots, source.table(), &mut dest, &cancel)
        .unwrap();

    assert!(stats.cancelled);
    assert_eq!(stats.spots, 4);
    assert_eq!(stats.redacted, 1);
    assert_eq!(dest.inner.len(), 4);
    assert!(dest.inner.is_committed());
}
