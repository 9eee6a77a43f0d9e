//! Top-level redaction run
//!
//! Sequence of one run:
//! 1. Check the list file exists
//! 2. Open the run for writing (unlocking it if needed)
//! 3. Sweep every spot through the engine into a staged writer
//! 4. Install the staged rows, then write history
//! 5. Re-lock the run, on every exit path
//!
//! The first error wins; a failing re-lock is reported only when the run
//! itself succeeded.

mod cancel;

pub use cancel::CancelToken;

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::fingerprint::AuditReport;
use crate::history::{audit_latest_redaction, HistoryError, HistoryRecord, HistoryWriter};
use crate::observability::{log_event_with_fields, Event};
use crate::redact::{RedactError, RedactMode, RedactionEngine};
use crate::spotlist::{
    validate_list, InputDir, ListSummary, SpotIterator, SpotListError, SpotListReader,
    DEFAULT_MAX_LINE,
};
use crate::store::{
    Lockable, RunArchive, SourceTable, StagedWriter, StoreError, WriteAccess,
};

/// Default tool name written into history events
pub const TOOL_NAME: &str = "read-filter-redact";

/// Any failure of a run
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{0}")]
    SpotList(#[from] SpotListError),

    #[error("{0}")]
    Redact(#[from] RedactError),

    #[error("{0}")]
    Store(#[from] StoreError),

    #[error("{0}")]
    History(#[from] HistoryError),
}

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;

/// What to redact and how
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedactRequest {
    pub list: PathBuf,
    pub mode: RedactMode,
    pub max_line: usize,
    pub tool_name: String,
}

impl RedactRequest {
    pub fn new(list: impl Into<PathBuf>, mode: RedactMode) -> Self {
        Self {
            list: list.into(),
            mode,
            max_line: DEFAULT_MAX_LINE,
            tool_name: TOOL_NAME.to_string(),
        }
    }

    pub fn with_max_line(mut self, max_line: usize) -> Self {
        self.max_line = max_line;
        self
    }

    pub fn with_tool_name(mut self, tool_name: impl Into<String>) -> Self {
        self.tool_name = tool_name.into();
        self
    }
}

/// Outcome of a successful or cancelled run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub spots: u64,
    pub redacted: u64,
    pub cancelled: bool,
    pub mode: RedactMode,
    pub history: HistoryRecord,
}

impl RunReport {
    /// Returns true if READ and QUALITY were rewritten
    pub fn read_updated(&self) -> bool {
        self.mode.is_full_content()
    }

    /// Human-readable result lines
    pub fn summary(&self) -> Vec<String> {
        vec![
            format!(
                "Success: redacted {} spots out of {}",
                self.redacted, self.spots
            ),
            format!(
                "READ column was {}updated",
                if self.read_updated() { "" } else { "not " }
            ),
        ]
    }
}

/// Redacts the spots listed in `request.list` from `archive`
pub fn execute(
    archive: &mut RunArchive,
    dir: &InputDir,
    request: &RedactRequest,
    cancel: &CancelToken,
) -> PipelineResult<RunReport> {
    log_event_with_fields(
        Event::RedactStart,
        &[
            ("run", archive.name().to_string()),
            ("list", request.list.display().to_string()),
            ("columns", request.mode.updated_columns()),
        ],
    );

    let result = guarded(archive, dir, request, cancel);

    match &result {
        Ok(report) => {
            log_event_with_fields(
                Event::RedactComplete,
                &[
                    ("spots", report.spots.to_string()),
                    ("redacted", report.redacted.to_string()),
                    ("cancelled", report.cancelled.to_string()),
                    ("read_updated", report.read_updated().to_string()),
                ],
            );
        }
        Err(e) => {
            log_event_with_fields(Event::RedactFailed, &[("error", e.to_string())]);
        }
    }

    result
}

fn guarded(
    archive: &mut RunArchive,
    dir: &InputDir,
    request: &RedactRequest,
    cancel: &CancelToken,
) -> PipelineResult<RunReport> {
    if !dir.exists(&request.list) {
        return Err(SpotListError::not_found(request.list.display().to_string()).into());
    }

    let access = WriteAccess::acquire(archive)?;
    let result = sweep(archive, dir, request, cancel);
    let released = access.release(archive);

    let report = result?;
    released?;
    Ok(report)
}

fn sweep(
    archive: &mut RunArchive,
    dir: &InputDir,
    request: &RedactRequest,
    cancel: &CancelToken,
) -> PipelineResult<RunReport> {
    let range = archive.table().id_range()?;
    let list = SpotListReader::open(dir, &request.list, range.first, range.last())?
        .with_max_line(request.max_line);
    let spots = SpotIterator::new(list, range)?;

    let mut engine = RedactionEngine::new(request.mode);
    let mut writer = StagedWriter::new(request.mode.write_columns());
    let stats = engine.run(spots, archive.table(), &mut writer, cancel)?;

    archive.table_mut().apply(writer)?;

    let fingerprints = engine.into_fingerprints();
    let history = HistoryWriter::new(request.tool_name.as_str()).record_run(
        archive.metadata_mut(),
        request.mode,
        &fingerprints,
    )?;

    Ok(RunReport {
        spots: stats.spots,
        redacted: stats.redacted,
        cancelled: stats.cancelled,
        mode: request.mode,
        history,
    })
}

/// Loads the run document at `path`, redacts it and saves it back.
///
/// A failed run leaves the document untouched.
pub fn run_archive(
    path: &Path,
    dir: &InputDir,
    request: &RedactRequest,
    cancel: &CancelToken,
) -> PipelineResult<RunReport> {
    let mut archive = RunArchive::load(path)?;
    let report = execute(&mut archive, dir, request, cancel)?;
    archive.save(path)?;

    log_event_with_fields(Event::RunSaved, &[("run", path.display().to_string())]);
    Ok(report)
}

/// Validates a whole list against the run's id range without writing
pub fn check_list(
    archive: &RunArchive,
    dir: &InputDir,
    list: &Path,
    max_line: usize,
) -> PipelineResult<ListSummary> {
    let range = archive.table().id_range()?;
    let reader =
        SpotListReader::open(dir, list, range.first, range.last())?.with_max_line(max_line);
    let summary = validate_list(reader)?;

    log_event_with_fields(
        Event::ListChecked,
        &[
            ("list", list.display().to_string()),
            ("count", summary.count.to_string()),
            ("spots", range.count.to_string()),
        ],
    );
    Ok(summary)
}

/// Audits the latest QC event of a run
pub fn verify_run(archive: &RunArchive) -> PipelineResult<AuditReport> {
    Ok(audit_latest_redaction(archive.metadata())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spotlist::SpotListErrorCode;
    use crate::store::{MemoryTable, SpotRow};
    use std::fs;
    use tempfile::TempDir;

    fn archive(spots: usize) -> RunArchive {
        let rows = (0..spots)
            .map(|_| SpotRow::new("ACGTACGT", vec![4, 4], vec![30; 8]))
            .collect();
        RunArchive::new(MemoryTable::new(rows)).with_locked(true)
    }

    fn list(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("ids.txt");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_missing_list_fails_before_unlocking() {
        let dir = TempDir::new().unwrap();
        let mut run = archive(3);
        let request = RedactRequest::new(dir.path().join("absent.txt"), RedactMode::FilterOnly);

        let err = execute(&mut run, &InputDir::native(), &request, &CancelToken::new())
            .unwrap_err();

        match err {
            PipelineError::SpotList(e) => assert_eq!(e.code(), SpotListErrorCode::RfrListNotFound),
            other => panic!("unexpected error: {}", other),
        }
        assert!(run.is_locked());
    }

    #[test]
    fn test_report_summary() {
        let dir = TempDir::new().unwrap();
        let path = list(&dir, "2\n");
        let mut run = archive(3);
        let request = RedactRequest::new(path, RedactMode::FilterOnly);

        let report = execute(&mut run, &InputDir::native(), &request, &CancelToken::new())
            .unwrap();

        assert_eq!(
            report.summary(),
            vec![
                "Success: redacted 1 spots out of 3".to_string(),
                "READ column was not updated".to_string(),
            ]
        );
        assert!(run.is_locked());
    }

    #[test]
    fn test_check_list() {
        let dir = TempDir::new().unwrap();
        let path = list(&dir, "1\n3\n");
        let summary = check_list(&archive(3), &InputDir::native(), &path, DEFAULT_MAX_LINE)
            .unwrap();
        assert_eq!(summary.count, 2);
        assert_eq!(summary.last, Some(3));

        let path = list(&dir, "4\n");
        assert!(check_list(&archive(3), &InputDir::native(), &path, DEFAULT_MAX_LINE).is_err());
    }

    #[test]
    fn test_run_archive_round_trip() {
        let dir = TempDir::new().unwrap();
        let run_path = dir.path().join("run.json");
        archive(4).save(&run_path).unwrap();
        let path = list(&dir, "4\n");

        let request = RedactRequest::new(path, RedactMode::FullContent);
        let report =
            run_archive(&run_path, &InputDir::native(), &request, &CancelToken::new()).unwrap();
        assert_eq!(report.redacted, 1);

        let saved = RunArchive::load(&run_path).unwrap();
        assert_eq!(saved.table().row(4).unwrap().read, "NNNNNNNN");
        assert!(saved.metadata().exists("QC/current/digest"));
        assert!(verify_run(&saved).unwrap().is_consistent());
    }
}
