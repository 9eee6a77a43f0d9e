//! Validating reader for ascending spot id lists

use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::dir::InputDir;
use super::errors::{SpotListError, SpotListResult};
use super::line::{LineReader, DEFAULT_MAX_LINE};
use super::SpotId;

/// Streams strictly ascending spot ids from a list file.
///
/// Each accepted id is bigger than the previous one and lies inside
/// `first_spot..=max_spot`. Blank lines are skipped. Any rejection is
/// fatal and carries the path and line.
pub struct SpotListReader<R: Read> {
    lines: LineReader<R>,
    path: String,
    first_spot: SpotId,
    max_spot: SpotId,
    last: Option<SpotId>,
}

impl SpotListReader<File> {
    /// Opens `path` through `dir`
    pub fn open(
        dir: &InputDir,
        path: &Path,
        first_spot: SpotId,
        max_spot: SpotId,
    ) -> SpotListResult<Self> {
        let file = dir.open_read(path)?;
        Ok(Self::new(file, path.display().to_string(), first_spot, max_spot))
    }
}

impl<R: Read> SpotListReader<R> {
    /// Wraps an already open reader; `path` is used in diagnostics only
    pub fn new(reader: R, path: impl Into<String>, first_spot: SpotId, max_spot: SpotId) -> Self {
        Self {
            lines: LineReader::new(reader, DEFAULT_MAX_LINE),
            path: path.into(),
            first_spot,
            max_spot,
            last: None,
        }
    }

    /// Replaces the line buffer size
    pub fn with_max_line(mut self, max_line: usize) -> Self {
        self.lines.set_max_line(max_line);
        self
    }

    /// Path given at construction
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Last accepted id
    pub fn last(&self) -> Option<SpotId> {
        self.last
    }

    /// Reads the next id. Returns `None` at end of list.
    pub fn next_id(&mut self) -> SpotListResult<Option<SpotId>> {
        loop {
            let line = match self.lines.next_line() {
                Ok(Some(line)) => line,
                Ok(None) => return Ok(None),
                Err(e) => return Err(e.with_path(self.path.clone())),
            };

            if line.text.is_empty() {
                continue;
            }

            return self
                .accept(line.number, &line.text)
                .map(Some)
                .map_err(|e| e.with_path(self.path.clone()));
        }
    }

    fn accept(&mut self, number: u64, text: &str) -> SpotListResult<SpotId> {
        if let Some(ch) = text.chars().find(|c| !c.is_ascii_digit()) {
            return Err(SpotListError::bad_character(number, text, ch));
        }

        // digits only, so a parse failure means the value overflows
        let id = match text.parse::<SpotId>() {
            Ok(id) => id,
            Err(_) => {
                return Err(SpotListError::out_of_range(
                    number,
                    text,
                    self.first_spot,
                    self.max_spot,
                ))
            }
        };

        if id == 0 {
            return Err(SpotListError::zero_id(number, text));
        }
        if let Some(last) = self.last {
            if id == last {
                return Err(SpotListError::duplicate(number, text, id));
            }
            if id < last {
                return Err(SpotListError::unsorted(number, text, id, last));
            }
        }
        if id < self.first_spot || id > self.max_spot {
            return Err(SpotListError::out_of_range(
                number,
                text,
                self.first_spot,
                self.max_spot,
            ));
        }

        self.last = Some(id);
        Ok(id)
    }
}

/// Outcome of a dry-run list validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListSummary {
    /// Number of accepted ids
    pub count: u64,
    /// First accepted id
    pub first: Option<SpotId>,
    /// Last accepted id
    pub last: Option<SpotId>,
}

/// Reads a whole list, validating every entry, without touching any table
pub fn validate_list<R: Read>(mut reader: SpotListReader<R>) -> SpotListResult<ListSummary> {
    let mut summary = ListSummary::default();
    while let Some(id) = reader.next_id()? {
        summary.count += 1;
        summary.first.get_or_insert(id);
        summary.last = Some(id);
    }
    Ok(summary)
}
