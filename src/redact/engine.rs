//! Single-pass redaction sweep
//!
//! For every spot of the run, in ascending order:
//! 1. Read READ_FILTER and READ_LEN (plus READ and QUALITY in full-content mode)
//! 2. Substitute the scratch replacement if the spot is listed
//! 3. Write the row as one unit
//! 4. Feed the fingerprints
//!
//! Cancellation is polled between spots.

use std::io::Read;

use super::buffers::BufferRecycler;
use super::errors::{RedactError, RedactResult};
use super::mode::RedactMode;
use crate::fingerprint::FingerprintSet;
use crate::observability::{log_event_with_fields, Event};
use crate::pipeline::CancelToken;
use crate::spotlist::{SpotId, SpotIterator};
use crate::store::{DestinationTable, ReadPayload, RowWrite, SourceTable};

/// Counts of a finished or cancelled sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RedactStats {
    /// Spots traversed and written
    pub spots: u64,
    /// Spots redacted
    pub redacted: u64,
    /// Sweep stopped on a cancellation request
    pub cancelled: bool,
}

/// Splits `bases` by segment lengths. Returns true as second value if the
/// lengths add up to more than the bytes present; segments are clamped.
pub fn split_segments<'a>(bases: &'a [u8], lengths: &[u32]) -> (Vec<&'a [u8]>, bool) {
    let mut segments = Vec::with_capacity(lengths.len());
    let mut offset = 0usize;
    let mut overflow = false;

    for &len in lengths {
        let wanted = offset.saturating_add(len as usize);
        if wanted > bases.len() {
            overflow = true;
        }
        let end = wanted.min(bases.len());
        segments.push(&bases[offset..end]);
        offset = end;
    }

    (segments, overflow)
}

/// Drives one redaction sweep
#[derive(Debug)]
pub struct RedactionEngine {
    mode: RedactMode,
    buffers: BufferRecycler,
    fingerprints: FingerprintSet,
    stats: RedactStats,
}

impl RedactionEngine {
    pub fn new(mode: RedactMode) -> Self {
        Self {
            mode,
            buffers: BufferRecycler::new(),
            fingerprints: FingerprintSet::new(mode),
            stats: RedactStats::default(),
        }
    }

    pub fn mode(&self) -> RedactMode {
        self.mode
    }

    /// Counts so far
    pub fn stats(&self) -> RedactStats {
        self.stats
    }

    /// Fingerprints accumulated so far
    pub fn fingerprints(&self) -> &FingerprintSet {
        &self.fingerprints
    }

    /// Consumes the engine, keeping the fingerprints
    pub fn into_fingerprints(self) -> FingerprintSet {
        self.fingerprints
    }

    /// Sweeps every spot of `spots` from `source` into `dest`.
    ///
    /// A failing spot is never written; rows written before it stay. The
    /// destination is committed after a complete or cancelled sweep.
    pub fn run<R, S, D>(
        &mut self,
        mut spots: SpotIterator<R>,
        source: &S,
        dest: &mut D,
        cancel: &CancelToken,
    ) -> RedactResult<RedactStats>
    where
        R: Read,
        S: SourceTable + ?Sized,
        D: DestinationTable + ?Sized,
    {
        loop {
            if cancel.is_cancelled() {
                self.stats.cancelled = true;
                log_event_with_fields(
                    Event::RunCancelled,
                    &[
                        ("spots", self.stats.spots.to_string()),
                        ("redacted", self.stats.redacted.to_string()),
                    ],
                );
                break;
            }

            let decision = match spots.next_spot() {
                Ok(Some(decision)) => decision,
                Ok(None) => break,
                Err(e) => {
                    let err = RedactError::from(e);
                    return Err(match spots.current() {
                        Some(id) => err.at_spot(id),
                        None => err,
                    });
                }
            };

            self.process(decision.id, decision.redact, source, dest)
                .map_err(|e| e.at_spot(decision.id))?;
        }

        if !self.stats.cancelled {
            spots.finish()?;
        }
        dest.commit()?;

        Ok(self.stats)
    }

    fn process<S, D>(
        &mut self,
        id: SpotId,
        redact: bool,
        source: &S,
        dest: &mut D,
    ) -> RedactResult<()>
    where
        S: SourceTable + ?Sized,
        D: DestinationTable + ?Sized,
    {
        let full_content = self.mode.is_full_content();

        let filter = source.read_filter(id)?;
        let lengths = source.read_lengths(id)?;
        let (bases, quality) = if full_content {
            (Some(source.read_bases(id)?), Some(source.read_quality(id)?))
        } else {
            (None, None)
        };

        if let (Some(bases), Some(quality)) = (bases, quality) {
            if bases.len() != quality.len() {
                log_event_with_fields(
                    Event::LengthMismatch,
                    &[
                        ("spot", id.to_string()),
                        ("read", bases.len().to_string()),
                        ("quality", quality.len().to_string()),
                    ],
                );
            }
        }

        let write = if redact {
            log_event_with_fields(Event::SpotRedacted, &[("spot", id.to_string())]);
            let replacement = self.buffers.replacement(
                filter.len(),
                bases.map(<[u8]>::len),
                quality.map(<[u8]>::len),
            )?;
            RowWrite {
                filter: replacement.filter,
                payload: replacement
                    .bases
                    .zip(replacement.quality)
                    .map(|(bases, quality)| ReadPayload { bases, quality }),
            }
        } else {
            RowWrite {
                filter,
                payload: bases
                    .zip(quality)
                    .map(|(bases, quality)| ReadPayload { bases, quality }),
            }
        };

        dest.write_row(id, &write)?;

        if let (Some(original), Some(written)) = (bases, write.payload) {
            let (original_segments, overflow) = split_segments(original, lengths);
            if overflow {
                log_event_with_fields(
                    Event::SegmentOverflow,
                    &[
                        ("spot", id.to_string()),
                        ("read", original.len().to_string()),
                        (
                            "segments",
                            lengths.iter().map(|&l| u64::from(l)).sum::<u64>().to_string(),
                        ),
                    ],
                );
            }
            let (written_segments, _) = split_segments(written.bases, lengths);
            self.fingerprints
                .record_spot(&original_segments, &written_segments, redact);
        }

        self.stats.spots += 1;
        if redact {
            self.stats.redacted += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spotlist::SpotListReader;
    use crate::store::{IdRange, MemoryTable, SpotRow, StagedWriter, WriteColumns};

    fn table(n: usize) -> MemoryTable {
        MemoryTable::new(
            (0..n)
                .map(|i| {
                    let read = if i % 2 == 0 { "ACGTAC" } else { "GGTTCA" };
                    SpotRow::new(read, vec![3, 3], vec![30; 6])
                })
                .collect(),
        )
    }

    fn iterator(list: &'static str, n: u64) -> SpotIterator<&'static [u8]> {
        let reader = SpotListReader::new(list.as_bytes(), "ids.txt", 1, n);
        SpotIterator::new(reader, IdRange::new(1, n)).unwrap()
    }

    #[test]
    fn test_split_segments() {
        let (segments, overflow) = split_segments(b"ACGTA", &[2, 3]);
        assert_eq!(segments, vec![&b"AC"[..], &b"GTA"[..]]);
        assert!(!overflow);

        let (segments, overflow) = split_segments(b"ACG", &[2, 3]);
        assert_eq!(segments, vec![&b"AC"[..], &b"G"[..]]);
        assert!(overflow);
    }

    #[test]
    fn test_filter_only_sweep() {
        let source = table(10);
        let mut dest = StagedWriter::new(WriteColumns::Filter);
        let mut engine = RedactionEngine::new(RedactMode::FilterOnly);

        let stats = engine
            .run(iterator("3\n7\n", 10), &source, &mut dest, &CancelToken::new())
            .unwrap();

        assert_eq!(stats, RedactStats { spots: 10, redacted: 2, cancelled: false });
        assert!(dest.is_committed());
        assert_eq!(dest.row(3).unwrap().read_filter, vec![3, 3]);
        assert_eq!(dest.row(4).unwrap().read_filter, vec![0, 0]);
        assert!(dest.row(3).unwrap().read.is_none());
        assert_eq!(engine.fingerprints().input().records(), 0);
    }

    #[test]
    fn test_full_content_sweep() {
        let source = table(4);
        let mut dest = StagedWriter::new(WriteColumns::FilterAndReads);
        let mut engine = RedactionEngine::new(RedactMode::FullContent);

        engine
            .run(iterator("2\n", 4), &source, &mut dest, &CancelToken::new())
            .unwrap();

        let row = dest.row(2).unwrap();
        assert_eq!(row.read.as_deref(), Some(&b"NNNNNN"[..]));
        assert_eq!(row.quality.as_deref(), Some(&[0u8; 6][..]));
        assert_eq!(dest.row(1).unwrap().read.as_deref(), Some(&b"ACGTAC"[..]));

        let fps = engine.fingerprints();
        assert_eq!(fps.input().records(), 8);
        assert_eq!(fps.removed().records(), 2);
        assert_eq!(fps.added().records(), 2);
    }

    #[test]
    fn test_cancel_before_first_spot() {
        let source = table(5);
        let mut dest = StagedWriter::new(WriteColumns::Filter);
        let cancel = CancelToken::new();
        cancel.cancel();

        let stats = RedactionEngine::new(RedactMode::FilterOnly)
            .run(iterator("2\n", 5), &source, &mut dest, &cancel)
            .unwrap();

        assert!(stats.cancelled);
        assert_eq!(stats.spots, 0);
        assert!(dest.is_committed());
    }

    #[test]
    fn test_list_error_stops_before_spot() {
        let source = table(5);
        let mut dest = StagedWriter::new(WriteColumns::Filter);
        let mut engine = RedactionEngine::new(RedactMode::FilterOnly);

        let err = engine
            .run(iterator("2\n1\n", 5), &source, &mut dest, &CancelToken::new())
            .unwrap_err();

        assert!(err.list_error().is_some());
        assert_eq!(err.spot(), Some(2));
        assert_eq!(dest.len(), 1);
        assert!(dest.row(2).is_none());
        assert!(!dest.is_committed());
    }

    #[test]
    fn test_list_error_names_spot_id() {
        let source = table(5).with_first_row(100);
        let reader = SpotListReader::new("101\n101\n".as_bytes(), "ids.txt", 100, 104);
        let spots = SpotIterator::new(reader, IdRange::new(100, 5)).unwrap();
        let mut dest = StagedWriter::new(WriteColumns::Filter);

        let err = RedactionEngine::new(RedactMode::FilterOnly)
            .run(spots, &source, &mut dest, &CancelToken::new())
            .unwrap_err();

        assert_eq!(err.spot(), Some(101));
        assert!(err.to_string().contains("spot: 101"));
        assert_eq!(dest.len(), 1);
    }

    #[test]
    fn test_quality_length_mismatch_continues() {
        let source = MemoryTable::new(vec![
            SpotRow::new("ACGTAC", vec![3, 3], vec![30; 4]),
            SpotRow::new("GGTTCA", vec![3, 3], vec![30; 6]),
        ]);
        let mut dest = StagedWriter::new(WriteColumns::FilterAndReads);
        let mut engine = RedactionEngine::new(RedactMode::FullContent);

        let stats = engine
            .run(iterator("1\n", 2), &source, &mut dest, &CancelToken::new())
            .unwrap();

        assert_eq!(stats, RedactStats { spots: 2, redacted: 1, cancelled: false });
        let row = dest.row(1).unwrap();
        assert_eq!(row.read.as_deref(), Some(&b"NNNNNN"[..]));
        assert_eq!(row.quality.as_deref(), Some(&[0u8; 4][..]));
        assert_eq!(dest.row(2).unwrap().read.as_deref(), Some(&b"GGTTCA"[..]));
        assert_eq!(dest.row(2).unwrap().quality.as_deref(), Some(&[30u8; 6][..]));
    }
}
