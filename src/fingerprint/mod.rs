//! Content fingerprints of a redaction run
//!
//! Four accumulators of the same algorithm, fed in traversal order:
//! - input: original segments of every traversed spot
//! - output: segments actually written
//! - removed: original segments of redacted spots
//! - added: replacement segments of redacted spots
//!
//! Nothing is fed in filter-only mode.

mod accumulator;
mod audit;

pub use accumulator::{digest_of, Fingerprint, ALGORITHM, FORMAT, VERSION};
pub use audit::{verify_redaction, AuditReport, FingerprintContent};

use crate::redact::RedactMode;

/// The four fingerprints of one run
#[derive(Debug, Clone)]
pub struct FingerprintSet {
    mode: RedactMode,
    input: Fingerprint,
    output: Fingerprint,
    removed: Fingerprint,
    added: Fingerprint,
}

impl FingerprintSet {
    pub fn new(mode: RedactMode) -> Self {
        Self {
            mode,
            input: Fingerprint::new(),
            output: Fingerprint::new(),
            removed: Fingerprint::new(),
            added: Fingerprint::new(),
        }
    }

    /// Returns true if spots are fingerprinted in this mode
    pub fn is_enabled(&self) -> bool {
        self.mode.is_full_content()
    }

    /// Feeds one spot, segment by segment.
    ///
    /// `original` holds the segments read, `written` the segments committed.
    pub fn record_spot(&mut self, original: &[&[u8]], written: &[&[u8]], redacted: bool) {
        if !self.is_enabled() {
            return;
        }

        for segment in original {
            self.input.record(segment);
        }
        for segment in written {
            self.output.record(segment);
        }
        if redacted {
            for segment in original {
                self.removed.record(segment);
            }
            for segment in written {
                self.added.record(segment);
            }
        }
    }

    /// Every traversed spot before redaction
    pub fn input(&self) -> &Fingerprint {
        &self.input
    }

    /// Every traversed spot as written
    pub fn output(&self) -> &Fingerprint {
        &self.output
    }

    /// Redacted spots before redaction
    pub fn removed(&self) -> &Fingerprint {
        &self.removed
    }

    /// Redacted spots as written
    pub fn added(&self) -> &Fingerprint {
        &self.added
    }
}
