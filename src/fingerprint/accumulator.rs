//! Order-sensitive content fingerprint
//!
//! Ingests read segments one at a time. The canonical form holds per-position
//! base counts, end-of-read counts, the longest segment, the number of
//! segments and a SHA-256 over the framed ingestion stream. The histogram
//! alone is order-insensitive; the stream digest is not.

use std::fmt;

use sha2::{Digest, Sha256};

use super::audit::FingerprintContent;

/// Algorithm tag stored next to every fingerprint
pub const ALGORITHM: &str = "SHA-256";
/// Serialization tag of the canonical form
pub const FORMAT: &str = "json utf-8 compact";
/// Version of the canonical form
pub const VERSION: &str = "1.0.0";

/// Hex SHA-256 of a serialized fingerprint
pub fn digest_of(json: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    format!("{:x}", hasher.finalize())
}

const A: usize = 0;
const C: usize = 1;
const G: usize = 2;
const T: usize = 3;
const N: usize = 4;

fn base_index(base: u8) -> usize {
    match base.to_ascii_uppercase() {
        b'A' => A,
        b'C' => C,
        b'G' => G,
        b'T' => T,
        _ => N,
    }
}

fn to_signed(counts: &[u64]) -> Vec<i64> {
    counts
        .iter()
        .map(|&c| i64::try_from(c).unwrap_or(i64::MAX))
        .collect()
}

/// Running fingerprint over a sequence of byte strings
#[derive(Clone)]
pub struct Fingerprint {
    counts: [Vec<u64>; 5],
    end_of_read: Vec<u64>,
    maximum_position: usize,
    records: u64,
    stream: Sha256,
}

impl Fingerprint {
    /// Creates an empty fingerprint
    pub fn new() -> Self {
        Self {
            counts: std::array::from_fn(|_| vec![0]),
            end_of_read: vec![0],
            maximum_position: 0,
            records: 0,
            stream: Sha256::new(),
        }
    }

    fn grow(&mut self, len: usize) {
        if len > self.maximum_position {
            self.maximum_position = len;
            for counts in self.counts.iter_mut() {
                counts.resize(len + 1, 0);
            }
            self.end_of_read.resize(len + 1, 0);
        }
    }

    /// Ingests one segment
    pub fn record(&mut self, segment: &[u8]) {
        self.grow(segment.len());
        for (pos, &base) in segment.iter().enumerate() {
            self.counts[base_index(base)][pos] += 1;
        }
        self.end_of_read[segment.len()] += 1;
        self.records += 1;

        self.stream.update((segment.len() as u64).to_le_bytes());
        self.stream.update(segment);
    }

    /// Number of segments ingested
    pub fn records(&self) -> u64 {
        self.records
    }

    /// Longest segment seen
    pub fn maximum_position(&self) -> usize {
        self.maximum_position
    }

    /// Hex SHA-256 over the framed ingestion stream
    pub fn sequence_digest(&self) -> String {
        format!("{:x}", self.stream.clone().finalize())
    }

    /// Canonical form with ordered keys
    pub fn canonical_form(&self) -> FingerprintContent {
        FingerprintContent {
            a: to_signed(&self.counts[A]),
            c: to_signed(&self.counts[C]),
            end_of_read: to_signed(&self.end_of_read),
            g: to_signed(&self.counts[G]),
            n: to_signed(&self.counts[N]),
            t: to_signed(&self.counts[T]),
            maximum_position: self.maximum_position as u64,
            records: i64::try_from(self.records).unwrap_or(i64::MAX),
            sequence_digest: self.sequence_digest(),
        }
    }

    /// Compact JSON of the canonical form
    pub fn json(&self) -> Result<String, serde_json::Error> {
        self.canonical_form().to_json()
    }

    /// Hex SHA-256 of [`Fingerprint::json`]
    pub fn digest(&self) -> Result<String, serde_json::Error> {
        Ok(digest_of(&self.json()?))
    }

    pub fn algorithm(&self) -> &'static str {
        ALGORITHM
    }

    pub fn format(&self) -> &'static str {
        FORMAT
    }

    pub fn version(&self) -> &'static str {
        VERSION
    }
}

impl Default for Fingerprint {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fingerprint")
            .field("records", &self.records)
            .field("maximum_position", &self.maximum_position)
            .field("sequence_digest", &self.sequence_digest())
            .finish()
    }
}
