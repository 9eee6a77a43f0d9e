//! Fingerprint content arithmetic for redaction audits
//!
//! A redaction replaces the removed segments with the added ones, so the
//! histograms must satisfy `original + added - removed == current`. The
//! sequence digest does not compose and takes no part in the check.

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// Parsed canonical form of a fingerprint.
///
/// Field order is the serialized key order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FingerprintContent {
    #[serde(rename = "A")]
    pub a: Vec<i64>,
    #[serde(rename = "C")]
    pub c: Vec<i64>,
    #[serde(rename = "EoR")]
    pub end_of_read: Vec<i64>,
    #[serde(rename = "G")]
    pub g: Vec<i64>,
    #[serde(rename = "N")]
    pub n: Vec<i64>,
    #[serde(rename = "T")]
    pub t: Vec<i64>,
    #[serde(rename = "maximum-position")]
    pub maximum_position: u64,
    #[serde(default)]
    pub records: i64,
    #[serde(rename = "sequence-digest", default, skip_serializing_if = "String::is_empty")]
    pub sequence_digest: String,
}

fn combine(lhs: &[i64], rhs: &[i64], op: fn(i64, i64) -> i64) -> Vec<i64> {
    let len = lhs.len().max(rhs.len());
    (0..len)
        .map(|i| op(*lhs.get(i).unwrap_or(&0), *rhs.get(i).unwrap_or(&0)))
        .collect()
}

fn trimmed(values: &[i64]) -> &[i64] {
    let end = values.iter().rposition(|&v| v != 0).map_or(0, |i| i + 1);
    &values[..end]
}

impl FingerprintContent {
    /// Compact JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parses a stored fingerprint
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    fn base(&self, base: char) -> Option<&[i64]> {
        match base.to_ascii_uppercase() {
            'A' => Some(self.a.as_slice()),
            'C' => Some(self.c.as_slice()),
            'G' => Some(self.g.as_slice()),
            'T' => Some(self.t.as_slice()),
            'N' => Some(self.n.as_slice()),
            _ => None,
        }
    }

    /// Sum over all positions of one base; 0 for an unknown base
    pub fn total(&self, base: char) -> i64 {
        self.base(base).map_or(0, |counts| counts.iter().sum())
    }

    /// Sum over all positions of all bases
    pub fn total_bases(&self) -> i64 {
        ['A', 'C', 'G', 'T', 'N'].iter().map(|&b| self.total(b)).sum()
    }

    fn combine(&self, other: &Self, op: fn(i64, i64) -> i64) -> Self {
        Self {
            a: combine(&self.a, &other.a, op),
            c: combine(&self.c, &other.c, op),
            end_of_read: combine(&self.end_of_read, &other.end_of_read, op),
            g: combine(&self.g, &other.g, op),
            n: combine(&self.n, &other.n, op),
            t: combine(&self.t, &other.t, op),
            maximum_position: self.maximum_position.max(other.maximum_position),
            records: op(self.records, other.records),
            sequence_digest: String::new(),
        }
    }

    /// Names of the additive fields that differ, ignoring trailing zeros
    pub fn histogram_differences(&self, other: &Self) -> Vec<&'static str> {
        let fields: [(&'static str, &[i64], &[i64]); 6] = [
            ("A", &self.a, &other.a),
            ("C", &self.c, &other.c),
            ("EoR", &self.end_of_read, &other.end_of_read),
            ("G", &self.g, &other.g),
            ("N", &self.n, &other.n),
            ("T", &self.t, &other.t),
        ];

        let mut differences: Vec<&'static str> = fields
            .iter()
            .filter(|(_, lhs, rhs)| trimmed(lhs) != trimmed(rhs))
            .map(|(name, _, _)| *name)
            .collect();
        if self.records != other.records {
            differences.push("records");
        }
        differences
    }
}

impl Add for &FingerprintContent {
    type Output = FingerprintContent;

    fn add(self, other: &FingerprintContent) -> FingerprintContent {
        self.combine(other, |a, b| a.saturating_add(b))
    }
}

impl Sub for &FingerprintContent {
    type Output = FingerprintContent;

    fn sub(self, other: &FingerprintContent) -> FingerprintContent {
        self.combine(other, |a, b| a.saturating_sub(b))
    }
}

/// Result of checking one redaction event against the current fingerprint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditReport {
    /// `original + added - removed`
    pub expected: FingerprintContent,
    /// Fingerprint found in the current snapshot
    pub current: FingerprintContent,
    /// Fields where `expected` and `current` differ
    pub differences: Vec<&'static str>,
}

impl AuditReport {
    /// Returns true if the histograms balance
    pub fn is_consistent(&self) -> bool {
        self.differences.is_empty()
    }
}

/// Checks `original + added - removed == current`
pub fn verify_redaction(
    original: &FingerprintContent,
    removed: &FingerprintContent,
    added: &FingerprintContent,
    current: &FingerprintContent,
) -> AuditReport {
    let expected = &(original + added) - removed;
    let differences = expected.histogram_differences(current);
    AuditReport {
        expected,
        current: current.clone(),
        differences,
    }
}
