use stakewatch_core::DedupKey;

use crate::StoreError;

/// Counts reported by `stakewatch status`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeenStats {
    pub processed: usize,
    /// Records whose stored confidence is at or above the high threshold.
    pub high_confidence: usize,
}

/// Persisted set of processed filings, keyed by (CIK, accession).
///
/// Marking is insert-if-absent: the first confidence recorded for a key
/// is kept.
pub trait SeenStore {
    fn has_seen(&self, key: &DedupKey) -> Result<bool, StoreError>;

    /// Record `key` with the confidence it scored. Returns `false` if the
    /// key was already present.
    fn mark_seen(&mut self, key: &DedupKey, confidence: f64) -> Result<bool, StoreError>;

    fn stats(&self, high_threshold: f64) -> Result<SeenStats, StoreError>;

    /// Remove every record, returning how many were removed.
    fn clear(&mut self) -> Result<usize, StoreError>;
}
