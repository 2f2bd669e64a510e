//! In-process store. Nothing survives the process.

use std::collections::HashMap;

use stakewatch_core::DedupKey;

use crate::{SeenStats, SeenStore, StoreError};

#[derive(Debug, Default)]
pub struct MemoryStore {
    seen: HashMap<DedupKey, f64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Stored confidence for `key`, if any.
    pub fn confidence(&self, key: &DedupKey) -> Option<f64> {
        self.seen.get(key).copied()
    }
}

impl SeenStore for MemoryStore {
    fn has_seen(&self, key: &DedupKey) -> Result<bool, StoreError> {
        Ok(self.seen.contains_key(key))
    }

    fn mark_seen(&mut self, key: &DedupKey, confidence: f64) -> Result<bool, StoreError> {
        if self.seen.contains_key(key) {
            return Ok(false);
        }
        self.seen.insert(key.clone(), confidence);
        Ok(true)
    }

    fn stats(&self, high_threshold: f64) -> Result<SeenStats, StoreError> {
        Ok(SeenStats {
            processed: self.seen.len(),
            high_confidence: self.seen.values().filter(|c| **c >= high_threshold).count(),
        })
    }

    fn clear(&mut self) -> Result<usize, StoreError> {
        let n = self.seen.len();
        self.seen.clear();
        Ok(n)
    }
}
