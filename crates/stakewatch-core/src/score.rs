//! Relevance results shared between the engine, the store, and the notifier.

use serde::{Deserialize, Serialize};

use crate::filing::FilingRecord;

/// A government-entity mention paired with a nearby investment term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    /// `"<gov-pattern> + <investment-pattern>"`.
    pub label: String,
    /// Whitespace-normalised excerpt around the pair.
    pub snippet: String,
    /// Byte offset in the plain text where the snippet window begins.
    pub window_start: usize,
}

/// Output of one engine evaluation.
///
/// `confidence` is always within `[0.0, 1.0]` and is exactly `0.0` when
/// `evidence` is empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub evidence: Vec<Evidence>,
    pub confidence: f64,
}

impl ScoreResult {
    /// The "no evidence" result.
    pub fn empty() -> Self {
        Self {
            evidence: Vec::new(),
            confidence: 0.0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.evidence.is_empty()
    }
}

impl Default for ScoreResult {
    fn default() -> Self {
        Self::empty()
    }
}

/// Presentation tier for a confidence value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceTier {
    /// At or above the high-confidence bound.
    High,
    /// Actionable but below the high bound.
    Medium,
    /// Below the acceptance threshold; not reported.
    Low,
}

impl ConfidenceTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }

    /// Compact label used in HTML badges.
    pub fn badge(&self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Medium => "MED",
            Self::Low => "LOW",
        }
    }
}

/// Caller-level acceptance policy.
///
/// The engine returns raw scores; thresholds are applied here, by the
/// orchestration layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdPolicy {
    /// Minimum confidence for a filing to be reported.
    pub accept: f64,
    /// Minimum confidence for the "high" tier.
    pub high: f64,
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        Self {
            accept: 0.4,
            high: 0.7,
        }
    }
}

impl ThresholdPolicy {
    pub fn tier(&self, confidence: f64) -> ConfidenceTier {
        if confidence >= self.high {
            ConfidenceTier::High
        } else if confidence >= self.accept {
            ConfidenceTier::Medium
        } else {
            ConfidenceTier::Low
        }
    }

    /// A result is actionable when it carries evidence and clears `accept`.
    pub fn is_actionable(&self, result: &ScoreResult) -> bool {
        !result.is_empty() && result.confidence >= self.accept
    }
}

/// A filing that cleared the acceptance policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hit {
    pub record: FilingRecord,
    /// URL of the document that was scored.
    pub document_url: String,
    pub result: ScoreResult,
}

impl Hit {
    pub fn confidence(&self) -> f64 {
        self.result.confidence
    }
}

/// Sort hits by confidence, highest first.
pub fn rank_hits(hits: &mut [Hit]) {
    hits.sort_by(|a, b| b.confidence().total_cmp(&a.confidence()));
}
