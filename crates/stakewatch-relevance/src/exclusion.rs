//! False-positive veto.
//!
//! Two explicit phases:
//!
//! 1. Each exclusion pattern is tried against the full text. If none match,
//!    the evidence passes untouched.
//! 2. Only the patterns that matched the full text are re-tried against each
//!    snippet. One hit in any snippet rejects the whole filing.
//!
//! The phases are not equivalent to a single snippet scan: snippets are
//! whitespace-collapsed, so a pattern like `risk.*factors?` can match a
//! snippet while failing on the full text where a line break separates the
//! words. Such a snippet does not veto.

use crate::patterns::PatternGroup;
use crate::proximity::EvidencePair;

/// Outcome of the exclusion check for one filing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// No exclusion pattern occurs anywhere in the text.
    Clean,
    /// Exclusions occur in the text, but in no snippet.
    Passed { present: usize },
    /// `pattern` matched inside snippet number `evidence`.
    Rejected { pattern: String, evidence: usize },
}

impl Verdict {
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

/// Run both phases against `text` and the correlated evidence.
pub fn check(text: &str, evidence: &[EvidencePair<'_>], exclusions: &PatternGroup) -> Verdict {
    let present = exclusions.present_in(text);
    if present.is_empty() {
        return Verdict::Clean;
    }

    for pattern in &present {
        if let Some(idx) = evidence.iter().position(|e| pattern.is_match(&e.snippet)) {
            return Verdict::Rejected {
                pattern: pattern.source().to_string(),
                evidence: idx,
            };
        }
    }

    Verdict::Passed {
        present: present.len(),
    }
}
