//! Term matching: every non-overlapping match of every pattern in a group.

use crate::patterns::{Category, PatternGroup};

/// One occurrence of a pattern in the plain text.
///
/// Offsets are byte offsets into the text that was scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match<'g> {
    pub category: Category,
    /// Source of the pattern that produced this match.
    pub pattern: &'g str,
    pub start: usize,
    pub end: usize,
}

/// Scan `text` with every member of `group`.
///
/// Matches are grouped by pattern in group order, then by position. Callers
/// that need document order must sort; the proximity tie-break relies on
/// this order as-is.
pub fn find_matches<'g>(text: &str, group: &'g PatternGroup) -> Vec<Match<'g>> {
    let category = group.category();
    group
        .iter()
        .flat_map(|p| {
            p.regex().find_iter(text).map(move |m| Match {
                category,
                pattern: p.source(),
                start: m.start(),
                end: m.end(),
            })
        })
        .collect()
}
