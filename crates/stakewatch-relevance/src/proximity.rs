//! Proximity correlation between government mentions and investment terms.
//!
//! For each government match, in matcher order, the first investment match
//! (also in matcher order) whose start lies within `proximity` characters is
//! taken as its partner, and the search for that government match stops.
//! This is first-qualifying, not nearest: with several candidates in range,
//! the one reported depends on pattern-table order.
//!
//! Distances and the snippet radius are counted in characters; match offsets
//! are bytes, so windows always land on character boundaries.

use stakewatch_core::Evidence;

use crate::matcher::Match;
use crate::normalize::collapse_whitespace;

/// A correlated (government, investment) match pair with its snippet.
#[derive(Debug, Clone, PartialEq)]
pub struct EvidencePair<'g> {
    pub government: Match<'g>,
    pub investment: Match<'g>,
    /// Byte offset where the snippet window begins.
    pub window_start: usize,
    /// Whitespace-collapsed window text.
    pub snippet: String,
}

impl EvidencePair<'_> {
    /// `"<gov-pattern> + <investment-pattern>"`.
    pub fn label(&self) -> String {
        format!("{} + {}", self.government.pattern, self.investment.pattern)
    }
}

impl From<EvidencePair<'_>> for Evidence {
    fn from(pair: EvidencePair<'_>) -> Self {
        Evidence {
            label: pair.label(),
            snippet: pair.snippet,
            window_start: pair.window_start,
        }
    }
}

/// Pair each government match with its first investment match in range.
///
/// Empty on either side short-circuits to an empty result.
pub fn correlate<'g>(
    text: &str,
    government: &[Match<'g>],
    investment: &[Match<'g>],
    proximity: usize,
    radius: usize,
) -> Vec<EvidencePair<'g>> {
    if government.is_empty() || investment.is_empty() {
        return Vec::new();
    }

    let gov_chars = char_positions(text, government.iter().map(|m| m.start));
    let inv_chars = char_positions(text, investment.iter().map(|m| m.start));

    government
        .iter()
        .zip(&gov_chars)
        .filter_map(|(g, &gc)| {
            let (i, _) = investment
                .iter()
                .zip(&inv_chars)
                .find(|&(_, &ic)| gc.abs_diff(ic) <= proximity)?;
            let (window_start, window_end) = snippet_window(text, g, i, radius);
            Some(EvidencePair {
                government: *g,
                investment: *i,
                window_start,
                snippet: collapse_whitespace(&text[window_start..window_end]),
            })
        })
        .collect()
}

/// Character offset of each byte offset, in input order. Walks the text
/// once, in ascending byte order.
fn char_positions(text: &str, bytes: impl Iterator<Item = usize>) -> Vec<usize> {
    let bytes: Vec<usize> = bytes.collect();
    let mut order: Vec<usize> = (0..bytes.len()).collect();
    order.sort_unstable_by_key(|&k| bytes[k]);

    let mut out = vec![0; bytes.len()];
    let (mut at_byte, mut at_char) = (0, 0);
    for k in order {
        at_char += text[at_byte..bytes[k]].chars().count();
        at_byte = bytes[k];
        out[k] = at_char;
    }
    out
}

/// Number of characters between two byte offsets.
pub fn char_distance(text: &str, a: usize, b: usize) -> usize {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    text[lo..hi].chars().count()
}

/// Byte range covering both matches plus `radius` characters either side,
/// clamped to the text.
fn snippet_window(text: &str, g: &Match<'_>, i: &Match<'_>, radius: usize) -> (usize, usize) {
    let start = back_chars(text, g.start.min(i.start), radius);
    let end = forward_chars(text, g.end.max(i.end), radius);
    (start, end)
}

fn back_chars(text: &str, from: usize, n: usize) -> usize {
    text[..from]
        .char_indices()
        .rev()
        .take(n)
        .last()
        .map_or(from, |(idx, _)| idx)
}

fn forward_chars(text: &str, from: usize, n: usize) -> usize {
    text[from..]
        .char_indices()
        .nth(n)
        .map_or(text.len(), |(idx, _)| from + idx)
}
