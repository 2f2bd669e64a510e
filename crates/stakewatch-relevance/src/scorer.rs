//! Confidence scoring.
//!
//! | Signal | Weight |
//! |---|---|
//! | any surviving evidence | +0.30 base |
//! | each distinct government pattern present | +0.10, capped at +0.30 |
//! | each transaction-indicator pattern present | +0.40, uncapped |
//! | item 1.01 / 3.02 marker | +0.20 |
//! | each exclusion pattern present | −0.15 |
//! | mean snippet position in first half | +0.10 |
//!
//! Presence is tested on the full plain text. The sum is clamped to
//! `[0.0, 1.0]` only at the end; no evidence short-circuits to `0.0`.

use regex::Regex;

use crate::patterns::PatternGroup;
use crate::proximity::EvidencePair;

const BASE: f64 = 0.3;
const GOVERNMENT_EACH: f64 = 0.1;
const GOVERNMENT_CAP: f64 = 0.3;
const TRANSACTION_EACH: f64 = 0.4;
const ITEM_MARKER: f64 = 0.2;
const EXCLUSION_EACH: f64 = 0.15;
const EARLY_POSITION: f64 = 0.1;

/// Per-signal contributions, kept for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoreBreakdown {
    pub base: f64,
    pub government: f64,
    pub transaction: f64,
    pub item_marker: f64,
    /// Negative or zero.
    pub exclusion: f64,
    pub position: f64,
}

impl ScoreBreakdown {
    /// Unclamped sum.
    pub fn raw(&self) -> f64 {
        self.base + self.government + self.transaction + self.item_marker + self.exclusion
            + self.position
    }

    /// Final confidence in `[0.0, 1.0]`.
    pub fn confidence(&self) -> f64 {
        self.raw().clamp(0.0, 1.0)
    }
}

/// The pattern groups the scorer reads, borrowed from the engine.
pub struct Scorer<'a> {
    pub government: &'a PatternGroup,
    pub transaction: &'a PatternGroup,
    pub exclusion: &'a PatternGroup,
    pub item_marker: &'a Regex,
}

impl Scorer<'_> {
    pub fn score(&self, text: &str, evidence: &[EvidencePair<'_>]) -> ScoreBreakdown {
        if evidence.is_empty() {
            return ScoreBreakdown::default();
        }

        let government = self.government.count_present(text) as f64 * GOVERNMENT_EACH;
        ScoreBreakdown {
            base: BASE,
            government: government.min(GOVERNMENT_CAP),
            transaction: self.transaction.count_present(text) as f64 * TRANSACTION_EACH,
            item_marker: if self.item_marker.is_match(text) {
                ITEM_MARKER
            } else {
                0.0
            },
            exclusion: -(self.exclusion.count_present(text) as f64 * EXCLUSION_EACH),
            position: if in_first_half(text, evidence) {
                EARLY_POSITION
            } else {
                0.0
            },
        }
    }
}

/// Whether the mean snippet offset falls before the middle of the text.
///
/// Offsets and length are in characters. Each snippet is located by
/// searching for its text; one that does not occur verbatim (its whitespace
/// was collapsed) counts as offset `-1`.
fn in_first_half(text: &str, evidence: &[EvidencePair<'_>]) -> bool {
    let total: i64 = evidence.iter().map(|e| snippet_offset(text, &e.snippet)).sum();
    let mean = total as f64 / evidence.len() as f64;
    mean < text.chars().count() as f64 * 0.5
}

fn snippet_offset(text: &str, snippet: &str) -> i64 {
    text.find(snippet)
        .map_or(-1, |byte| text[..byte].chars().count() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::Match;
    use crate::patterns::{
        Category, FALSE_POSITIVE_EXCLUSIONS, GOVERNMENT_ENTITIES, ITEM_MARKER as ITEM_PATTERN,
        TRANSACTION_INDICATORS, compile_pattern,
    };

    struct Fixture {
        government: PatternGroup,
        transaction: PatternGroup,
        exclusion: PatternGroup,
        item_marker: Regex,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                government: PatternGroup::compile(Category::Government, GOVERNMENT_ENTITIES)
                    .unwrap(),
                transaction: PatternGroup::compile(Category::Transaction, TRANSACTION_INDICATORS)
                    .unwrap(),
                exclusion: PatternGroup::compile(Category::Exclusion, FALSE_POSITIVE_EXCLUSIONS)
                    .unwrap(),
                item_marker: compile_pattern(ITEM_PATTERN).unwrap(),
            }
        }

        fn scorer(&self) -> Scorer<'_> {
            Scorer {
                government: &self.government,
                transaction: &self.transaction,
                exclusion: &self.exclusion,
                item_marker: &self.item_marker,
            }
        }
    }

    fn pair_at(text: &str, snippet: &str) -> EvidencePair<'static> {
        let start = text.find(snippet).unwrap_or(0);
        let m = Match {
            category: Category::Government,
            pattern: "p",
            start,
            end: start + 1,
        };
        EvidencePair {
            government: m,
            investment: m,
            window_start: start,
            snippet: snippet.to_string(),
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn no_evidence_scores_zero() {
        let f = Fixture::new();
        let b = f.scorer().score("U.S. Government item 1.01", &[]);
        assert_eq!(b, ScoreBreakdown::default());
        assert_eq!(b.confidence(), 0.0);
    }

    #[test]
    fn base_plus_one_government_plus_position() {
        let f = Fixture::new();
        let text = format!("The DOD holds an equity stake.{}", " padding".repeat(20));
        let b = f.scorer().score(&text, &[pair_at(&text, "The DOD holds an equity stake.")]);
        assert!(approx(b.base, 0.3));
        assert!(approx(b.government, 0.1));
        assert_eq!(b.transaction, 0.0);
        assert_eq!(b.item_marker, 0.0);
        assert_eq!(b.exclusion, 0.0);
        assert!(approx(b.position, 0.1));
        assert!(approx(b.confidence(), 0.5));
    }

    #[test]
    fn government_bonus_capped() {
        let f = Fixture::new();
        let text = "DOD DOC CFIUS CHIPS Act U.S. Treasury";
        let b = f.scorer().score(text, &[pair_at(text, "DOD")]);
        assert!(approx(b.government, 0.3));
    }

    #[test]
    fn transaction_bonus_compounds_and_clamps() {
        let f = Fixture::new();
        let text = "The company received $100 and signed the agreement for the first tranche.";
        let b = f.scorer().score(text, &[pair_at(text, "The company")]);
        assert!(approx(b.transaction, 1.2));
        assert!(b.raw() > 1.0);
        assert_eq!(b.confidence(), 1.0);
    }

    #[test]
    fn item_marker_bonus() {
        let f = Fixture::new();
        let text = "ITEM   3.02 Unregistered Sales of Equity Securities";
        let b = f.scorer().score(text, &[pair_at(text, "Unregistered")]);
        assert!(approx(b.item_marker, 0.2));
        let text = "Item 2.02 Results of Operations";
        let b = f.scorer().score(text, &[pair_at(text, "Results")]);
        assert_eq!(b.item_marker, 0.0);
    }

    #[test]
    fn exclusion_penalty_per_distinct_pattern() {
        let f = Fixture::new();
        let text = "x example example illustration hypothetical";
        let b = f.scorer().score(text, &[pair_at(text, "x")]);
        assert!(approx(b.exclusion, -0.45));
    }

    #[test]
    fn penalties_clamp_at_zero() {
        let f = Fixture::new();
        let text = format!(
            "{}evidence here, an example, an illustration, hypothetical, debt securities, \
             a credit facility, the bond market, risk factors",
            " ".repeat(10)
        );
        let b = f.scorer().score(&text, &[pair_at(&text, "evidence here")]);
        assert!(b.raw() < 0.0);
        assert_eq!(b.confidence(), 0.0);
    }

    #[test]
    fn late_evidence_gets_no_position_bonus() {
        let f = Fixture::new();
        let text = format!("{}late evidence", "word ".repeat(50));
        let b = f.scorer().score(&text, &[pair_at(&text, "late evidence")]);
        assert_eq!(b.position, 0.0);
    }

    #[test]
    fn position_uses_mean_of_all_snippets() {
        let f = Fixture::new();
        let text = format!("early{}middle{}late", ".".repeat(40), ".".repeat(40));
        // Offsets 45 and 91: mean 68 is past the midpoint 47.5.
        let middle_late = [pair_at(&text, "middle"), pair_at(&text, "late")];
        assert_eq!(f.scorer().score(&text, &middle_late).position, 0.0);
        let early_middle = [pair_at(&text, "early"), pair_at(&text, "middle")];
        assert!(approx(f.scorer().score(&text, &early_middle).position, 0.1));
    }

    #[test]
    fn unlocated_snippet_counts_as_document_start() {
        let f = Fixture::new();
        let text = format!("{}late   evidence", "word ".repeat(50));
        let mut pair = pair_at(&text, "late");
        pair.snippet = "late evidence".into();
        assert!(text.find("late evidence").is_none());
        assert_eq!(snippet_offset(&text, &pair.snippet), -1);
        assert!(approx(f.scorer().score(&text, &[pair]).position, 0.1));
    }

    #[test]
    fn position_measured_in_characters() {
        let f = Fixture::new();
        // 30 two-byte characters: "mid" is at char 30 of 73 but byte 60 of 103.
        let text = format!("{}mid{}", "é".repeat(30), "x".repeat(40));
        assert_eq!(snippet_offset(&text, "mid"), 30);
        assert!(approx(f.scorer().score(&text, &[pair_at(&text, "mid")]).position, 0.1));
    }
}
