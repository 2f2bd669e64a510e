//! Human-readable output for `evaluate` and `status`.

use std::fmt::Write as _;

use stakewatch_core::ThresholdPolicy;
use stakewatch_relevance::Assessment;
use stakewatch_store::SeenStats;

/// Multi-line report of one engine run over a local document.
pub fn render_assessment(source: &str, assessment: &Assessment, policy: &ThresholdPolicy) -> String {
    let result = &assessment.result;
    let mut out = String::new();
    let _ = writeln!(out, "{source}");
    let _ = writeln!(out, "  outcome:    {}", assessment.outcome.describe());
    let _ = writeln!(
        out,
        "  confidence: {:.2} ({})",
        result.confidence,
        policy.tier(result.confidence).as_str()
    );
    let _ = writeln!(
        out,
        "  reported:   {}",
        if policy.is_actionable(result) { "yes" } else { "no" }
    );

    if let Some(b) = &assessment.breakdown {
        let _ = writeln!(
            out,
            "  breakdown:  base {:+.2}  government {:+.2}  transaction {:+.2}  item {:+.2}  exclusion {:+.2}  position {:+.2}  (raw {:.2})",
            b.base,
            b.government,
            b.transaction,
            b.item_marker,
            b.exclusion,
            b.position,
            b.raw()
        );
    }

    if !result.evidence.is_empty() {
        let _ = writeln!(out, "  evidence:");
        for (i, e) in result.evidence.iter().enumerate() {
            let _ = writeln!(out, "    {}. {}", i + 1, e.label);
            let _ = writeln!(out, "       {}", e.snippet);
        }
    }
    out
}

pub fn render_status(db: &str, stats: &SeenStats, policy: &ThresholdPolicy) -> String {
    format!(
        "Seen store: {db}\n  processed filings:     {}\n  high confidence (≥ {}): {}\n",
        stats.processed, policy.high, stats.high_confidence
    )
}

pub fn render_missing_store(db: &str) -> String {
    format!("Seen store: {db}\n  not yet created (no scan has completed)\n")
}
