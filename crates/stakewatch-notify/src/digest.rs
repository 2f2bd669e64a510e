//! The alert digest: one subject, a plain-text body, and an HTML body
//! covering every hit of a scan.

use std::fmt::Write as _;

use chrono::NaiveDate;
use stakewatch_core::{ConfidenceTier, Hit, ThresholdPolicy};

use crate::text::{escape_html, shorten};

/// Snippets shown per hit.
const SNIPPETS_PER_HIT: usize = 2;
const TEXT_SNIPPET_WIDTH: usize = 280;
const HTML_SNIPPET_WIDTH: usize = 300;
const PLACEHOLDER: &str = "…";

const HIGH_COLOR: &str = "#28a745";
const MEDIUM_COLOR: &str = "#ffc107";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest {
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

impl Digest {
    /// Compose a digest for `hits`, which should already be ranked.
    pub fn compose(hits: &[Hit], policy: &ThresholdPolicy, date: NaiveDate) -> Self {
        let high = hits
            .iter()
            .filter(|h| policy.tier(h.confidence()) == ConfidenceTier::High)
            .count();
        let subject = format!(
            "[EDGAR] {high} high-conf + {} med-conf govt equity alerts · {}",
            hits.len() - high,
            date.format("%Y-%m-%d")
        );
        Self {
            subject,
            text_body: text_body(hits, policy),
            html_body: html_body(hits, policy),
        }
    }
}

fn text_body(hits: &[Hit], policy: &ThresholdPolicy) -> String {
    let mut lines = vec![format!(
        "Found {} potential hits (sorted by confidence):\n",
        hits.len()
    )];
    for hit in hits {
        let r = &hit.record;
        let conf = hit.confidence();
        lines.push(format!(
            "• [{} {conf:.2}] {} ({}) · {} · {}",
            policy.tier(conf).as_str(),
            r.company,
            r.cik,
            r.form,
            r.date
        ));
        lines.push(format!("  {}", hit.document_url));
        for e in hit.result.evidence.iter().take(SNIPPETS_PER_HIT) {
            lines.push(format!(
                "  → {}",
                shorten(&e.snippet, TEXT_SNIPPET_WIDTH, PLACEHOLDER)
            ));
        }
        lines.push(String::new());
    }
    lines.join("\n")
}

fn html_body(hits: &[Hit], policy: &ThresholdPolicy) -> String {
    let mut rows = String::new();
    for hit in hits {
        let r = &hit.record;
        let conf = hit.confidence();
        let tier = policy.tier(conf);
        let color = if tier == ConfidenceTier::High {
            HIGH_COLOR
        } else {
            MEDIUM_COLOR
        };
        let url = escape_html(&hit.document_url);

        let snippets: String = hit
            .result
            .evidence
            .iter()
            .take(SNIPPETS_PER_HIT)
            .map(|e| {
                format!(
                    "<li style=\"margin:4px 0;\"><code style=\"background:#f8f9fa;padding:2px 4px;\">{}</code></li>",
                    escape_html(&shorten(&e.snippet, HTML_SNIPPET_WIDTH, PLACEHOLDER))
                )
            })
            .collect();

        let _ = write!(
            rows,
            r#"
      <tr>
        <td style="padding:12px;border-bottom:1px solid #dee2e6;vertical-align:top;">
          <div style="margin-bottom:8px;">
            <span style="background:{color};color:white;padding:2px 6px;border-radius:3px;font-size:11px;font-weight:bold;margin-right:8px;">{badge} {conf:.2}</span>
            <strong>{company} ({cik})</strong>
          </div>
          <div style="color:#6c757d;margin-bottom:8px;">{form} · {date}</div>
          <div style="margin-bottom:8px;"><a href="{url}" style="color:#007bff;">{url}</a></div>
          <ul style="margin:0;padding-left:20px;color:#495057;">{snippets}</ul>
        </td>
      </tr>"#,
            badge = tier.badge(),
            company = escape_html(&r.company),
            cik = escape_html(&r.cik),
            form = escape_html(&r.form),
            date = escape_html(&r.date),
        );
    }

    format!(
        r#"<html><body style="font-family:system-ui,-apple-system,sans-serif;">
  <p>Found <b>{count}</b> potential U.S. government equity disclosures (ranked by confidence):</p>
  <table cellpadding="0" cellspacing="0" width="100%" style="border-collapse:collapse;border:1px solid #dee2e6;">{rows}
  </table>
  <p style="color:#6c757d;font-size:12px;margin-top:16px;">
    HIGH ≥ {high}, MEDIUM ≥ {accept}. Verify details in the filing itself.
  </p>
</body></html>
"#,
        count = hits.len(),
        high = policy.high,
        accept = policy.accept,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use stakewatch_core::{Evidence, FilingRecord, ScoreResult};

    fn hit(company: &str, confidence: f64, snippets: &[&str]) -> Hit {
        Hit {
            record: FilingRecord {
                company: company.into(),
                cik: "1045810".into(),
                form: "8-K".into(),
                date: "20250822".into(),
                path: "edgar/data/1045810/0001045810-25-000123.txt".into(),
                accession: "0001045810-25-000123".into(),
            },
            document_url: "https://www.sec.gov/Archives/edgar/data/1045810/doc.htm".into(),
            result: ScoreResult {
                evidence: snippets
                    .iter()
                    .map(|s| Evidence {
                        label: "g + i".into(),
                        snippet: s.to_string(),
                        window_start: 0,
                    })
                    .collect(),
                confidence,
            },
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 23).unwrap()
    }

    #[test]
    fn subject_counts_tiers() {
        let hits = [
            hit("A", 0.9, &["x"]),
            hit("B", 0.7, &["x"]),
            hit("C", 0.45, &["x"]),
        ];
        let d = Digest::compose(&hits, &ThresholdPolicy::default(), date());
        assert_eq!(
            d.subject,
            "[EDGAR] 2 high-conf + 1 med-conf govt equity alerts · 2025-08-23"
        );
    }

    #[test]
    fn text_body_layout() {
        let hits = [hit("Intel Corp", 0.85, &["one", "two", "three"])];
        let d = Digest::compose(&hits, &ThresholdPolicy::default(), date());
        let expected = "Found 1 potential hits (sorted by confidence):\n\n\
            • [HIGH 0.85] Intel Corp (1045810) · 8-K · 20250822\n  \
            https://www.sec.gov/Archives/edgar/data/1045810/doc.htm\n  \
            → one\n  \
            → two\n";
        assert_eq!(d.text_body, expected);
    }

    #[test]
    fn medium_tier_labels() {
        let hits = [hit("Acme", 0.5, &["s"])];
        let d = Digest::compose(&hits, &ThresholdPolicy::default(), date());
        assert!(d.text_body.contains("• [MEDIUM 0.50] Acme"));
        assert!(d.html_body.contains("MED 0.50"));
        assert!(d.html_body.contains(MEDIUM_COLOR));
        assert!(!d.html_body.contains(HIGH_COLOR));
    }

    #[test]
    fn long_snippets_shortened() {
        let long = "word ".repeat(100);
        let d = Digest::compose(&[hit("A", 0.9, &[long.as_str()])], &ThresholdPolicy::default(), date());
        let line = d
            .text_body
            .lines()
            .find(|l| l.starts_with("  → "))
            .unwrap();
        let snippet = line.trim_start_matches("  → ");
        assert!(snippet.ends_with('…'));
        assert!(snippet.chars().count() <= TEXT_SNIPPET_WIDTH);
    }

    #[test]
    fn html_escapes_untrusted_text() {
        let hits = [hit("AT&T <Inc>", 0.9, &["<script>alert(1)</script>"])];
        let d = Digest::compose(&hits, &ThresholdPolicy::default(), date());
        assert!(d.html_body.contains("AT&amp;T &lt;Inc&gt;"));
        assert!(d.html_body.contains("&lt;script&gt;"));
        assert!(!d.html_body.contains("<script>"));
        assert!(d.html_body.contains("HIGH ≥ 0.7, MEDIUM ≥ 0.4"));
        assert!(d.html_body.contains("background:#28a745"));
    }
}
