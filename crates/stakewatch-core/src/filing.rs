//! EDGAR filing identity and daily master-index parsing.
//!
//! The SEC publishes one `master.YYMMDD.idx` per business day under
//! `edgar/daily-index/{year}/QTR{n}/`. After a free-text header, each line is
//! pipe-delimited:
//!
//! ```text
//! CIK|Company Name|Form Type|Date Filed|Filename
//! 320193|Apple Inc.|8-K|20250822|edgar/data/320193/0000320193-25-000071.txt
//! ```
//!
//! The accession number is the last path segment without its `.txt`
//! extension. `(cik, accession)` identifies a filing for deduplication.

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate, TimeDelta, Weekday};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Root of the EDGAR archive tree; index paths are relative to it.
pub const ARCHIVES_BASE: &str = "https://www.sec.gov/Archives/";

/// One row of a daily master index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilingRecord {
    pub company: String,
    pub cik: String,
    pub form: String,
    /// Filing date as printed in the index (`YYYYMMDD`).
    pub date: String,
    /// Archive-relative path of the full submission.
    pub path: String,
    /// Empty when the path has no accession segment.
    pub accession: String,
}

impl FilingRecord {
    pub fn dedup_key(&self) -> DedupKey {
        DedupKey {
            cik: self.cik.clone(),
            accession: self.accession.clone(),
        }
    }
}

/// `(filer id, accession id)`: uniquely identifies a processed filing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DedupKey {
    pub cik: String,
    pub accession: String,
}

/// Parse a master index, keeping rows whose form type equals `form`.
///
/// Header lines, separator lines, and rows with fewer than five fields are
/// skipped. Rows whose path has no accession segment are kept with an empty
/// `accession` so callers can count them.
pub fn parse_master_index(text: &str, form: &str) -> Vec<FilingRecord> {
    text.lines()
        .filter_map(|line| {
            let parts: Vec<&str> = line.split('|').collect();
            if parts.len() < 5 || parts[2].trim() != form {
                return None;
            }
            let path = parts[4].trim();
            Some(FilingRecord {
                company: parts[1].trim().to_string(),
                cik: parts[0].trim().to_string(),
                form: parts[2].trim().to_string(),
                date: parts[3].trim().to_string(),
                path: path.to_string(),
                accession: accession_from_path(path),
            })
        })
        .collect()
}

/// `edgar/data/320193/0000320193-25-000071.txt` → `0000320193-25-000071`.
fn accession_from_path(path: &str) -> String {
    path.split('/')
        .nth(3)
        .map(|seg| seg.strip_suffix(".txt").unwrap_or(seg).to_string())
        .unwrap_or_default()
}

/// Candidate daily-index URLs, most recent first.
///
/// Walks back from `today - 1` for up to `max_days_back` days, skipping
/// weekends (EDGAR publishes no index for them).
pub fn daily_index_candidates(today: NaiveDate, max_days_back: u32) -> Vec<String> {
    (1..max_days_back)
        .map(|n| today - TimeDelta::days(i64::from(n)))
        .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
        .map(daily_index_url)
        .collect()
}

/// `https://www.sec.gov/Archives/edgar/daily-index/2025/QTR3/master.250822.idx`
pub fn daily_index_url(date: NaiveDate) -> String {
    let quarter = (date.month() - 1) / 3 + 1;
    format!(
        "{ARCHIVES_BASE}edgar/daily-index/{}/QTR{}/master.{}.idx",
        date.year(),
        quarter,
        date.format("%y%m%d")
    )
}

/// Absolute URL of a filing's index document.
pub fn filing_index_url(path: &str) -> String {
    format!("{ARCHIVES_BASE}{}", path.trim_start_matches('/'))
}

static ANCHOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<a\b[^>]*?\bhref\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>]+))[^>]*>(.*?)</a\s*>"#)
        .unwrap()
});

static PAGE_TEXT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\.html?$").unwrap());

/// The `href` of the first anchor whose visible text names an `.htm`/`.html`
/// document, i.e. the primary document listed on a filing index page.
///
/// Returns the raw attribute value; resolve it against the index URL.
pub fn primary_document_href(index_html: &str) -> Option<String> {
    ANCHOR_RE.captures_iter(index_html).find_map(|caps| {
        let label = caps.get(4)?.as_str().trim();
        if !PAGE_TEXT_RE.is_match(label) {
            return None;
        }
        caps.get(1)
            .or_else(|| caps.get(2))
            .or_else(|| caps.get(3))
            .map(|m| m.as_str().to_string())
            .filter(|href| !href.is_empty())
    })
}
