//! Scan pipeline: daily index → unseen filings → relevance engine → ranked hits.

use std::collections::HashSet;
use std::time::Duration;

use anyhow::Context;
use chrono::NaiveDate;
use stakewatch_core::{
    DedupKey, FilingRecord, Hit, ScoreResult, filing_index_url, parse_master_index, rank_hits,
};
use stakewatch_edgar::{EdgarClient, EdgarError, resolve_primary_document};
use stakewatch_relevance::RelevanceEngine;
use stakewatch_store::{SeenStore, StoreError};
use tracing::{debug, info, warn};

/// Where filings come from. [`EdgarClient`] in production.
pub trait FilingSource {
    async fn latest_master_index(&self, today: NaiveDate) -> Result<String, EdgarError>;

    async fn fetch_text(&self, url: &str) -> Result<String, EdgarError>;

    async fn primary_document_url(&self, record: &FilingRecord) -> Result<String, EdgarError> {
        let index_url = filing_index_url(&record.path);
        let index_html = self.fetch_text(&index_url).await?;
        resolve_primary_document(&index_url, &index_html)
    }
}

impl FilingSource for EdgarClient {
    async fn latest_master_index(&self, today: NaiveDate) -> Result<String, EdgarError> {
        EdgarClient::latest_master_index(self, today).await
    }

    async fn fetch_text(&self, url: &str) -> Result<String, EdgarError> {
        EdgarClient::fetch_text(self, url).await
    }
}

pub struct ScanOptions {
    /// Form type to keep, matched exactly.
    pub form: String,
    /// Cap on filings fetched this run.
    pub limit: Option<usize>,
    /// Pause between filings.
    pub delay: Duration,
    pub today: NaiveDate,
}

#[derive(Debug, Default)]
pub struct ScanReport {
    pub index_url: String,
    /// Ranked, highest confidence first.
    pub hits: Vec<Hit>,
    /// Scanned filings that did not clear the policy, with their raw confidence.
    pub misses: Vec<(DedupKey, f64)>,
    pub already_seen: usize,
    pub no_accession: usize,
    pub failed: usize,
}

impl ScanReport {
    pub fn scanned(&self) -> usize {
        self.hits.len() + self.misses.len()
    }
}

/// Run one scan. Only failure to locate or fetch the daily index is an error;
/// a filing that cannot be fetched is logged and skipped.
pub async fn run_scan<S: FilingSource, St: SeenStore>(
    source: &S,
    engine: &RelevanceEngine,
    store: &St,
    opts: &ScanOptions,
) -> anyhow::Result<ScanReport> {
    let index_url = source.latest_master_index(opts.today).await?;
    let index = source
        .fetch_text(&index_url)
        .await
        .with_context(|| format!("fetching master index {index_url}"))?;

    let records = parse_master_index(&index, &opts.form);
    info!(count = records.len(), form = %opts.form, "parsed master index");

    let policy = engine.policy();
    let mut report = ScanReport {
        index_url,
        ..Default::default()
    };
    let mut queued = HashSet::new();
    let mut attempted = 0usize;

    for record in records {
        if opts.limit.is_some_and(|n| attempted >= n) {
            info!(limit = attempted, "filing limit reached");
            break;
        }
        if record.accession.is_empty() {
            report.no_accession += 1;
            continue;
        }
        let key = record.dedup_key();
        if !queued.insert(key.clone()) || store.has_seen(&key)? {
            report.already_seen += 1;
            continue;
        }

        if attempted > 0 && !opts.delay.is_zero() {
            tokio::time::sleep(opts.delay).await;
        }
        attempted += 1;

        match scan_filing(source, engine, &record).await {
            Ok((document_url, result)) => {
                debug!(
                    cik = %record.cik,
                    accession = %record.accession,
                    evidence = result.evidence.len(),
                    confidence = result.confidence,
                    "evaluated"
                );
                if policy.is_actionable(&result) {
                    info!(
                        cik = %record.cik,
                        company = %record.company,
                        confidence = result.confidence,
                        "hit"
                    );
                    report.hits.push(Hit {
                        record,
                        document_url,
                        result,
                    });
                } else {
                    report.misses.push((key, result.confidence));
                }
            }
            Err(e) => {
                warn!(
                    cik = %record.cik,
                    accession = %record.accession,
                    error = %e,
                    "skipping filing"
                );
                report.failed += 1;
            }
        }
    }

    rank_hits(&mut report.hits);
    Ok(report)
}

async fn scan_filing<S: FilingSource>(
    source: &S,
    engine: &RelevanceEngine,
    record: &FilingRecord,
) -> Result<(String, ScoreResult), EdgarError> {
    let url = source.primary_document_url(record).await?;
    let document = source.fetch_text(&url).await?;
    Ok((url, engine.evaluate(&document)))
}

/// Record every scanned filing as seen. Returns how many were new.
pub fn commit<St: SeenStore>(store: &mut St, report: &ScanReport) -> Result<usize, StoreError> {
    let mut marked = 0;
    for hit in &report.hits {
        marked += usize::from(store.mark_seen(&hit.record.dedup_key(), hit.confidence())?);
    }
    for (key, confidence) in &report.misses {
        marked += usize::from(store.mark_seen(key, *confidence)?);
    }
    Ok(marked)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use stakewatch_relevance::RelevanceConfig;
    use stakewatch_store::MemoryStore;

    const INDEX_URL: &str =
        "https://www.sec.gov/Archives/edgar/daily-index/2025/QTR3/master.250822.idx";

    const MASTER: &str = "\
Description:           Daily Index of EDGAR Dissemination Feed by Company Name
CIK|Company Name|Form Type|Date Filed|File Name
--------------------------------------------------------------------------------
111|Genuine Corp|8-K|20250822|edgar/data/111/0000111-25-000001.txt
222|Boilerplate Inc|8-K|20250822|edgar/data/222/0000222-25-000002.txt
333|Already Seen LLC|8-K|20250822|edgar/data/333/0000333-25-000003.txt
444|Broken Co|8-K|20250822|edgar/data/444/0000444-25-000004.txt
555|Quarterly Co|10-Q|20250822|edgar/data/555/0000555-25-000005.txt
666|No Accession Co|8-K|20250822|edgar/data/666
111|Genuine Corp|8-K|20250822|edgar/data/111/0000111-25-000001.txt
";

    struct FakeEdgar {
        index: Option<&'static str>,
        pages: HashMap<String, String>,
    }

    impl FakeEdgar {
        fn new() -> Self {
            let mut pages = HashMap::new();
            pages.insert(INDEX_URL.to_string(), MASTER.to_string());
            let mut filing = |cik: &str, n: u32, body: &str| {
                let base = format!("https://www.sec.gov/Archives/edgar/data/{cik}/");
                pages.insert(
                    format!("{base}0000{cik}-25-00000{n}.txt"),
                    format!(r#"<table><tr><td><a href="doc{n}.htm">doc{n}.htm</a></td></tr></table>"#),
                );
                pages.insert(format!("{base}doc{n}.htm"), body.to_string());
            };
            filing(
                "111",
                1,
                "<p>Item 1.01</p><p>The U.S. Government entered into an investment agreement \
                 with Genuine Corp for $500 million investment.</p>",
            );
            filing(
                "222",
                2,
                "<p>Risk factors: we could be impacted by potential future U.S. Government \
                 investment agreement changes.</p>",
            );
            filing("333", 3, "<p>The DOD took an equity stake.</p>");
            Self {
                index: Some(INDEX_URL),
                pages,
            }
        }
    }

    impl FilingSource for FakeEdgar {
        async fn latest_master_index(&self, _today: NaiveDate) -> Result<String, EdgarError> {
            self.index
                .map(str::to_string)
                .ok_or(EdgarError::NoIndex { days: 10 })
        }

        async fn fetch_text(&self, url: &str) -> Result<String, EdgarError> {
            self.pages.get(url).cloned().ok_or_else(|| EdgarError::Server {
                status: 404,
                url: url.to_string(),
            })
        }
    }

    fn engine() -> RelevanceEngine {
        RelevanceEngine::new(RelevanceConfig::default()).unwrap()
    }

    fn opts() -> ScanOptions {
        ScanOptions {
            form: "8-K".into(),
            limit: None,
            delay: Duration::ZERO,
            today: NaiveDate::from_ymd_opt(2025, 8, 23).unwrap(),
        }
    }

    fn seen_store() -> MemoryStore {
        let mut store = MemoryStore::new();
        store
            .mark_seen(
                &DedupKey {
                    cik: "333".into(),
                    accession: "0000333-25-000003".into(),
                },
                0.9,
            )
            .unwrap();
        store
    }

    #[tokio::test]
    async fn scan_classifies_every_record() {
        let store = seen_store();
        let report = run_scan(&FakeEdgar::new(), &engine(), &store, &opts())
            .await
            .unwrap();

        assert_eq!(report.index_url, INDEX_URL);
        assert_eq!(report.hits.len(), 1);
        let hit = &report.hits[0];
        assert_eq!(hit.record.company, "Genuine Corp");
        assert_eq!(
            hit.document_url,
            "https://www.sec.gov/Archives/edgar/data/111/doc1.htm"
        );
        assert_eq!(hit.confidence(), 1.0);

        assert_eq!(report.misses.len(), 1);
        assert_eq!(report.misses[0].0.cik, "222");
        assert_eq!(report.misses[0].1, 0.0);

        // 333 is in the store; the repeated 111 row is dropped in-run.
        assert_eq!(report.already_seen, 2);
        assert_eq!(report.no_accession, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.scanned(), 2);
    }

    #[tokio::test]
    async fn commit_marks_hits_and_misses_only() {
        let mut store = seen_store();
        let report = run_scan(&FakeEdgar::new(), &engine(), &store, &opts())
            .await
            .unwrap();
        assert_eq!(commit(&mut store, &report).unwrap(), 2);

        assert_eq!(
            store.confidence(&DedupKey {
                cik: "111".into(),
                accession: "0000111-25-000001".into()
            }),
            Some(1.0)
        );
        let broken = DedupKey {
            cik: "444".into(),
            accession: "0000444-25-000004".into(),
        };
        assert!(!store.has_seen(&broken).unwrap());

        // Second run finds nothing new to report.
        let again = run_scan(&FakeEdgar::new(), &engine(), &store, &opts())
            .await
            .unwrap();
        assert!(again.hits.is_empty());
        assert_eq!(again.failed, 1);
    }

    #[tokio::test]
    async fn limit_caps_fetched_filings() {
        let store = MemoryStore::new();
        let report = run_scan(
            &FakeEdgar::new(),
            &engine(),
            &store,
            &ScanOptions {
                limit: Some(1),
                ..opts()
            },
        )
        .await
        .unwrap();
        assert_eq!(report.scanned() + report.failed, 1);
        assert_eq!(report.hits.len(), 1);
    }

    #[tokio::test]
    async fn form_filter_is_exact() {
        let store = MemoryStore::new();
        let report = run_scan(
            &FakeEdgar::new(),
            &engine(),
            &store,
            &ScanOptions {
                form: "10-Q".into(),
                ..opts()
            },
        )
        .await
        .unwrap();
        // The 10-Q has no pages in the fake.
        assert_eq!(report.failed, 1);
        assert_eq!(report.scanned(), 0);
    }

    #[tokio::test]
    async fn missing_index_is_edgar_error() {
        let source = FakeEdgar {
            index: None,
            ..FakeEdgar::new()
        };
        let err = run_scan(&source, &engine(), &MemoryStore::new(), &opts())
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EdgarError>(),
            Some(EdgarError::NoIndex { .. })
        ));
    }
}
