//! HTTP client for the SEC EDGAR archive.
//!
//! EDGAR rejects requests without a descriptive `User-Agent` (name and
//! contact email), so the client is always built with one.

use std::time::Duration;

use chrono::NaiveDate;
use reqwest::{StatusCode, Url};
use stakewatch_core::{daily_index_candidates, primary_document_href};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Days walked back when probing for the latest daily index.
pub const MAX_DAYS_BACK: u32 = 10;

const PROBE_TIMEOUT: Duration = Duration::from_secs(10);
const FETCH_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Error, Debug)]
pub enum EdgarError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status} for {url}")]
    Server { status: u16, url: String },
    #[error("no accessible master index found in the past {days} days")]
    NoIndex { days: u32 },
    #[error("invalid URL {url}: {reason}")]
    Url { url: String, reason: String },
}

/// HTTP client for EDGAR's public archive.
pub struct EdgarClient {
    client: reqwest::Client,
}

impl EdgarClient {
    /// Build a client that sends `user_agent` on every request.
    pub fn new(user_agent: &str) -> Result<Self, EdgarError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent.trim())
            .build()?;
        Ok(Self { client })
    }

    /// URL of the most recent daily master index that exists.
    ///
    /// Probes business days before `today` with `HEAD`; a probe that errors is
    /// treated like a missing file.
    pub async fn latest_master_index(&self, today: NaiveDate) -> Result<String, EdgarError> {
        for url in daily_index_candidates(today, MAX_DAYS_BACK) {
            match self.client.head(&url).timeout(PROBE_TIMEOUT).send().await {
                Ok(resp) if resp.status() == StatusCode::OK => {
                    info!(url = %url, "found daily master index");
                    return Ok(url);
                }
                Ok(resp) => debug!(url = %url, status = resp.status().as_u16(), "index not available"),
                Err(e) => warn!(url = %url, error = %e, "index probe failed"),
            }
        }
        Err(EdgarError::NoIndex {
            days: MAX_DAYS_BACK,
        })
    }

    /// GET `url` and return the body as text. Non-2xx statuses are errors.
    pub async fn fetch_text(&self, url: &str) -> Result<String, EdgarError> {
        let resp = self.client.get(url).timeout(FETCH_TIMEOUT).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(EdgarError::Server {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let text = resp.text().await?;
        debug!(url = %url, bytes = text.len(), "fetched");
        Ok(text)
    }
}

/// Resolve the primary document linked from a filing index page.
///
/// The link is joined against the directory of `index_url`. Without a
/// matching link, the index URL itself is the document.
pub fn resolve_primary_document(index_url: &str, index_html: &str) -> Result<String, EdgarError> {
    let Some(href) = primary_document_href(index_html) else {
        return Ok(index_url.to_string());
    };
    let base = Url::parse(index_url).map_err(|e| EdgarError::Url {
        url: index_url.to_string(),
        reason: e.to_string(),
    })?;
    // Joining against the URL itself drops its last segment.
    let joined = base.join(&href).map_err(|e| EdgarError::Url {
        url: href.clone(),
        reason: e.to_string(),
    })?;
    Ok(joined.to_string())
}
