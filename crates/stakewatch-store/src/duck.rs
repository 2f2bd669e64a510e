//! DuckDB-backed seen store.

use std::path::Path;

use duckdb::{Connection, params};
use stakewatch_core::DedupKey;
use tracing::{debug, info};

use crate::{SeenStats, SeenStore, StoreError};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS seen_filings (
    cik VARCHAR NOT NULL,
    accession VARCHAR NOT NULL,
    confidence DOUBLE NOT NULL,
    processed_at TIMESTAMP DEFAULT current_timestamp,
    PRIMARY KEY (cik, accession)
)";

/// Seen-filing records in a DuckDB table.
///
/// Use [`open`](Self::open) for an in-memory database and
/// [`open_persistent`](Self::open_persistent) for a file that survives across
/// runs. The table is created on open if missing.
pub struct DuckStore {
    conn: Connection,
}

impl DuckStore {
    /// Open an in-memory DuckDB database.
    pub fn open() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    /// Open or create a persistent database at `path`, creating parent
    /// directories as needed.
    pub fn open_persistent(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::Directory {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let store = Self::init(Connection::open(path)?)?;
        info!(path = %path.display(), "opened seen store");
        Ok(store)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Stored confidence for `key`, if any.
    pub fn confidence(&self, key: &DedupKey) -> Result<Option<f64>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT confidence FROM seen_filings WHERE cik = ? AND accession = ?")?;
        let mut rows = stmt.query(params![key.cik, key.accession])?;
        match rows.next()? {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    }
}

impl SeenStore for DuckStore {
    fn has_seen(&self, key: &DedupKey) -> Result<bool, StoreError> {
        let n: i64 = self.conn.query_row(
            "SELECT count(*) FROM seen_filings WHERE cik = ? AND accession = ?",
            params![key.cik, key.accession],
            |row| row.get(0),
        )?;
        Ok(n > 0)
    }

    fn mark_seen(&mut self, key: &DedupKey, confidence: f64) -> Result<bool, StoreError> {
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO seen_filings (cik, accession, confidence) VALUES (?, ?, ?)",
            params![key.cik, key.accession, confidence],
        )?;
        debug!(cik = %key.cik, accession = %key.accession, confidence, inserted, "mark seen");
        Ok(inserted > 0)
    }

    fn stats(&self, high_threshold: f64) -> Result<SeenStats, StoreError> {
        let (processed, high): (i64, i64) = self.conn.query_row(
            "SELECT count(*), count(*) FILTER (WHERE confidence >= ?) FROM seen_filings",
            params![high_threshold],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        Ok(SeenStats {
            processed: processed as usize,
            high_confidence: high as usize,
        })
    }

    fn clear(&mut self) -> Result<usize, StoreError> {
        let removed = self.conn.execute("DELETE FROM seen_filings", [])?;
        info!(removed, "cleared seen store");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(cik: &str, accession: &str) -> DedupKey {
        DedupKey {
            cik: cik.into(),
            accession: accession.into(),
        }
    }

    #[test]
    fn open_in_memory_is_empty() {
        let store = DuckStore::open().unwrap();
        assert_eq!(store.stats(0.7).unwrap(), SeenStats::default());
    }

    #[test]
    fn mark_is_insert_if_absent() {
        let mut store = DuckStore::open().unwrap();
        let k = key("1045810", "0001045810-25-000123");
        assert!(!store.has_seen(&k).unwrap());
        assert!(store.mark_seen(&k, 0.85).unwrap());
        assert!(!store.mark_seen(&k, 0.1).unwrap());
        assert!(store.has_seen(&k).unwrap());
        assert_eq!(store.confidence(&k).unwrap(), Some(0.85));
    }

    #[test]
    fn stats_counts_high_confidence() {
        let mut store = DuckStore::open().unwrap();
        store.mark_seen(&key("1", "a"), 0.9).unwrap();
        store.mark_seen(&key("2", "b"), 0.7).unwrap();
        store.mark_seen(&key("3", "c"), 0.0).unwrap();
        assert_eq!(
            store.stats(0.7).unwrap(),
            SeenStats {
                processed: 3,
                high_confidence: 2
            }
        );
    }

    #[test]
    fn clear_reports_removed() {
        let mut store = DuckStore::open().unwrap();
        store.mark_seen(&key("1", "a"), 0.5).unwrap();
        store.mark_seen(&key("1", "b"), 0.5).unwrap();
        assert_eq!(store.clear().unwrap(), 2);
        assert!(!store.has_seen(&key("1", "a")).unwrap());
        assert_eq!(store.clear().unwrap(), 0);
    }

    // ── Persistent storage ──

    #[test]
    fn open_persistent_creates_file_and_parents() {
        let tmp = tempfile::TempDir::new().unwrap();
        let db_path = tmp.path().join("state").join("seen.duckdb");
        assert!(!db_path.exists());

        let _store = DuckStore::open_persistent(&db_path).unwrap();
        assert!(db_path.exists());
    }

    #[test]
    fn records_survive_reopen() {
        let tmp = tempfile::TempDir::new().unwrap();
        let db_path = tmp.path().join("seen.duckdb");
        let k = key("320193", "0000320193-25-000077");

        let mut store = DuckStore::open_persistent(&db_path).unwrap();
        store.mark_seen(&k, 0.72).unwrap();
        drop(store);

        let store = DuckStore::open_persistent(&db_path).unwrap();
        assert!(store.has_seen(&k).unwrap());
        assert_eq!(store.stats(0.7).unwrap().high_confidence, 1);
    }
}
