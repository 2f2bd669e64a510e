pub mod filing;
pub mod score;

pub use filing::{
    DedupKey, FilingRecord, daily_index_candidates, filing_index_url, parse_master_index,
    primary_document_href,
};
pub use score::{ConfidenceTier, Evidence, Hit, ScoreResult, ThresholdPolicy, rank_hits};
