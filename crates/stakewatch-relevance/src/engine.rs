//! The relevance engine: raw document in, evidence and confidence out.

use regex::Regex;
use stakewatch_core::{Evidence, ScoreResult, ThresholdPolicy};
use tracing::debug;

use crate::config::{ConfigError, RelevanceConfig};
use crate::exclusion::{self, Verdict};
use crate::matcher::find_matches;
use crate::normalize;
use crate::patterns::{Category, PatternGroup, compile_pattern};
use crate::proximity::correlate;
use crate::scorer::{ScoreBreakdown, Scorer};

/// Where evaluation stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    NoGovernment,
    NoInvestment,
    /// Both term classes occur, but never within the proximity threshold.
    NoProximity,
    /// An exclusion pattern matched inside a snippet.
    Rejected { pattern: String },
    Scored,
}

impl Outcome {
    pub fn describe(&self) -> String {
        match self {
            Self::NoGovernment => "no government-entity mention".to_string(),
            Self::NoInvestment => "no investment-term mention".to_string(),
            Self::NoProximity => "no government/investment pair within range".to_string(),
            Self::Rejected { pattern } => format!("rejected by exclusion `{pattern}`"),
            Self::Scored => "scored".to_string(),
        }
    }
}

/// A [`ScoreResult`] plus how it was reached.
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub result: ScoreResult,
    pub outcome: Outcome,
    /// Present only when the scorer ran.
    pub breakdown: Option<ScoreBreakdown>,
}

impl Assessment {
    fn stopped(outcome: Outcome) -> Self {
        Self {
            result: ScoreResult::empty(),
            outcome,
            breakdown: None,
        }
    }
}

/// Compiled, immutable relevance engine.
///
/// Holds no mutable state: one instance can evaluate documents from many
/// threads at once.
#[derive(Debug, Clone)]
pub struct RelevanceEngine {
    config: RelevanceConfig,
    government: PatternGroup,
    investment: PatternGroup,
    transaction: PatternGroup,
    exclusion: PatternGroup,
    item_marker: Regex,
}

impl RelevanceEngine {
    /// Validate `config` and compile its patterns.
    pub fn new(config: RelevanceConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let p = &config.patterns;
        let government = PatternGroup::compile(Category::Government, &p.government)?;
        let investment = PatternGroup::compile(Category::Investment, &p.investment)?;
        let transaction = PatternGroup::compile(Category::Transaction, &p.transaction)?;
        let exclusion = PatternGroup::compile(Category::Exclusion, &p.exclusion)?;
        let item_marker =
            compile_pattern(&config.item_marker).map_err(|source| ConfigError::Pattern {
                group: "item-marker",
                pattern: config.item_marker.clone(),
                source,
            })?;

        debug!(
            government = government.len(),
            investment = investment.len(),
            transaction = transaction.len(),
            exclusion = exclusion.len(),
            "relevance engine compiled"
        );

        Ok(Self {
            config,
            government,
            investment,
            transaction,
            exclusion,
            item_marker,
        })
    }

    pub fn config(&self) -> &RelevanceConfig {
        &self.config
    }

    pub fn policy(&self) -> ThresholdPolicy {
        self.config.policy()
    }

    /// Evaluate a raw document. Never fails; unusable input scores `0.0`.
    pub fn evaluate(&self, raw: &str) -> ScoreResult {
        self.assess(raw).result
    }

    /// [`evaluate`](Self::evaluate), keeping the stopping point and the score
    /// breakdown.
    pub fn assess(&self, raw: &str) -> Assessment {
        let text = normalize::to_plain_text(raw);
        let text: &str = &text;

        let government = find_matches(text, &self.government);
        if government.is_empty() {
            return Assessment::stopped(Outcome::NoGovernment);
        }

        let investment = find_matches(text, &self.investment);
        if investment.is_empty() {
            debug!(government = government.len(), "no investment terms");
            return Assessment::stopped(Outcome::NoInvestment);
        }

        let pairs = correlate(
            text,
            &government,
            &investment,
            self.config.proximity_chars,
            self.config.snippet_chars,
        );
        if pairs.is_empty() {
            debug!(
                government = government.len(),
                investment = investment.len(),
                "no pairs within proximity"
            );
            return Assessment::stopped(Outcome::NoProximity);
        }

        match exclusion::check(text, &pairs, &self.exclusion) {
            Verdict::Rejected { pattern, evidence } => {
                debug!(%pattern, evidence, pairs = pairs.len(), "evidence vetoed");
                return Assessment::stopped(Outcome::Rejected { pattern });
            }
            Verdict::Passed { present } => {
                debug!(present, "exclusions present outside evidence");
            }
            Verdict::Clean => {}
        }

        let scorer = Scorer {
            government: &self.government,
            transaction: &self.transaction,
            exclusion: &self.exclusion,
            item_marker: &self.item_marker,
        };
        let breakdown = scorer.score(text, &pairs);
        let confidence = breakdown.confidence();
        debug!(pairs = pairs.len(), raw = breakdown.raw(), confidence, "scored");

        Assessment {
            result: ScoreResult {
                evidence: pairs.into_iter().map(Evidence::from).collect(),
                confidence,
            },
            outcome: Outcome::Scored,
            breakdown: Some(breakdown),
        }
    }
}
