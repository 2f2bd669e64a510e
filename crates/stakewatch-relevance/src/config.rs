//! Engine configuration: distances, thresholds, and the four pattern tables.
//!
//! Every field has a default, so a TOML file only needs the keys it changes:
//!
//! ```toml
//! proximity_chars = 200
//!
//! [patterns]
//! exclusion = ["hypothetical", "credit.*facility"]
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use stakewatch_core::ThresholdPolicy;
use thiserror::Error;

use crate::patterns::{
    FALSE_POSITIVE_EXCLUSIONS, GOVERNMENT_ENTITIES, INVESTMENT_TERMS, ITEM_MARKER,
    TRANSACTION_INDICATORS,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialise config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("{group} pattern `{pattern}` is not a valid regex: {source}")]
    Pattern {
        group: &'static str,
        pattern: String,
        source: regex::Error,
    },

    #[error("thresholds must satisfy 0 <= accept ({accept}) <= high ({high}) <= 1")]
    Thresholds { accept: f64, high: f64 },
}

/// Ordered regex sources for each pattern group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternConfig {
    pub government: Vec<String>,
    pub investment: Vec<String>,
    pub transaction: Vec<String>,
    pub exclusion: Vec<String>,
}

impl Default for PatternConfig {
    fn default() -> Self {
        fn owned(table: &[&str]) -> Vec<String> {
            table.iter().map(|s| s.to_string()).collect()
        }
        Self {
            government: owned(GOVERNMENT_ENTITIES),
            investment: owned(INVESTMENT_TERMS),
            transaction: owned(TRANSACTION_INDICATORS),
            exclusion: owned(FALSE_POSITIVE_EXCLUSIONS),
        }
    }
}

/// Immutable engine configuration, passed to
/// [`RelevanceEngine::new`](crate::RelevanceEngine::new).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelevanceConfig {
    /// Maximum distance, in characters, between the start of a government
    /// match and the start of an investment match.
    pub proximity_chars: usize,
    /// Characters of context kept on each side of a correlated pair.
    pub snippet_chars: usize,
    /// Minimum confidence for a filing to be reported.
    pub accept_threshold: f64,
    /// Minimum confidence for the high tier.
    pub high_threshold: f64,
    /// Regulatory item codes associated with material agreements.
    pub item_marker: String,
    pub patterns: PatternConfig,
}

impl Default for RelevanceConfig {
    fn default() -> Self {
        let policy = ThresholdPolicy::default();
        Self {
            proximity_chars: 150,
            snippet_chars: 120,
            accept_threshold: policy.accept,
            high_threshold: policy.high,
            item_marker: ITEM_MARKER.to_string(),
            patterns: PatternConfig::default(),
        }
    }
}

impl RelevanceConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check the thresholds. Patterns are checked when the engine compiles them.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (accept, high) = (self.accept_threshold, self.high_threshold);
        if !(0.0..=1.0).contains(&accept) || !(0.0..=1.0).contains(&high) || accept > high {
            return Err(ConfigError::Thresholds { accept, high });
        }
        Ok(())
    }

    pub fn policy(&self) -> ThresholdPolicy {
        ThresholdPolicy {
            accept: self.accept_threshold,
            high: self.high_threshold,
        }
    }
}
