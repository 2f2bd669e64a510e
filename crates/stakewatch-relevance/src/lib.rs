//! Filing relevance scoring: decides whether a filing plausibly discloses a
//! government equity investment, and how confident that call is.
//!
//! Pipeline: [`normalize`] → [`matcher`] (government, then investment terms)
//! → [`proximity`] → [`exclusion`] → [`scorer`]. [`RelevanceEngine`] composes
//! the stages behind a single infallible [`RelevanceEngine::evaluate`].

pub mod config;
pub mod engine;
pub mod exclusion;
pub mod matcher;
pub mod normalize;
pub mod patterns;
pub mod proximity;
pub mod scorer;

pub use config::{ConfigError, PatternConfig, RelevanceConfig};
pub use engine::{Assessment, Outcome, RelevanceEngine};
pub use patterns::{Category, PatternGroup};
pub use scorer::ScoreBreakdown;
