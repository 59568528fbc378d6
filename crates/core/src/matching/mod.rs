//! Candidate matching: pre-filter, vector score, exact-constraint score and
//! the ranker that blends them.

pub mod engine;
pub mod exact;
pub mod filter;
pub mod ranker;
pub mod types;
pub mod vector;

use serde::{Deserialize, Serialize};

pub use engine::{match_catalog, parse_demand, MatchingEngine};
pub use exact::ExactScorer;
pub use filter::{prefilter, PrefilterOutcome};
pub use ranker::Ranker;
pub use types::{MatchBreakdown, MatchResult, RankedMatch, SimilarItem};
pub use vector::{VectorAnalysis, VectorMatcher};

/// Calibration constants for scoring and ranking.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Share of the vector score in the combined score (default: 0.7)
    pub vector_weight: f64,
    /// Share of the exact-constraint score (default: 0.3)
    pub exact_weight: f64,
    /// Demand weight a dimension needs to take part in scoring (default: 0.1)
    pub participation_threshold: f64,
    /// Participating dimensions needed for the completeness bonus (default: 5)
    pub completeness_min_dimensions: usize,
    pub completeness_bonus: f64,
    /// Added when an exact requirement lands within half its band (default: 0.2)
    pub exact_hit_bonus: f64,
    /// Added when a range requirement lands within half its band (default: 0.1)
    pub range_hit_bonus: f64,
    /// Fraction removed for a violated minimum (default: 0.5)
    pub minimum_penalty: f64,
    /// Fraction removed for a violated maximum (default: 0.3)
    pub maximum_penalty: f64,
    /// Demand weight a dimension needs to be quoted in reasons (default: 0.3)
    pub reason_weight_threshold: f64,
    pub excellent_threshold: f64,
    pub good_threshold: f64,
    pub max_reasons: usize,
    /// Weight forced onto dimensions with an explicit requirement (default: 0.8)
    pub requirement_weight: f64,
    /// Minimum price_value weight once a budget is known (default: 0.7)
    pub budget_weight_floor: f64,
    pub strength_threshold: f64,
    pub weakness_threshold: f64,
    /// Minimum profile similarity for `similar_items` (default: 0.7)
    pub similarity_threshold: f64,
}

pub const DEFAULT_MATCHING: MatchingConfig = MatchingConfig {
    vector_weight: 0.7,
    exact_weight: 0.3,
    participation_threshold: 0.1,
    completeness_min_dimensions: 5,
    completeness_bonus: 0.1,
    exact_hit_bonus: 0.2,
    range_hit_bonus: 0.1,
    minimum_penalty: 0.5,
    maximum_penalty: 0.3,
    reason_weight_threshold: 0.3,
    excellent_threshold: 0.8,
    good_threshold: 0.7,
    max_reasons: 3,
    requirement_weight: 0.8,
    budget_weight_floor: 0.7,
    strength_threshold: 0.8,
    weakness_threshold: 0.4,
    similarity_threshold: 0.7,
};

/// Score used when a request carries no explicit requirements.
pub const NEUTRAL_EXACT_SCORE: f64 = 0.5;

impl Default for MatchingConfig {
    fn default() -> Self {
        DEFAULT_MATCHING
    }
}
