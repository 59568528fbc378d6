use serde::Serialize;

use super::vector::VectorAnalysis;
use crate::domain::dimension::PerformanceVector;
use crate::domain::phone::CatalogItem;

/// Fully scored candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub item: CatalogItem,
    /// Position in the caller's catalog; the tie-break for equal scores.
    pub catalog_index: usize,
    pub performance_vector: PerformanceVector,
    pub vector_score: f64,
    pub exact_score: f64,
    pub combined_score: f64,
    pub final_score: f64,
    /// 1-based; 0 until the ranker orders the list.
    pub rank: usize,
    pub reasons: Vec<String>,
}

/// Caller-facing recommendation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedMatch {
    pub item: CatalogItem,
    pub match_score: f64,
    pub reasons: Vec<String>,
    pub rank: usize,
    pub vector_score: f64,
    pub exact_score: f64,
    pub combined_score: f64,
}

impl From<MatchResult> for RankedMatch {
    fn from(result: MatchResult) -> Self {
        Self {
            item: result.item,
            match_score: result.final_score,
            reasons: result.reasons,
            rank: result.rank,
            vector_score: result.vector_score,
            exact_score: result.exact_score,
            combined_score: result.combined_score,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequirementCheck {
    pub requirement: String,
    pub actual: f64,
    pub satisfied: bool,
    pub score: f64,
}

/// Explanation of one ranked match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchBreakdown {
    pub rank: usize,
    pub name: String,
    pub final_score: f64,
    pub vector: VectorAnalysis,
    pub exact_score: f64,
    pub requirement_checks: Vec<RequirementCheck>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarItem {
    pub item: CatalogItem,
    pub catalog_index: usize,
    pub similarity: f64,
}
