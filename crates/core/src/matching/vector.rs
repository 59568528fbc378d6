use serde::Serialize;

use super::MatchingConfig;
use crate::domain::dimension::{unit, Dimension, DimensionVector, PerformanceVector};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DimensionContribution {
    pub dimension: Dimension,
    pub performance: f64,
    pub weight: f64,
    pub contribution: f64,
}

/// Per-dimension view of a vector score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VectorAnalysis {
    pub score: f64,
    pub participating: Vec<DimensionContribution>,
    pub strengths: Vec<Dimension>,
    pub weaknesses: Vec<Dimension>,
}

/// Weighted-overlap score of a capability profile against demand weights.
#[derive(Debug, Clone)]
pub struct VectorMatcher {
    config: MatchingConfig,
}

impl Default for VectorMatcher {
    fn default() -> Self {
        Self::new(MatchingConfig::default())
    }
}

impl VectorMatcher {
    pub fn new(config: MatchingConfig) -> Self {
        Self { config }
    }

    fn participating(
        &self,
        performance: &PerformanceVector,
        demand: &DimensionVector,
    ) -> Vec<DimensionContribution> {
        demand
            .iter()
            .filter(|(_, weight)| *weight > self.config.participation_threshold)
            .map(|(dimension, weight)| {
                let value = performance.get(dimension);
                DimensionContribution {
                    dimension,
                    performance: value,
                    weight,
                    contribution: value * weight,
                }
            })
            .collect()
    }

    fn score_from(&self, contributions: &[DimensionContribution]) -> f64 {
        let total_weight: f64 = contributions.iter().map(|c| c.weight).sum();
        if contributions.is_empty() || total_weight <= 0.0 {
            return 0.0;
        }
        let weighted: f64 = contributions.iter().map(|c| c.contribution).sum();
        let mut score = weighted / total_weight;
        if contributions.len() >= self.config.completeness_min_dimensions {
            score += self.config.completeness_bonus;
        }
        unit(score)
    }

    /// Score in `[0, 1]`; 0.0 when no dimension carries material weight.
    pub fn score(&self, performance: &PerformanceVector, demand: &DimensionVector) -> f64 {
        self.score_from(&self.participating(performance, demand))
    }

    pub fn analyze(
        &self,
        performance: &PerformanceVector,
        demand: &DimensionVector,
    ) -> VectorAnalysis {
        let participating = self.participating(performance, demand);
        let strengths = participating
            .iter()
            .filter(|c| c.performance >= self.config.strength_threshold)
            .map(|c| c.dimension)
            .collect();
        let weaknesses = participating
            .iter()
            .filter(|c| c.performance <= self.config.weakness_threshold)
            .map(|c| c.dimension)
            .collect();
        let score = self.score_from(&participating);
        VectorAnalysis { score, participating, strengths, weaknesses }
    }

    /// Profile similarity: one minus the mean absolute component difference.
    pub fn similarity(a: &PerformanceVector, b: &PerformanceVector) -> f64 {
        let total: f64 = Dimension::ALL.iter().map(|d| (a.get(*d) - b.get(*d)).abs()).sum();
        unit(1.0 - total / Dimension::COUNT as f64)
    }
}
