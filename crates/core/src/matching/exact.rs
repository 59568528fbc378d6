use crate::domain::phone::CatalogItem;
use crate::domain::requirement::{RequirementType, SpecificRequirement};

use super::NEUTRAL_EXACT_SCORE;

/// Relative band used when a requirement carries no tolerance.
pub const FALLBACK_BAND_RATIO: f64 = 0.1;

/// Graded score of an item against explicit requirements.
///
/// Unlike the pre-filter this never rejects: a near miss still earns
/// partial credit so the ranker can order fallback candidates.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactScorer;

impl ExactScorer {
    pub fn new() -> Self {
        Self
    }

    /// Equal-weight mean of per-requirement scores; neutral when empty.
    pub fn score(&self, item: &CatalogItem, requirements: &[SpecificRequirement]) -> f64 {
        if requirements.is_empty() {
            return NEUTRAL_EXACT_SCORE;
        }
        let total: f64 = requirements
            .iter()
            .map(|requirement| {
                self.requirement_score(item.raw_value(requirement.dimension), requirement)
            })
            .sum();
        (total / requirements.len() as f64).clamp(0.0, 1.0)
    }

    pub fn requirement_score(&self, actual: f64, requirement: &SpecificRequirement) -> f64 {
        let target = requirement.value;
        let band = effective_band(requirement);
        let diff = (actual - target).abs();

        let score = match requirement.requirement_type {
            RequirementType::Exact => {
                if diff <= band {
                    1.0 - diff / band * 0.3
                } else {
                    0.7 - (diff - band) / target * 0.5
                }
            }
            RequirementType::Range => {
                if diff <= band {
                    1.0 - diff / band * 0.2
                } else {
                    0.8 - (diff - band) / target * 0.4
                }
            }
            RequirementType::Minimum => {
                if actual >= target {
                    1.0
                } else {
                    actual / target
                }
            }
            RequirementType::Maximum => {
                if actual <= target {
                    1.0
                } else if actual > 0.0 {
                    target / actual
                } else {
                    0.0
                }
            }
        };
        score.clamp(0.0, 1.0)
    }
}

/// `tolerance * value`, or 10% of the value when that is not positive.
pub fn effective_band(requirement: &SpecificRequirement) -> f64 {
    let band = requirement.band();
    if band > 0.0 {
        band
    } else {
        requirement.value * FALLBACK_BAND_RATIO
    }
}
