//! Final ordering: blend the two scores, apply requirement bonuses and
//! penalties, sort deterministically and explain each pick.

use std::cmp::Ordering;

use super::types::MatchResult;
use super::MatchingConfig;
use crate::domain::dimension::{unit, DimensionVector, PerformanceVector};
use crate::domain::phone::CatalogItem;
use crate::domain::requirement::{format_quantity, RequirementType, SpecificRequirement};

pub const FALLBACK_REASON: &str = "overall good fit";

#[derive(Debug, Clone)]
pub struct Ranker {
    config: MatchingConfig,
}

impl Default for Ranker {
    fn default() -> Self {
        Self::new(MatchingConfig::default())
    }
}

impl Ranker {
    pub fn new(config: MatchingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    pub fn combine(&self, vector_score: f64, exact_score: f64) -> f64 {
        vector_score * self.config.vector_weight + exact_score * self.config.exact_weight
    }

    /// Applies bonuses and penalties in requirement order, then clamps.
    ///
    /// Bonuses use the raw tolerance band, so a zero-tolerance requirement
    /// only earns its bonus on an exact hit.
    pub fn adjust(
        &self,
        combined: f64,
        item: &CatalogItem,
        requirements: &[SpecificRequirement],
    ) -> f64 {
        let mut score = combined;
        for requirement in requirements {
            let actual = item.raw_value(requirement.dimension);
            let near = (actual - requirement.value).abs() <= requirement.band() * 0.5;
            match requirement.requirement_type {
                RequirementType::Exact if near => score += self.config.exact_hit_bonus,
                RequirementType::Range if near => score += self.config.range_hit_bonus,
                RequirementType::Minimum if actual < requirement.value => {
                    score *= 1.0 - self.config.minimum_penalty;
                }
                RequirementType::Maximum if actual > requirement.value => {
                    score *= 1.0 - self.config.maximum_penalty;
                }
                _ => {}
            }
        }
        unit(score)
    }

    /// Up to `max_reasons` short explanations, requirement hits first.
    pub fn reasons(
        &self,
        item: &CatalogItem,
        performance: &PerformanceVector,
        weights: &DimensionVector,
        requirements: &[SpecificRequirement],
    ) -> Vec<String> {
        let mut reasons = Vec::new();

        for requirement in requirements {
            let actual = item.raw_value(requirement.dimension);
            if !requirement.is_satisfied_by(actual) {
                continue;
            }
            let quantity = format_quantity(requirement.value, requirement.unit);
            reasons.push(match requirement.requirement_type {
                RequirementType::Exact | RequirementType::Range => {
                    format!("meets {quantity} requirement")
                }
                RequirementType::Minimum => format!("meets minimum {quantity}"),
                RequirementType::Maximum => format!("within maximum {quantity}"),
            });
        }

        for (dimension, weight) in weights.iter() {
            if weight <= self.config.reason_weight_threshold {
                continue;
            }
            let value = performance.get(dimension);
            if value > self.config.excellent_threshold {
                reasons.push(format!("excellent {}", dimension.label()));
            } else if value > self.config.good_threshold {
                reasons.push(format!("good {}", dimension.label()));
            }
        }

        if reasons.is_empty() {
            reasons.push(FALLBACK_REASON.to_owned());
        }
        reasons.truncate(self.config.max_reasons.max(1));
        reasons
    }

    /// Sorts by final score (descending, catalog index breaking ties),
    /// assigns 1-based ranks and keeps the first `top_n`.
    pub fn rank(&self, mut results: Vec<MatchResult>, top_n: usize) -> Vec<MatchResult> {
        results.sort_by(compare_results);
        results.truncate(top_n);
        for (position, result) in results.iter_mut().enumerate() {
            result.rank = position + 1;
        }
        results
    }
}

fn compare_results(a: &MatchResult, b: &MatchResult) -> Ordering {
    b.final_score
        .partial_cmp(&a.final_score)
        .unwrap_or(Ordering::Equal)
        .then(a.catalog_index.cmp(&b.catalog_index))
}

#[cfg(test)]
mod tests {
    use super::{Ranker, FALLBACK_REASON};
    use crate::domain::dimension::{Dimension, DimensionVector, PerformanceVector};
    use crate::domain::phone::CatalogItem;
    use crate::domain::requirement::{RequirementType, SpecificRequirement, Unit};
    use crate::matching::types::MatchResult;
    use crate::matching::MatchingConfig;

    fn close(actual: f64, expected: f64) -> bool {
        (actual - expected).abs() < 1e-9
    }

    fn result(index: usize, score: f64) -> MatchResult {
        MatchResult {
            item: CatalogItem { name: format!("phone-{index}"), ..CatalogItem::default() },
            catalog_index: index,
            performance_vector: PerformanceVector::default(),
            vector_score: score,
            exact_score: score,
            combined_score: score,
            final_score: score,
            rank: 0,
            reasons: Vec::new(),
        }
    }

    fn storage(kind: RequirementType, value: f64, tolerance: f64) -> SpecificRequirement {
        SpecificRequirement::new(Dimension::StorageSpeed, value, Unit::Gigabytes, tolerance, kind)
    }

    #[test]
    fn combine_uses_configured_mix() {
        assert!(close(Ranker::default().combine(0.8, 0.5), 0.71));
        let ranker = Ranker::new(MatchingConfig {
            vector_weight: 0.5,
            exact_weight: 0.5,
            ..MatchingConfig::default()
        });
        assert!(close(ranker.combine(0.8, 0.5), 0.65));
    }

    #[test]
    fn exact_hit_earns_bonus_and_violations_are_penalized() {
        let ranker = Ranker::default();
        let item = CatalogItem { storage_gb: 256, ..CatalogItem::default() };

        let exact = [storage(RequirementType::Exact, 256.0, 0.0)];
        assert!(close(ranker.adjust(0.5, &item, &exact), 0.7));

        let minimum = [storage(RequirementType::Minimum, 512.0, 0.1)];
        assert!(close(ranker.adjust(0.6, &item, &minimum), 0.3));

        let maximum = [storage(RequirementType::Maximum, 128.0, 0.1)];
        assert!(close(ranker.adjust(0.6, &item, &maximum), 0.42));

        let range = [storage(RequirementType::Range, 192.0, 128.0 / 192.0)];
        assert!(close(ranker.adjust(0.5, &item, &range), 0.5));
        let centered = [storage(RequirementType::Range, 256.0, 0.5)];
        assert!(close(ranker.adjust(0.5, &item, &centered), 0.6));
    }

    #[test]
    fn adjusted_score_is_clamped() {
        let ranker = Ranker::default();
        let item = CatalogItem { storage_gb: 256, ..CatalogItem::default() };
        let exact = [storage(RequirementType::Exact, 256.0, 0.0)];
        assert_eq!(ranker.adjust(0.95, &item, &exact), 1.0);
    }

    #[test]
    fn penalties_are_configurable() {
        let ranker =
            Ranker::new(MatchingConfig { minimum_penalty: 0.25, ..MatchingConfig::default() });
        let item = CatalogItem { storage_gb: 128, ..CatalogItem::default() };
        let minimum = [storage(RequirementType::Minimum, 256.0, 0.1)];
        assert!(close(ranker.adjust(0.8, &item, &minimum), 0.6));
    }

    #[test]
    fn ranking_is_stable_on_ties() {
        let ranked = Ranker::default()
            .rank(vec![result(0, 0.5), result(1, 0.9), result(2, 0.5), result(3, 0.7)], 3);

        let order: Vec<_> = ranked.iter().map(|r| (r.catalog_index, r.rank)).collect();
        assert_eq!(order, vec![(1, 1), (3, 2), (0, 3)]);
    }

    #[test]
    fn reasons_prefer_requirements_then_strong_dimensions() {
        let ranker = Ranker::default();
        let item = CatalogItem { storage_gb: 256, battery_mah: 5000, ..CatalogItem::default() };
        let mut performance = PerformanceVector::default();
        performance.set(Dimension::CameraQuality, 0.95);
        performance.set(Dimension::BatteryCapacity, 0.75);
        let mut weights = DimensionVector::default();
        weights.set(Dimension::CameraQuality, 0.9);
        weights.set(Dimension::BatteryCapacity, 0.6);

        let requirements = [storage(RequirementType::Exact, 256.0, 0.0)];
        let reasons = ranker.reasons(&item, &performance, &weights, &requirements);
        assert_eq!(
            reasons,
            vec!["meets 256GB requirement", "excellent camera quality", "good battery life"]
        );
    }

    #[test]
    fn reasons_fall_back_when_nothing_stands_out() {
        let reasons = Ranker::default().reasons(
            &CatalogItem::default(),
            &PerformanceVector::default(),
            &DimensionVector::default(),
            &[],
        );
        assert_eq!(reasons, vec![FALLBACK_REASON]);
    }
}
