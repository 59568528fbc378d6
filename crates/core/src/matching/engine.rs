//! End-to-end matching pipeline.
//!
//! text -> demand analysis; catalog -> pre-filter -> vectorize (cached) ->
//! vector score + exact score -> ranker. Each call is synchronous; the
//! vector cache is the only state shared between calls.

use std::cmp::Ordering;
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, info};

use super::exact::ExactScorer;
use super::filter::prefilter;
use super::ranker::Ranker;
use super::types::{MatchBreakdown, MatchResult, RankedMatch, RequirementCheck, SimilarItem};
use super::vector::VectorMatcher;
use super::MatchingConfig;
use crate::config::{AppConfig, EngineConfig};
use crate::demand::{DemandAnalysis, DemandParser};
use crate::domain::budget::BudgetDescriptor;
use crate::domain::dimension::PerformanceVector;
use crate::domain::phone::CatalogItem;
use crate::vectorize::{PhoneVectorizer, VectorCache, VectorKey};

#[derive(Debug)]
pub struct MatchingEngine {
    engine: EngineConfig,
    vectorizer: PhoneVectorizer,
    parser: DemandParser,
    matcher: VectorMatcher,
    scorer: ExactScorer,
    ranker: Ranker,
    cache: VectorCache,
}

impl Default for MatchingEngine {
    fn default() -> Self {
        Self::new(MatchingConfig::default(), EngineConfig::default())
    }
}

impl MatchingEngine {
    pub fn new(config: MatchingConfig, engine: EngineConfig) -> Self {
        Self {
            engine,
            vectorizer: PhoneVectorizer::new(),
            parser: DemandParser::from_config(&config),
            matcher: VectorMatcher::new(config),
            scorer: ExactScorer::new(),
            ranker: Ranker::new(config),
            cache: VectorCache::new(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.matching, config.engine)
    }

    pub fn parse_demand(&self, text: &str) -> DemandAnalysis {
        self.parser.parse(text)
    }

    /// Performance vector for `item` under `budget`, read through the cache.
    pub fn performance_vector(
        &self,
        item: &CatalogItem,
        budget: Option<&BudgetDescriptor>,
    ) -> Arc<PerformanceVector> {
        if !self.engine.cache_enabled {
            return Arc::new(self.vectorizer.vectorize(item, budget));
        }
        self.cache.get_or_insert_with(VectorKey::new(item, budget), || {
            self.vectorizer.vectorize(item, budget)
        })
    }

    /// Parses `text` and returns the best `top_n` items.
    pub fn match_catalog(
        &self,
        items: &[CatalogItem],
        text: &str,
        top_n: usize,
    ) -> Vec<RankedMatch> {
        let analysis = self.parse_demand(text);
        self.match_analysis(items, &analysis, top_n).into_iter().map(RankedMatch::from).collect()
    }

    /// Ranks `items` against an already parsed demand.
    pub fn match_analysis(
        &self,
        items: &[CatalogItem],
        analysis: &DemandAnalysis,
        top_n: usize,
    ) -> Vec<MatchResult> {
        let requirements = &analysis.specific_requirements;
        let outcome = prefilter(items, requirements);
        if outcome.fell_back {
            info!(
                event_name = "match.prefilter.fallback",
                requirements = requirements.len(),
                catalog_size = items.len(),
                "no item satisfies every requirement; ranking the full catalog"
            );
        }

        let budget = budget_context(analysis);
        let parallel = outcome.indices.len() >= self.engine.parallel_threshold;
        let scored: Vec<MatchResult> = if parallel {
            outcome
                .indices
                .par_iter()
                .map(|&index| self.score_item(index, &items[index], analysis, budget))
                .collect()
        } else {
            outcome
                .indices
                .iter()
                .map(|&index| self.score_item(index, &items[index], analysis, budget))
                .collect()
        };

        let candidates = scored.len();
        let mut ranked = self.ranker.rank(scored, top_n);
        for result in &mut ranked {
            result.reasons = self.ranker.reasons(
                &result.item,
                &result.performance_vector,
                &analysis.vector_weights,
                requirements,
            );
        }

        info!(
            event_name = "match.catalog.completed",
            catalog_size = items.len(),
            candidates,
            returned = ranked.len(),
            fell_back = outcome.fell_back,
            parallel,
            top_score = ranked.first().map(|result| result.final_score).unwrap_or(0.0),
            "catalog matched"
        );
        ranked
    }

    fn score_item(
        &self,
        index: usize,
        item: &CatalogItem,
        analysis: &DemandAnalysis,
        budget: Option<&BudgetDescriptor>,
    ) -> MatchResult {
        let performance = self.performance_vector(item, budget);
        let vector_score = self.matcher.score(&performance, &analysis.vector_weights);
        let exact_score = self.scorer.score(item, &analysis.specific_requirements);
        let combined_score = self.ranker.combine(vector_score, exact_score);
        let final_score =
            self.ranker.adjust(combined_score, item, &analysis.specific_requirements);

        MatchResult {
            item: item.clone(),
            catalog_index: index,
            performance_vector: *performance,
            vector_score,
            exact_score,
            combined_score,
            final_score,
            rank: 0,
            reasons: Vec::new(),
        }
    }

    /// Per-dimension and per-requirement view of one ranked result.
    pub fn explain(&self, result: &MatchResult, analysis: &DemandAnalysis) -> MatchBreakdown {
        let requirement_checks = analysis
            .specific_requirements
            .iter()
            .map(|requirement| {
                let actual = result.item.raw_value(requirement.dimension);
                RequirementCheck {
                    requirement: requirement.describe(),
                    actual,
                    satisfied: requirement.is_satisfied_by(actual),
                    score: self.scorer.requirement_score(actual, requirement),
                }
            })
            .collect();

        MatchBreakdown {
            rank: result.rank,
            name: result.item.name.clone(),
            final_score: result.final_score,
            vector: self.matcher.analyze(&result.performance_vector, &analysis.vector_weights),
            exact_score: result.exact_score,
            requirement_checks,
        }
    }

    /// Items whose capability profile is close to `items[index]`.
    ///
    /// Profiles are compared without a budget context. Returns an empty list
    /// when `index` is out of range.
    pub fn similar_items(
        &self,
        items: &[CatalogItem],
        index: usize,
        top_n: usize,
    ) -> Vec<SimilarItem> {
        let Some(reference) = items.get(index) else {
            return Vec::new();
        };
        let reference_vector = self.performance_vector(reference, None);
        let threshold = self.ranker.config().similarity_threshold;

        let mut similar: Vec<SimilarItem> = items
            .iter()
            .enumerate()
            .filter(|(candidate, _)| *candidate != index)
            .filter_map(|(candidate, item)| {
                let candidate_vector = self.performance_vector(item, None);
                let similarity = VectorMatcher::similarity(&reference_vector, &candidate_vector);
                (similarity >= threshold).then(|| SimilarItem {
                    item: item.clone(),
                    catalog_index: candidate,
                    similarity,
                })
            })
            .collect();

        similar.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(Ordering::Equal)
                .then(a.catalog_index.cmp(&b.catalog_index))
        });
        similar.truncate(top_n);
        debug!(
            event_name = "match.similar.completed",
            reference = %reference.name,
            returned = similar.len(),
            "similar items computed"
        );
        similar
    }

    pub fn cached_vectors(&self) -> usize {
        self.cache.len()
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
        debug!(event_name = "match.cache.cleared", "vector cache cleared");
    }
}

fn budget_context(analysis: &DemandAnalysis) -> Option<&BudgetDescriptor> {
    analysis.budget_info.has_budget.then_some(&analysis.budget_info)
}

/// Parses demand text with default calibration.
pub fn parse_demand(text: &str) -> DemandAnalysis {
    DemandParser::default().parse(text)
}

/// One-shot match with default calibration and a fresh cache.
pub fn match_catalog(items: &[CatalogItem], text: &str, top_n: usize) -> Vec<RankedMatch> {
    MatchingEngine::default().match_catalog(items, text, top_n)
}

#[cfg(test)]
mod tests {
    use super::{match_catalog, MatchingEngine};
    use crate::catalog::sample_catalog;
    use crate::config::EngineConfig;
    use crate::domain::phone::CatalogItem;
    use crate::matching::MatchingConfig;
    use crate::vectorize::PhoneVectorizer;

    fn phone(name: &str, cpu: &str, storage_gb: u32, price: f64) -> CatalogItem {
        CatalogItem {
            name: name.to_owned(),
            cpu: cpu.to_owned(),
            ram_gb: 8,
            storage_gb,
            camera_mp: 50,
            battery_mah: 4500,
            price,
            ..CatalogItem::default()
        }
    }

    #[test]
    fn storage_requirement_filters_candidates() {
        let items = vec![
            phone("Alpha", "骁龙8 Gen2", 128, 3999.0),
            phone("Beta", "骁龙8 Gen2", 256, 3999.0),
            phone("Gamma", "骁龙8 Gen2", 512, 3999.0),
        ];
        let matches = match_catalog(&items, "256G存储", 5);

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].item.name, "Beta");
        assert_eq!(matches[0].rank, 1);
        assert_eq!(matches[0].reasons[0], "meets 256GB requirement");
    }

    #[test]
    fn over_constrained_request_falls_back_to_full_catalog() {
        let items = vec![phone("Alpha", "A15", 128, 3999.0), phone("Beta", "A16", 256, 5999.0)];
        let matches = match_catalog(&items, "64G存储", 5);
        assert_eq!(matches.len(), 2);
    }

    #[test]
    fn results_are_truncated_and_ranked_from_one() {
        let matches = match_catalog(&sample_catalog(), "性能好的手机", 3);
        assert_eq!(matches.len(), 3);
        let ranks: Vec<_> = matches.iter().map(|m| m.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
        assert!(matches.windows(2).all(|pair| pair[0].match_score >= pair[1].match_score));
    }

    #[test]
    fn identical_items_keep_catalog_order() {
        let items = vec![phone("First", "A16", 256, 5999.0), phone("Second", "A16", 256, 5999.0)];
        let matches = match_catalog(&items, "拍照", 2);
        assert_eq!(matches[0].item.name, "First");
        assert_eq!(matches[1].item.name, "Second");
    }

    #[test]
    fn parallel_and_sequential_paths_agree() {
        let catalog = sample_catalog();
        let text = "预算4000左右，拍照好，续航强";
        let sequential = MatchingEngine::default().match_catalog(&catalog, text, 12);
        let parallel = MatchingEngine::new(
            MatchingConfig::default(),
            EngineConfig { parallel_threshold: 1, ..EngineConfig::default() },
        )
        .match_catalog(&catalog, text, 12);
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn cache_fills_once_per_item_and_budget() {
        let engine = MatchingEngine::default();
        let catalog = sample_catalog();

        engine.match_catalog(&catalog, "拍照", 3);
        assert_eq!(engine.cached_vectors(), catalog.len());
        engine.match_catalog(&catalog, "续航", 3);
        assert_eq!(engine.cached_vectors(), catalog.len());

        engine.match_catalog(&catalog, "便宜的手机", 3);
        assert_eq!(engine.cached_vectors(), catalog.len() * 2);

        engine.clear_cache();
        assert_eq!(engine.cached_vectors(), 0);
    }

    #[test]
    fn cache_separates_items_differing_only_in_battery() {
        let engine = MatchingEngine::default();
        let small =
            CatalogItem { battery_mah: 3000, weight_g: 170, ..phone("Twin", "A16", 256, 5999.0) };
        let large = CatalogItem { battery_mah: 6000, weight_g: 210, ..small.clone() };

        let small_vector = engine.performance_vector(&small, None);
        let large_vector = engine.performance_vector(&large, None);

        assert_eq!(engine.cached_vectors(), 2);
        let vectorizer = PhoneVectorizer::new();
        assert_eq!(*small_vector, vectorizer.vectorize(&small, None));
        assert_eq!(*large_vector, vectorizer.vectorize(&large, None));
        assert!(large_vector.battery_capacity > small_vector.battery_capacity);
    }

    #[test]
    fn price_ceiling_keeps_over_budget_phones_out() {
        let items = vec![
            phone("Over", "骁龙8 Gen2", 256, 3299.0),
            phone("Cheap", "骁龙8 Gen2", 256, 1999.0),
        ];
        let matches = match_catalog(&items, "3000元以内的手机", 5);

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].item.name, "Cheap");
        assert_eq!(matches[0].reasons[0], "within maximum 3000 yuan");
    }

    #[test]
    fn price_ceiling_penalizes_over_budget_phones_on_fallback() {
        let engine = MatchingEngine::default();
        let items = vec![
            phone("Over", "骁龙8 Gen2", 256, 3299.0),
            phone("WayOver", "骁龙8 Gen2", 256, 4999.0),
        ];
        let analysis = engine.parse_demand("3000元以内的手机");
        let ranked = engine.match_analysis(&items, &analysis, 2);

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].item.name, "Over");
        for result in &ranked {
            let penalized = result.combined_score * 0.7;
            assert!((result.final_score - penalized.clamp(0.0, 1.0)).abs() < 1e-9);
        }
    }

    #[test]
    fn disabled_cache_stays_empty() {
        let engine = MatchingEngine::new(
            MatchingConfig::default(),
            EngineConfig { cache_enabled: false, ..EngineConfig::default() },
        );
        engine.match_catalog(&sample_catalog(), "拍照", 3);
        assert_eq!(engine.cached_vectors(), 0);
    }

    #[test]
    fn explain_reports_requirement_checks() {
        let engine = MatchingEngine::default();
        let items = vec![phone("Alpha", "A16", 256, 5999.0)];
        let analysis = engine.parse_demand("256G存储，电池至少5000mah");
        let ranked = engine.match_analysis(&items, &analysis, 1);
        let breakdown = engine.explain(&ranked[0], &analysis);

        assert_eq!(breakdown.name, "Alpha");
        assert_eq!(breakdown.requirement_checks.len(), 2);
        assert!(breakdown.requirement_checks[0].satisfied);
        assert!(!breakdown.requirement_checks[1].satisfied);
        assert!(!breakdown.vector.participating.is_empty());
    }

    #[test]
    fn similar_items_exclude_the_reference() {
        let engine = MatchingEngine::default();
        let catalog = sample_catalog();
        let similar = engine.similar_items(&catalog, 0, 5);

        assert!(!similar.is_empty());
        assert!(similar.len() <= 5);
        assert!(similar.iter().all(|s| s.catalog_index != 0));
        assert!(similar.windows(2).all(|pair| pair[0].similarity >= pair[1].similarity));
        assert!(engine.similar_items(&catalog, 99, 5).is_empty());
    }
}
