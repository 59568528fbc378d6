//! Demand parser: free text to weights, budget and explicit requirements.
//!
//! Parsing is pure and deterministic. Unrecognized text degrades to
//! documented defaults (no requirements, no budget, default focus) and never
//! produces an error.

pub mod budget;
pub mod extract;
pub mod keywords;
pub mod text;

use serde::Serialize;
use tracing::debug;

use crate::domain::budget::BudgetDescriptor;
use crate::domain::dimension::{DemandVector, Dimension};
use crate::domain::requirement::SpecificRequirement;
use crate::matching::MatchingConfig;

pub use budget::extract_budget;
pub use extract::{extract_requirements, MIN_PLAUSIBLE_PRICE};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DemandAnalysis {
    pub vector_weights: DemandVector,
    pub specific_requirements: Vec<SpecificRequirement>,
    pub budget_info: BudgetDescriptor,
    pub focus_dimensions: Vec<Dimension>,
    pub demand_summary: String,
    /// Usage scenarios recognized in the text ("gaming", "business", ...).
    pub usage_patterns: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct DemandParser {
    materiality_threshold: f64,
    requirement_weight: f64,
    budget_weight_floor: f64,
}

impl Default for DemandParser {
    fn default() -> Self {
        Self::from_config(&MatchingConfig::default())
    }
}

impl DemandParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &MatchingConfig) -> Self {
        Self {
            materiality_threshold: config.participation_threshold,
            requirement_weight: config.requirement_weight,
            budget_weight_floor: config.budget_weight_floor,
        }
    }

    pub fn parse(&self, text: &str) -> DemandAnalysis {
        let lowered = text.to_lowercase();

        let mut weights = keywords::keyword_weights(&lowered);
        let usage_patterns = keywords::apply_usage_patterns(&mut weights, &lowered);

        let budget_info = extract_budget(&lowered);
        if budget_info.has_budget {
            weights.raise(Dimension::PriceValue, self.budget_weight_floor);
        }

        let specific_requirements = extract_requirements(&lowered);
        for requirement in &specific_requirements {
            weights.set(requirement.dimension, self.requirement_weight);
        }

        let focus_dimensions =
            focus_dimensions(&weights, &specific_requirements, self.materiality_threshold);
        let demand_summary = summarize(&specific_requirements, &focus_dimensions);

        debug!(
            event_name = "demand.parsed",
            requirements = specific_requirements.len(),
            has_budget = budget_info.has_budget,
            focus = focus_dimensions.len(),
            usage_patterns = ?usage_patterns,
            "parsed demand text"
        );

        DemandAnalysis {
            vector_weights: weights,
            specific_requirements,
            budget_info,
            focus_dimensions,
            demand_summary,
            usage_patterns: usage_patterns.into_iter().map(str::to_owned).collect(),
        }
    }
}

/// Requirement dimensions first, then material weights in canonical order.
fn focus_dimensions(
    weights: &DemandVector,
    requirements: &[SpecificRequirement],
    threshold: f64,
) -> Vec<Dimension> {
    let mut focus: Vec<Dimension> = Vec::new();
    for requirement in requirements {
        if !focus.contains(&requirement.dimension) {
            focus.push(requirement.dimension);
        }
    }
    for dimension in weights.dimensions_above(threshold) {
        if !focus.contains(&dimension) {
            focus.push(dimension);
        }
    }
    if focus.is_empty() {
        focus.extend(Dimension::DEFAULT_FOCUS);
    }
    focus
}

fn summarize(requirements: &[SpecificRequirement], focus: &[Dimension]) -> String {
    let mut parts: Vec<String> = requirements.iter().map(SpecificRequirement::describe).collect();

    let focus_labels: Vec<&str> = focus
        .iter()
        .filter(|dimension| !requirements.iter().any(|r| r.dimension == **dimension))
        .map(Dimension::label)
        .collect();
    if !focus_labels.is_empty() {
        parts.push(format!("focus: {}", focus_labels.join(", ")));
    }

    if parts.is_empty() {
        "general needs".to_owned()
    } else {
        parts.join("; ")
    }
}
