use phonematch_core::config::AppConfig;
use phonematch_core::{
    ApplicationError, DemandAnalysis, MatchBreakdown, MatchingEngine, RankedMatch,
};
use serde::Serialize;

use crate::commands::{CatalogArgs, CommandResult};

#[derive(Debug, Serialize)]
struct MatchOutput {
    analysis: DemandAnalysis,
    matches: Vec<RankedMatch>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    breakdowns: Vec<MatchBreakdown>,
}

pub fn run(config: &AppConfig, text: &str, catalog: &CatalogArgs, explain: bool) -> CommandResult {
    match rank(config, text, catalog, explain) {
        Ok((message, output)) => CommandResult::success_with("match", message, output),
        Err(error) => CommandResult::from_error("match", &error),
    }
}

fn rank(
    config: &AppConfig,
    text: &str,
    catalog: &CatalogArgs,
    explain: bool,
) -> Result<(String, MatchOutput), ApplicationError> {
    let items = catalog.load()?;
    let top_n = catalog.top_n(config)?;

    let engine = MatchingEngine::from_config(config);
    let analysis = engine.parse_demand(text);
    let results = engine.match_analysis(&items, &analysis, top_n);

    let breakdowns = if explain {
        results.iter().map(|result| engine.explain(result, &analysis)).collect()
    } else {
        Vec::new()
    };
    let message = format!(
        "ranked {} of {} catalog items for: {}",
        results.len(),
        items.len(),
        analysis.demand_summary
    );
    let output = MatchOutput {
        analysis,
        matches: results.into_iter().map(RankedMatch::from).collect(),
        breakdowns,
    };
    Ok((message, output))
}
