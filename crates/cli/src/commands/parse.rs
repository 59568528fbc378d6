use phonematch_core::config::AppConfig;
use phonematch_core::MatchingEngine;

use crate::commands::CommandResult;

pub fn run(config: &AppConfig, text: &str) -> CommandResult {
    let engine = MatchingEngine::from_config(config);
    let analysis = engine.parse_demand(text);
    CommandResult::success_with("parse", analysis.demand_summary.clone(), &analysis)
}
