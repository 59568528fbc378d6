use phonematch_core::config::AppConfig;
use phonematch_core::{ApplicationError, MatchingEngine, SimilarItem};

use crate::commands::{CatalogArgs, CommandResult};

pub fn run(config: &AppConfig, name: &str, catalog: &CatalogArgs) -> CommandResult {
    match similar(config, name, catalog) {
        Ok(items) => {
            let message = format!("{} items similar to {name}", items.len());
            CommandResult::success_with("similar", message, items)
        }
        Err(error) => CommandResult::from_error("similar", &error),
    }
}

fn similar(
    config: &AppConfig,
    name: &str,
    catalog: &CatalogArgs,
) -> Result<Vec<SimilarItem>, ApplicationError> {
    let items = catalog.load()?;
    let top_n = catalog.top_n(config)?;

    let wanted = name.trim().to_lowercase();
    let index = items
        .iter()
        .position(|item| item.name.to_lowercase() == wanted)
        .ok_or_else(|| ApplicationError::Input(format!("no catalog item named `{name}`")))?;

    Ok(MatchingEngine::from_config(config).similar_items(&items, index, top_n))
}
