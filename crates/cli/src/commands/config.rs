use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use phonematch_core::config::{AppConfig, LoadOptions};
use phonematch_core::ApplicationError;
use toml::Value;

use crate::commands::CommandResult;

pub fn run(config_path: Option<&Path>) -> CommandResult {
    let options =
        LoadOptions { config_path: config_path.map(Path::to_path_buf), ..LoadOptions::default() };
    let config = match AppConfig::load(options) {
        Ok(config) => config,
        Err(error) => return CommandResult::from_error("config", &ApplicationError::from(error)),
    };

    let config_file_path = detect_config_path(config_path);
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let fields: [(&str, String, Option<&str>); 10] = [
        (
            "matching.vector_weight",
            config.matching.vector_weight.to_string(),
            Some("PHONEMATCH_MATCHING_VECTOR_WEIGHT"),
        ),
        (
            "matching.exact_weight",
            config.matching.exact_weight.to_string(),
            Some("PHONEMATCH_MATCHING_EXACT_WEIGHT"),
        ),
        (
            "matching.max_reasons",
            config.matching.max_reasons.to_string(),
            Some("PHONEMATCH_MATCHING_MAX_REASONS"),
        ),
        ("matching.completeness_bonus", config.matching.completeness_bonus.to_string(), None),
        ("matching.minimum_penalty", config.matching.minimum_penalty.to_string(), None),
        ("matching.maximum_penalty", config.matching.maximum_penalty.to_string(), None),
        (
            "engine.parallel_threshold",
            config.engine.parallel_threshold.to_string(),
            Some("PHONEMATCH_ENGINE_PARALLEL_THRESHOLD"),
        ),
        (
            "engine.default_top_n",
            config.engine.default_top_n.to_string(),
            Some("PHONEMATCH_ENGINE_DEFAULT_TOP_N"),
        ),
        (
            "engine.cache_enabled",
            config.engine.cache_enabled.to_string(),
            Some("PHONEMATCH_ENGINE_CACHE_ENABLED"),
        ),
        ("logging.level", config.logging.level.clone(), Some("PHONEMATCH_LOGGING_LEVEL")),
    ];

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for (key, value, env_key) in &fields {
        let source =
            field_source(key, *env_key, config_file_doc.as_ref(), config_file_path.as_deref());
        lines.push(render_line(key, value, source));
    }
    lines.push(render_line(
        "logging.format",
        &format!("{:?}", config.logging.format).to_lowercase(),
        field_source(
            "logging.format",
            Some("PHONEMATCH_LOGGING_FORMAT"),
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        ),
    ));

    CommandResult::success_with("config", lines.join("\n"), &config)
}

fn detect_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return path.exists().then(|| path.to_path_buf());
    }

    let root = PathBuf::from("phonematch.toml");
    if root.exists() {
        return Some(root);
    }

    let nested = PathBuf::from("config/phonematch.toml");
    if nested.exists() {
        return Some(nested);
    }

    None
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_key: Option<&str>,
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_key {
        if env::var_os(env_key).is_some() {
            return format!("env ({env_key})");
        }
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
