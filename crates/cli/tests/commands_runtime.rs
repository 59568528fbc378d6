use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

use phonematch_cli::commands::{config, parse, rank, similar, CatalogArgs};
use phonematch_core::config::AppConfig;
use phonematch_core::sample_catalog;
use serde_json::Value;
use tempfile::TempDir;

#[test]
fn parse_returns_analysis_payload() {
    let result = parse::run(&AppConfig::default(), "256G存储，8G内存，拍照好的手机");
    assert_eq!(result.exit_code, 0);

    let payload = parse_payload(&result.output);
    assert_eq!(payload["command"], "parse");
    assert_eq!(payload["status"], "ok");
    let requirements = payload["data"]["specific_requirements"].as_array().expect("array");
    assert_eq!(requirements.len(), 2);
    assert_eq!(requirements[0]["dimension"], "storage_speed");
    assert_eq!(requirements[0]["unit"], "GB");
    assert_eq!(requirements[0]["requirement_type"], "exact");
}

#[test]
fn match_ranks_the_sample_catalog() {
    let args = CatalogArgs { top: Some(3), ..CatalogArgs::default() };
    let result = rank::run(&AppConfig::default(), "拍照好的手机", &args, false);
    assert_eq!(result.exit_code, 0);

    let payload = parse_payload(&result.output);
    assert_eq!(payload["command"], "match");
    let matches = payload["data"]["matches"].as_array().expect("matches array");
    assert_eq!(matches.len(), 3);
    assert_eq!(matches[0]["rank"], 1);
    assert!(matches[0]["match_score"].as_f64().is_some());
    assert!(payload["data"].get("breakdowns").is_none());
}

#[test]
fn match_with_explain_includes_breakdowns() {
    let args = CatalogArgs { top: Some(2), ..CatalogArgs::default() };
    let result = rank::run(&AppConfig::default(), "256G存储，续航好", &args, true);

    let payload = parse_payload(&result.output);
    let breakdowns = payload["data"]["breakdowns"].as_array().expect("breakdowns array");
    assert_eq!(breakdowns.len(), 2);
    assert_eq!(breakdowns[0]["requirement_checks"][0]["requirement"], "256GB");
}

#[test]
fn match_reads_catalog_files() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("catalog.json");
    let catalog: Vec<_> = sample_catalog().into_iter().take(4).collect();
    fs::write(&path, serde_json::to_string(&catalog).expect("serialize")).expect("write catalog");

    let args = CatalogArgs { catalog: Some(path), top: Some(10) };
    let result = rank::run(&AppConfig::default(), "续航好", &args, false);
    assert_eq!(result.exit_code, 0);

    let payload = parse_payload(&result.output);
    assert_eq!(payload["data"]["matches"].as_array().map(Vec::len), Some(4));
}

#[test]
fn missing_catalog_file_is_a_catalog_error() {
    let args = CatalogArgs { catalog: Some(PathBuf::from("/nonexistent/phones.json")), top: None };
    let result = rank::run(&AppConfig::default(), "拍照", &args, false);
    assert_eq!(result.exit_code, 3);

    let payload = parse_payload(&result.output);
    assert_eq!(payload["status"], "error");
    assert_eq!(payload["error_class"], "catalog");
}

#[test]
fn zero_top_is_rejected_as_input() {
    let args = CatalogArgs { top: Some(0), ..CatalogArgs::default() };
    let result = rank::run(&AppConfig::default(), "拍照", &args, false);
    assert_eq!(result.exit_code, 4);
    assert_eq!(parse_payload(&result.output)["error_class"], "input");
}

#[test]
fn similar_lists_neighbours_of_a_named_phone() {
    let result = similar::run(&AppConfig::default(), "小米13", &CatalogArgs::default());
    assert_eq!(result.exit_code, 0);

    let payload = parse_payload(&result.output);
    let items = payload["data"].as_array().expect("similar array");
    assert!(!items.is_empty());
    assert!(items.iter().all(|entry| entry["item"]["name"] != "小米13"));

    let missing = similar::run(&AppConfig::default(), "Nokia 3310", &CatalogArgs::default());
    assert_eq!(missing.exit_code, 4);
}

#[test]
fn config_reports_env_sources() {
    with_env(&[("PHONEMATCH_ENGINE_DEFAULT_TOP_N", "9")], || {
        let result = config::run(None);
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "config");
        assert_eq!(payload["data"]["engine"]["default_top_n"], 9);
        let message = payload["message"].as_str().expect("message");
        let expected = "- engine.default_top_n = 9 (source: env (PHONEMATCH_ENGINE_DEFAULT_TOP_N))";
        assert!(message.contains(expected));
        assert!(message.contains("- engine.cache_enabled = true (source: default)"));
    });
}

#[test]
fn config_reports_file_sources() {
    with_env(&[], || {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("phonematch.toml");
        fs::write(&path, "[matching]\nminimum_penalty = 0.4\n").expect("write config");

        let result = config::run(Some(&path));
        let payload = parse_payload(&result.output);
        let message = payload["message"].as_str().expect("message");
        assert!(message.contains("- matching.minimum_penalty = 0.4 (source: file ("));
    });
}

#[test]
fn config_returns_validation_failure() {
    with_env(&[("PHONEMATCH_ENGINE_DEFAULT_TOP_N", "0")], || {
        let result = config::run(None);
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "PHONEMATCH_MATCHING_VECTOR_WEIGHT",
        "PHONEMATCH_MATCHING_EXACT_WEIGHT",
        "PHONEMATCH_MATCHING_MAX_REASONS",
        "PHONEMATCH_ENGINE_PARALLEL_THRESHOLD",
        "PHONEMATCH_ENGINE_DEFAULT_TOP_N",
        "PHONEMATCH_ENGINE_CACHE_ENABLED",
        "PHONEMATCH_LOGGING_LEVEL",
        "PHONEMATCH_LOGGING_FORMAT",
        "PHONEMATCH_LOG_LEVEL",
        "PHONEMATCH_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
