use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::matching::MatchingConfig;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct AppConfig {
    pub matching: MatchingConfig,
    pub engine: EngineConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct EngineConfig {
    /// Candidate count at which vectorization and scoring fan out over rayon.
    pub parallel_threshold: usize,
    pub default_top_n: usize,
    pub cache_enabled: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { parallel_threshold: 256, default_top_n: 5, cache_enabled: true }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: LogFormat::Compact }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
    pub default_top_n: Option<usize>,
    pub parallel_threshold: Option<usize>,
    pub cache_enabled: Option<bool>,
    pub vector_weight: Option<f64>,
    pub exact_weight: Option<f64>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected =
                options.config_path.unwrap_or_else(|| PathBuf::from("phonematch.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(matching) = patch.matching {
            matching.apply_to(&mut self.matching);
        }

        if let Some(engine) = patch.engine {
            if let Some(parallel_threshold) = engine.parallel_threshold {
                self.engine.parallel_threshold = parallel_threshold;
            }
            if let Some(default_top_n) = engine.default_top_n {
                self.engine.default_top_n = default_top_n;
            }
            if let Some(cache_enabled) = engine.cache_enabled {
                self.engine.cache_enabled = cache_enabled;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("PHONEMATCH_MATCHING_VECTOR_WEIGHT") {
            self.matching.vector_weight = parse_f64("PHONEMATCH_MATCHING_VECTOR_WEIGHT", &value)?;
        }
        if let Some(value) = read_env("PHONEMATCH_MATCHING_EXACT_WEIGHT") {
            self.matching.exact_weight = parse_f64("PHONEMATCH_MATCHING_EXACT_WEIGHT", &value)?;
        }
        if let Some(value) = read_env("PHONEMATCH_MATCHING_MAX_REASONS") {
            self.matching.max_reasons = parse_usize("PHONEMATCH_MATCHING_MAX_REASONS", &value)?;
        }

        if let Some(value) = read_env("PHONEMATCH_ENGINE_PARALLEL_THRESHOLD") {
            self.engine.parallel_threshold =
                parse_usize("PHONEMATCH_ENGINE_PARALLEL_THRESHOLD", &value)?;
        }
        if let Some(value) = read_env("PHONEMATCH_ENGINE_DEFAULT_TOP_N") {
            self.engine.default_top_n = parse_usize("PHONEMATCH_ENGINE_DEFAULT_TOP_N", &value)?;
        }
        if let Some(value) = read_env("PHONEMATCH_ENGINE_CACHE_ENABLED") {
            self.engine.cache_enabled = parse_bool("PHONEMATCH_ENGINE_CACHE_ENABLED", &value)?;
        }

        let log_level =
            read_env("PHONEMATCH_LOGGING_LEVEL").or_else(|| read_env("PHONEMATCH_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("PHONEMATCH_LOGGING_FORMAT").or_else(|| read_env("PHONEMATCH_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(log_format) = overrides.log_format {
            self.logging.format = log_format;
        }
        if let Some(default_top_n) = overrides.default_top_n {
            self.engine.default_top_n = default_top_n;
        }
        if let Some(parallel_threshold) = overrides.parallel_threshold {
            self.engine.parallel_threshold = parallel_threshold;
        }
        if let Some(cache_enabled) = overrides.cache_enabled {
            self.engine.cache_enabled = cache_enabled;
        }
        if let Some(vector_weight) = overrides.vector_weight {
            self.matching.vector_weight = vector_weight;
        }
        if let Some(exact_weight) = overrides.exact_weight {
            self.matching.exact_weight = exact_weight;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_matching(&self.matching)?;
        validate_engine(&self.engine)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("phonematch.toml"), PathBuf::from("config/phonematch.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_matching(matching: &MatchingConfig) -> Result<(), ConfigError> {
    let unit_fields = [
        ("matching.vector_weight", matching.vector_weight),
        ("matching.exact_weight", matching.exact_weight),
        ("matching.participation_threshold", matching.participation_threshold),
        ("matching.completeness_bonus", matching.completeness_bonus),
        ("matching.exact_hit_bonus", matching.exact_hit_bonus),
        ("matching.range_hit_bonus", matching.range_hit_bonus),
        ("matching.reason_weight_threshold", matching.reason_weight_threshold),
        ("matching.excellent_threshold", matching.excellent_threshold),
        ("matching.good_threshold", matching.good_threshold),
        ("matching.requirement_weight", matching.requirement_weight),
        ("matching.budget_weight_floor", matching.budget_weight_floor),
        ("matching.strength_threshold", matching.strength_threshold),
        ("matching.weakness_threshold", matching.weakness_threshold),
        ("matching.similarity_threshold", matching.similarity_threshold),
    ];
    for (name, value) in unit_fields {
        if !(0.0..=1.0).contains(&value) {
            return Err(ConfigError::Validation(format!(
                "{name} must be in range 0..=1, got {value}"
            )));
        }
    }

    for (name, value) in [
        ("matching.minimum_penalty", matching.minimum_penalty),
        ("matching.maximum_penalty", matching.maximum_penalty),
    ] {
        if !(0.0..1.0).contains(&value) {
            return Err(ConfigError::Validation(format!(
                "{name} must be in range 0..1, got {value}"
            )));
        }
    }

    if (matching.vector_weight + matching.exact_weight - 1.0).abs() > 1e-6 {
        return Err(ConfigError::Validation(format!(
            "matching.vector_weight + matching.exact_weight must equal 1.0, got {}",
            matching.vector_weight + matching.exact_weight
        )));
    }

    if matching.good_threshold > matching.excellent_threshold {
        return Err(ConfigError::Validation(
            "matching.good_threshold must not exceed matching.excellent_threshold".to_string(),
        ));
    }

    if matching.max_reasons == 0 {
        return Err(ConfigError::Validation(
            "matching.max_reasons must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

fn validate_engine(engine: &EngineConfig) -> Result<(), ConfigError> {
    if engine.default_top_n == 0 {
        return Err(ConfigError::Validation(
            "engine.default_top_n must be greater than zero".to_string(),
        ));
    }

    if engine.parallel_threshold == 0 {
        return Err(ConfigError::Validation(
            "engine.parallel_threshold must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_usize(key: &str, value: &str) -> Result<usize, ConfigError> {
    value.trim().parse::<usize>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_f64(key: &str, value: &str) -> Result<f64, ConfigError> {
    value.trim().parse::<f64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    value.trim().parse::<bool>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigPatch {
    matching: Option<MatchingPatch>,
    engine: Option<EnginePatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct MatchingPatch {
    vector_weight: Option<f64>,
    exact_weight: Option<f64>,
    participation_threshold: Option<f64>,
    completeness_min_dimensions: Option<usize>,
    completeness_bonus: Option<f64>,
    exact_hit_bonus: Option<f64>,
    range_hit_bonus: Option<f64>,
    minimum_penalty: Option<f64>,
    maximum_penalty: Option<f64>,
    reason_weight_threshold: Option<f64>,
    excellent_threshold: Option<f64>,
    good_threshold: Option<f64>,
    max_reasons: Option<usize>,
    requirement_weight: Option<f64>,
    budget_weight_floor: Option<f64>,
    strength_threshold: Option<f64>,
    weakness_threshold: Option<f64>,
    similarity_threshold: Option<f64>,
}

impl MatchingPatch {
    fn apply_to(self, matching: &mut MatchingConfig) {
        let floats = [
            (self.vector_weight, &mut matching.vector_weight),
            (self.exact_weight, &mut matching.exact_weight),
            (self.participation_threshold, &mut matching.participation_threshold),
            (self.completeness_bonus, &mut matching.completeness_bonus),
            (self.exact_hit_bonus, &mut matching.exact_hit_bonus),
            (self.range_hit_bonus, &mut matching.range_hit_bonus),
            (self.minimum_penalty, &mut matching.minimum_penalty),
            (self.maximum_penalty, &mut matching.maximum_penalty),
            (self.reason_weight_threshold, &mut matching.reason_weight_threshold),
            (self.excellent_threshold, &mut matching.excellent_threshold),
            (self.good_threshold, &mut matching.good_threshold),
            (self.requirement_weight, &mut matching.requirement_weight),
            (self.budget_weight_floor, &mut matching.budget_weight_floor),
            (self.strength_threshold, &mut matching.strength_threshold),
            (self.weakness_threshold, &mut matching.weakness_threshold),
            (self.similarity_threshold, &mut matching.similarity_threshold),
        ];
        for (patch, slot) in floats {
            if let Some(value) = patch {
                *slot = value;
            }
        }
        if let Some(value) = self.completeness_min_dimensions {
            matching.completeness_min_dimensions = value;
        }
        if let Some(value) = self.max_reasons {
            matching.max_reasons = value;
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct EnginePatch {
    parallel_threshold: Option<usize>,
    default_top_n: Option<usize>,
    cache_enabled: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
