pub mod config;
pub mod parse;
pub mod rank;
pub mod similar;

use std::path::PathBuf;

use clap::Args;
use phonematch_core::config::AppConfig;
use phonematch_core::{load_catalog, sample_catalog, ApplicationError, CatalogItem};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl CommandResult {
    /// Successful envelope carrying a JSON payload under `data`.
    pub fn success_with(command: &str, message: impl Into<String>, data: impl Serialize) -> Self {
        let data = match serde_json::to_value(data) {
            Ok(Value::Null) => None,
            Ok(value) => Some(value),
            Err(error) => {
                return Self::failure(command, "serialization", error.to_string(), 1);
            }
        };
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
            data,
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
            data: None,
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    pub fn from_error(command: &str, error: &ApplicationError) -> Self {
        Self::failure(
            command,
            error.error_class(),
            format!("{} ({error})", error.user_message()),
            error.exit_code(),
        )
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        let message = error.to_string().replace('\\', "\\\\").replace('"', "\\\"");
        format!(
            concat!(
                "{{\"command\":\"unknown\",\"status\":\"error\",",
                "\"error_class\":\"serialization\",\"message\":\"{}\"}}"
            ),
            message
        )
    })
}

/// Catalog source and result size shared by catalog commands.
#[derive(Debug, Clone, Default, Args)]
pub struct CatalogArgs {
    #[arg(long, help = "JSON catalog file (defaults to the bundled sample catalog)")]
    pub catalog: Option<PathBuf>,
    #[arg(long, help = "Number of results to return (defaults to engine.default_top_n)")]
    pub top: Option<usize>,
}

impl CatalogArgs {
    pub fn load(&self) -> Result<Vec<CatalogItem>, ApplicationError> {
        match &self.catalog {
            Some(path) => Ok(load_catalog(path)?),
            None => Ok(sample_catalog()),
        }
    }

    pub fn top_n(&self, config: &AppConfig) -> Result<usize, ApplicationError> {
        match self.top {
            Some(0) => Err(ApplicationError::Input("--top must be greater than zero".to_string())),
            Some(top) => Ok(top),
            None => Ok(config.engine.default_top_n),
        }
    }
}

#[cfg(test)]
mod tests {
    use phonematch_core::config::AppConfig;
    use serde_json::Value;

    use super::{CatalogArgs, CommandResult};

    #[test]
    fn success_envelope_omits_empty_data() {
        let result = CommandResult::success_with("parse", "done", Value::Null);
        let payload: Value = serde_json::from_str(&result.output).expect("valid JSON");

        assert_eq!(result.exit_code, 0);
        assert_eq!(payload["status"], "ok");
        assert!(payload.get("data").is_none());
        assert!(payload["error_class"].is_null());
    }

    #[test]
    fn zero_top_is_an_input_error() {
        let args = CatalogArgs { top: Some(0), ..CatalogArgs::default() };
        let error = args.top_n(&AppConfig::default()).expect_err("zero should be rejected");
        assert_eq!(error.error_class(), "input");

        let defaulted = CatalogArgs::default().top_n(&AppConfig::default()).expect("default top");
        assert_eq!(defaulted, 5);
    }
}
