use anyhow::{anyhow, Context, Result};
use phonematch_core::config::{LogFormat, LoggingConfig};
use tracing::Level;

/// Installs the global subscriber. Logs go to stderr so stdout stays JSON.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let level = config
        .level
        .trim()
        .parse::<Level>()
        .with_context(|| format!("unknown log level `{}`", config.level))?;

    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(level)
        .with_writer(std::io::stderr);

    let installed = match config.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|error| anyhow!("failed to install tracing subscriber: {error}"))
}
