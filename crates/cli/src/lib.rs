pub mod commands;
pub mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use phonematch_core::config::{AppConfig, LoadOptions};
use phonematch_core::ApplicationError;

use crate::commands::{CatalogArgs, CommandResult};

#[derive(Debug, Parser)]
#[command(
    name = "phonematch",
    about = "Phone recommendation matcher",
    long_about = "Parse free-text phone requirements and rank a catalog against them.",
    after_help = concat!(
        "Examples:\n",
        "  phonematch parse \"256G存储，拍照好的手机\"\n",
        "  phonematch match \"预算3000-4000元，续航好\" --top 3\n",
        "  phonematch similar \"小米13\"\n",
        "  phonematch config",
    )
)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to a phonematch.toml config file")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Parse demand text and print the structured analysis")]
    Parse { text: String },
    #[command(about = "Rank a catalog against demand text")]
    Match {
        text: String,
        #[command(flatten)]
        catalog: CatalogArgs,
        #[arg(long, help = "Include per-dimension and per-requirement breakdowns")]
        explain: bool,
    },
    #[command(about = "List catalog items with a similar capability profile")]
    Similar {
        name: String,
        #[command(flatten)]
        catalog: CatalogArgs,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Self::Parse { .. } => "parse",
            Self::Match { .. } => "match",
            Self::Similar { .. } => "similar",
            Self::Config => "config",
        }
    }
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let result = execute(cli);
    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

fn execute(cli: Cli) -> CommandResult {
    if let Command::Config = cli.command {
        return commands::config::run(cli.config.as_deref());
    }

    let command = cli.command.name();
    let options = LoadOptions { config_path: cli.config, ..LoadOptions::default() };
    let config = match AppConfig::load(options) {
        Ok(config) => config,
        Err(error) => return CommandResult::from_error(command, &ApplicationError::from(error)),
    };
    if let Err(error) = logging::init(&config.logging) {
        eprintln!("warning: {error:#}");
    }

    match cli.command {
        Command::Parse { text } => commands::parse::run(&config, &text),
        Command::Match { text, catalog, explain } => {
            commands::rank::run(&config, &text, &catalog, explain)
        }
        Command::Similar { name, catalog } => commands::similar::run(&config, &name, &catalog),
        Command::Config => commands::config::run(None),
    }
}
