//! Universe builder CLI.

use std::io::{self, IsTerminal};

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};
use tracing::level_filters::LevelFilter;
use universe_cli::logging::{LogConfig, init_logging};
use universe_model::Taxonomy;
use universe_taxonomy::resolve_taxonomy;

mod cli;
mod commands;
mod progress;
mod summary;

use crate::cli::{Cli, Command};
use crate::commands::{run_create, run_fields, run_inspect, run_map};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    if let Err(error) = init_logging(&log_config_from_cli(&cli)) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }

    let result = match &cli.command {
        Command::Fields => load_taxonomy(&cli).and_then(|taxonomy| run_fields(&taxonomy)),
        Command::Inspect(args) => run_inspect(args),
        Command::Map(args) => load_taxonomy(&cli).and_then(|taxonomy| run_map(args, taxonomy)),
        Command::Create(args) => {
            load_taxonomy(&cli).and_then(|taxonomy| run_create(args, taxonomy).map(|_| ()))
        }
    };
    if let Err(error) = result {
        tracing::error!(error = %error, "command failed");
        eprintln!("error: {error:#}");
        std::process::exit(1);
    }
}

fn load_taxonomy(cli: &Cli) -> Result<Taxonomy> {
    resolve_taxonomy(cli.taxonomy.as_deref()).context("load taxonomy")
}

/// `--log-level` wins over `-v`/`-q`; either one disables `RUST_LOG`.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let explicit = cli.verbosity.is_present() || cli.log_level.is_some();
    let with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    LogConfig {
        level_filter: cli
            .log_level
            .map_or_else(|| cli.verbosity.tracing_level_filter(), LevelFilter::from),
        use_env_filter: !explicit,
        with_ansi,
        format: cli.log_format.into(),
        log_file: cli.log_file.clone(),
        log_data: cli.log_data,
        ..LogConfig::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use universe_cli::logging::LogFormat;

    #[test]
    fn log_level_overrides_verbosity() {
        let cli = Cli::try_parse_from([
            "universe",
            "-v",
            "--log-level",
            "debug",
            "--log-format",
            "json",
            "--log-data",
            "fields",
        ])
        .unwrap();
        let config = log_config_from_cli(&cli);
        assert_eq!(config.level_filter, LevelFilter::DEBUG);
        assert!(!config.use_env_filter);
        assert_eq!(config.format, LogFormat::Json);
        assert!(config.log_data);
        assert!(config.with_spans);
    }

    #[test]
    fn defaults_defer_to_rust_log() {
        let cli = Cli::try_parse_from(["universe", "fields"]).unwrap();
        let config = log_config_from_cli(&cli);
        assert_eq!(config.level_filter, LevelFilter::WARN);
        assert!(config.use_env_filter);
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(!config.log_data);
    }
}
