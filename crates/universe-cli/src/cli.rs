//! CLI argument definitions for the universe builder.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use tracing::level_filters::LevelFilter;
use universe_cli::edits::{parse_assignment, parse_batch_size, parse_delimiter};
use universe_cli::logging::LogFormat;

#[derive(Parser)]
#[command(
    name = "universe",
    version,
    about = "Build universes from uploaded contact files",
    long_about = "Inspect delimited contact files, map their columns onto the target \
                  field taxonomy, and store the mapped records as a universe."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow cell values to appear in logs.
    ///
    /// Uploaded files usually hold personal data, so values are redacted
    /// unless this flag is given.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,

    /// Target field taxonomy (TOML). Defaults to $UNIVERSE_TAXONOMY, then
    /// the built-in catalog.
    #[arg(long = "taxonomy", value_name = "PATH", global = true)]
    pub taxonomy: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the target fields columns can be mapped to.
    Fields,

    /// Show headers, record count and fingerprint of a file.
    Inspect(InspectArgs),

    /// Auto-map a file's headers and show the result.
    Map(MapArgs),

    /// Map a file and store it as a new universe.
    Create(CreateArgs),
}

#[derive(Args)]
pub struct SourceArgs {
    /// Delimited text file with a header row.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Field delimiter (single character, or "tab").
    #[arg(long = "delimiter", value_name = "CHAR", default_value = ",", value_parser = parse_delimiter)]
    pub delimiter: u8,
}

#[derive(Args)]
pub struct EditArgs {
    /// Map a header to a field value, overriding the suggestion.
    #[arg(long = "set", value_name = "HEADER=FIELD", value_parser = parse_assignment)]
    pub set: Vec<(String, String)>,

    /// Remove the mapping for a header.
    #[arg(long = "unset", value_name = "HEADER")]
    pub unset: Vec<String>,

    /// JSON object of header to field value (null clears), applied before
    /// --set and --unset.
    #[arg(long = "mapping", value_name = "JSON")]
    pub mapping: Option<PathBuf>,
}

#[derive(Parser)]
pub struct InspectArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Also list the distinct values of every column.
    #[arg(long = "values")]
    pub values: bool,

    /// Print the summary as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Parser)]
pub struct MapArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub edits: EditArgs,

    /// Print the mapping as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Parser)]
pub struct CreateArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub edits: EditArgs,

    /// Universe name.
    #[arg(long = "name")]
    pub name: String,

    /// Universe type label.
    #[arg(long = "type", value_name = "TYPE")]
    pub kind: String,

    /// Store directory (created if missing).
    #[arg(long = "store", value_name = "DIR")]
    pub store: PathBuf,

    /// Delete the universe again if inserting its records fails.
    #[arg(long = "compensate")]
    pub compensate: bool,

    /// Records per insert call.
    #[arg(long = "batch-size", value_name = "N", default_value = "500", value_parser = parse_batch_size)]
    pub batch_size: usize,

    /// Upload size ceiling in megabytes.
    #[arg(long = "max-size-mb", value_name = "N", default_value_t = 50)]
    pub max_size_mb: u64,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Error => Self::ERROR,
            LogLevelArg::Warn => Self::WARN,
            LogLevelArg::Info => Self::INFO,
            LogLevelArg::Debug => Self::DEBUG,
            LogLevelArg::Trace => Self::TRACE,
        }
    }
}

impl From<LogFormatArg> for LogFormat {
    fn from(format: LogFormatArg) -> Self {
        match format {
            LogFormatArg::Pretty => Self::Pretty,
            LogFormatArg::Compact => Self::Compact,
            LogFormatArg::Json => Self::Json,
        }
    }
}
