//! CLI argument definitions for the batch job converter.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "rbj",
    version,
    about = "Convert Data Reviewer rule tables into batch jobs",
    long_about = "Convert semicolon-separated Data Reviewer rule tables into\n\
                  reviewer batch job files (.rbj).\n\n\
                  Also generates standard rule tables from a feature class listing."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
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

    /// TOML file with batch job and conversion defaults.
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Convert a rule table into a batch job file.
    Convert(ConvertArgs),

    /// Parse and validate a rule table without writing anything.
    Check(CheckArgs),

    /// List the supported check kinds.
    Kinds,

    /// Write standard rule tables for a feature class listing.
    Generate(GenerateArgs),
}

#[derive(Parser)]
pub struct ConvertArgs {
    /// Rule table to convert.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Geodatabase the checks run against.
    #[arg(long = "database", value_name = "PATH")]
    pub database: Option<String>,

    /// Output file (default: <INPUT> with extension .rbj).
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Batch job name (default: output file name).
    #[arg(long = "name", value_name = "NAME")]
    pub name: Option<String>,

    /// Pad or truncate rows whose width differs from the header.
    #[arg(long = "lenient-columns")]
    pub lenient_columns: bool,

    /// Reject specials keys the check kind does not use.
    #[arg(long = "strict-specials")]
    pub strict_specials: bool,

    /// Convert and report without writing the output file.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct CheckArgs {
    /// Rule table to check.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Print the parsed document as JSON.
    #[arg(long = "json")]
    pub json: bool,

    /// Pad or truncate rows whose width differs from the header.
    #[arg(long = "lenient-columns")]
    pub lenient_columns: bool,

    /// Reject specials keys the check kind does not use.
    #[arg(long = "strict-specials")]
    pub strict_specials: bool,
}

#[derive(Parser)]
pub struct GenerateArgs {
    /// Feature class listing (name;shape;dataset).
    #[arg(value_name = "FEATURE_CLASSES")]
    pub feature_classes: PathBuf,

    /// Directory for the generated tables (default: current directory).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Also convert each generated table into a batch job.
    #[arg(long = "convert")]
    pub convert: bool,

    /// Geodatabase for converted batch jobs.
    #[arg(long = "database", value_name = "PATH")]
    pub database: Option<String>,
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
