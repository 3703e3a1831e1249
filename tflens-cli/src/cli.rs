//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Default configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "tflens.toml";

/// Input path that selects standard input.
pub const STDIN_PATH: &str = "-";

/// tflens -- turn terraform plan/apply logs into sectioned JSON.
///
/// Use `tflens <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "tflens", version, about, long_about = None)]
pub struct Cli {
    /// Path to the tflens.toml configuration file.
    ///
    /// When omitted, `tflens.toml` in the working directory is used if present,
    /// otherwise built-in defaults apply.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Report format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table / text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Normalize a log file and split it into plan/apply sections.
    Parse(ParseArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- parse ----

/// Normalize a log file and write the sections as a JSON array.
#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Log file to read, or `-` for standard input.
    pub input: PathBuf,

    /// Where to write the JSON array of sections.
    ///
    /// Defaults to `out.json` next to the input. With `-` as input and no
    /// `--out`, the array is written to standard output.
    #[arg(short = 'o', long = "out")]
    pub out: Option<PathBuf>,

    /// Write compact JSON regardless of `[output] pretty`.
    #[arg(long)]
    pub compact: bool,

    /// Exit with status 1 when any line was skipped.
    #[arg(long)]
    pub fail_on_line_errors: bool,
}

impl ParseArgs {
    /// Whether the input is standard input.
    pub fn reads_stdin(&self) -> bool {
        self.input.as_os_str() == STDIN_PATH
    }

    /// Resolved destination for the sections array, `None` meaning stdout.
    pub fn destination(&self) -> Option<PathBuf> {
        match &self.out {
            Some(path) => Some(path.clone()),
            None if self.reads_stdin() => None,
            None => Some(default_output_for(&self.input)),
        }
    }
}

/// `out.json` in the input's directory.
pub fn default_output_for(input: &Path) -> PathBuf {
    input.with_file_name("out.json")
}

// ---- config ----

/// Manage tflens configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, parser, output).
        #[arg(long)]
        section: Option<String>,
    },
}
