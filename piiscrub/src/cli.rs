//! This file defines the command-line interface (CLI) for piiscrub,
//! including all available commands and their arguments.
//! License: MIT OR Apache-2.0

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "piiscrub",
    author = "Relay",
    version = env!("CARGO_PKG_VERSION"),
    about = "Find and mask personal data in unstructured text",
    long_about = "piiscrub detects personally identifying information (names, emails, phone numbers, dates of birth, national IDs) in logs, key-value dumps, CSV fragments and free text, and masks it in place without needing a schema for the input. Names are confirmed against a dictionary supplied with --names.",
    arg_required_else_help = true,
)]
pub struct Cli {
    #[arg(long, short = 'q', global = true, help = "Suppress all informational and debug messages.")]
    pub quiet: bool,

    #[arg(long, short = 'd', global = true, conflicts_with = "quiet", help = "Enable debug logging.")]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// All available commands for the `piiscrub` CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Masks personal data in a file or stdin.
    #[command(about = "Masks personal data in a file or stdin.")]
    Sanitize(SanitizeCommand),

    /// Reports personal data without printing the masked text.
    #[command(about = "Reports detections in one or more inputs without printing the masked text.")]
    Scan(ScanCommand),
}

/// Options shared by every command that builds an engine.
#[derive(Args, Debug, Clone)]
pub struct EngineArgs {
    /// Name corpus: one name per line, `#` comments allowed.
    #[arg(long = "names", short = 'n', value_name = "FILE", env = "PIISCRUB_NAMES", help = "Name corpus used to confirm name candidates.")]
    pub names: Option<PathBuf>,

    #[arg(long = "config", value_name = "FILE", help = "Path to a custom rule configuration file (YAML), merged over the defaults.")]
    pub config: Option<PathBuf>,

    #[arg(long, short = 'e', value_delimiter = ',', help = "Enable these kinds, including opt-in ones (comma-separated).")]
    pub enable: Vec<String>,

    #[arg(long, short = 'x', value_delimiter = ',', help = "Disable these kinds (comma-separated).")]
    pub disable: Vec<String>,
}

/// Arguments for the `sanitize` command.
#[derive(Parser, Debug)]
pub struct SanitizeCommand {
    #[command(flatten)]
    pub engine: EngineArgs,

    #[arg(long, short = 'i', value_name = "FILE", help = "Read input from a specified file instead of stdin.")]
    pub input_file: Option<PathBuf>,

    #[arg(long, short = 'o', value_name = "FILE", help = "Write output to a specified file instead of stdout.")]
    pub output: Option<PathBuf>,

    #[arg(long = "mask-char", value_name = "CHAR", help = "Character used to mask detections (default '*').")]
    pub mask_char: Option<char>,

    #[arg(long, conflicts_with = "mask_char", help = "Replace detections with their kind label, e.g. [EMAIL].")]
    pub label: bool,

    #[arg(long = "line-buffered", conflicts_with = "input_file", help = "Process stdin line by line (useful for streaming data from pipes).")]
    pub line_buffered: bool,

    #[arg(long = "no-redaction-summary", help = "Suppress the redaction summary.")]
    pub no_summary: bool,
}

/// Arguments for the `scan` command.
#[derive(Parser, Debug)]
pub struct ScanCommand {
    #[command(flatten)]
    pub engine: EngineArgs,

    #[arg(long = "input-file", short = 'i', value_name = "FILE", help = "Input file; repeat to scan several files in parallel (reads stdin if omitted).")]
    pub input_files: Vec<PathBuf>,

    #[arg(long = "fail-over-threshold", value_name = "N", help = "Exit with a non-zero code if the total number of detections exceeds this threshold.")]
    pub fail_over_threshold: Option<usize>,

    #[arg(long = "json-file", value_name = "FILE", help = "Export the detection report to a JSON file.")]
    pub json_file: Option<PathBuf>,

    #[arg(long = "json-stdout", conflicts_with = "json_file", help = "Print the detection report to stdout as JSON.")]
    pub json_stdout: bool,
}
