//! CLI argument definitions for `formnav`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "formnav",
    version,
    about = "Walk a form definition screen by screen",
    long_about = "Walk a form definition screen by screen.\n\n\
                  Groups marked field-list are shown as one screen, repeats end in an\n\
                  \"add another?\" prompt, and answers are validated before moving on."
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

    /// Include answer values in log output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// List every screen a forward walk would show.
    Outline(OutlineArgs),

    /// Fill a form from a script of answers and print the submission payload.
    Fill(FillArgs),
}

#[derive(Parser)]
pub struct OutlineArgs {
    /// Path to the JSON form definition.
    #[arg(value_name = "FORM")]
    pub form: PathBuf,
}

#[derive(Parser)]
pub struct FillArgs {
    /// Path to the JSON form definition.
    #[arg(value_name = "FORM")]
    pub form: PathBuf,

    /// JSON answer script: `{"values": {ref: value}, "repeats": {ref: count}}`.
    #[arg(long = "answers", value_name = "FILE")]
    pub answers: PathBuf,

    /// Save answers without running constraint checks while moving forward.
    ///
    /// The final whole-form validation still runs.
    #[arg(long = "skip-constraints")]
    pub skip_constraints: bool,

    /// Mark the form completed when it validates.
    #[arg(long = "mark-completed")]
    pub mark_completed: bool,

    /// Write the payload here instead of stdout.
    #[arg(long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,
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
