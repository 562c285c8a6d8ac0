//! CLI argument definitions for `drug-overlap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use overlap_match::AssignmentPolicy;

#[derive(Parser)]
#[command(
    name = "drug-overlap",
    version,
    about = "Find drugs that appear in both a domestic registry and an orphan-drug registry",
    long_about = "Find drugs that appear in both a domestic registry and an orphan-drug registry.\n\n\
                  Names are compared salt-aware and combination-aware; every match is\n\
                  verified against the two indications. `--90` and a bare `90` are\n\
                  shorthand for `--threshold 90`."
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
}

#[derive(Subcommand)]
pub enum Command {
    /// Match the two registries and write an overlap report.
    Run(RunArgs),

    /// Evaluate precision and recall against known pairs at several thresholds.
    Sweep(SweepArgs),
}

/// Registry inputs shared by every subcommand.
#[derive(clap::Args)]
pub struct RegistryArgs {
    /// Domestic registry CSV (Drug Name, Indication, Date of Approval).
    #[arg(long = "source", value_name = "CSV")]
    pub source: PathBuf,

    /// Orphan-drug registry CSV (Generic Name, Trade Name, Approved Labeled
    /// Indication, Marketing Approval Date).
    #[arg(long = "target", value_name = "CSV")]
    pub target: PathBuf,
}

#[derive(Parser)]
pub struct RunArgs {
    #[command(flatten)]
    pub registries: RegistryArgs,

    /// Base similarity threshold; every other gate derives from it.
    #[arg(
        short = 't',
        long = "threshold",
        default_value_t = 85,
        value_parser = clap::value_parser!(u8).range(0..=100)
    )]
    pub threshold: u8,

    /// Report file suffix (default: the threshold).
    #[arg(short = 'o', long = "output-tag", value_name = "TAG")]
    pub output_tag: Option<String>,

    /// Directory for report files.
    #[arg(long = "output-dir", value_name = "DIR", default_value = "output")]
    pub output_dir: PathBuf,

    /// Report format to write.
    #[arg(long = "format", value_enum, default_value = "csv")]
    pub format: OutputFormatArg,

    /// How competing claims on the same target are resolved.
    #[arg(long = "assignment", value_enum, default_value = "first-claim")]
    pub assignment: AssignmentArg,
}

#[derive(Parser)]
pub struct SweepArgs {
    #[command(flatten)]
    pub registries: RegistryArgs,

    /// Known true pairs CSV (Source Name, Target Generic Name).
    #[arg(long = "gold", value_name = "CSV")]
    pub gold: PathBuf,

    /// Base thresholds to evaluate.
    #[arg(
        long = "thresholds",
        value_delimiter = ',',
        default_value = "75,85,90,95",
        value_parser = clap::value_parser!(u8).range(0..=100)
    )]
    pub thresholds: Vec<u8>,

    /// How competing claims on the same target are resolved.
    #[arg(long = "assignment", value_enum, default_value = "first-claim")]
    pub assignment: AssignmentArg,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum)]
pub enum OutputFormatArg {
    Csv,
    Json,
    Both,
}

impl OutputFormatArg {
    pub fn writes_csv(self) -> bool {
        matches!(self, Self::Csv | Self::Both)
    }

    pub fn writes_json(self) -> bool {
        matches!(self, Self::Json | Self::Both)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum)]
pub enum AssignmentArg {
    FirstClaim,
    HighestScore,
}

impl From<AssignmentArg> for AssignmentPolicy {
    fn from(arg: AssignmentArg) -> Self {
        match arg {
            AssignmentArg::FirstClaim => Self::FirstClaim,
            AssignmentArg::HighestScore => Self::HighestScore,
        }
    }
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
