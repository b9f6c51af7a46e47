//! CLI argument definitions for the decomp project tool.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use decomp_model::Section;

#[derive(Parser)]
#[command(
    name = "decomp",
    version,
    about = "Load, edit and save the data of a decompilation project",
    long_about = "Load, edit and save the data of a decompilation project.\n\n\
                  The project root is taken from the ROOT argument, then from\n\
                  DECOMP_PROJECT_DIR, then the current directory."
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
    /// Load the project and print entity counts per database.
    Summary(ProjectArgs),

    /// Load the project and write every database back.
    Resave(ProjectArgs),

    /// Rename an event object and update its symbol across the sources.
    RenameObject(RenameObjectArgs),

    /// Regenerate a trainer's party levels from a difficulty segment.
    LevelTrainer(LevelTrainerArgs),
}

#[derive(Args)]
pub struct ProjectArgs {
    /// Project root (default: $DECOMP_PROJECT_DIR, then the current directory).
    #[arg(value_name = "ROOT")]
    pub root: Option<PathBuf>,
}

#[derive(Args)]
pub struct RenameObjectArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Current event object identifier.
    #[arg(long = "from", value_name = "IDENTIFIER")]
    pub from: String,

    /// New event object identifier.
    #[arg(long = "to", value_name = "IDENTIFIER")]
    pub to: String,
}

#[derive(Args)]
pub struct LevelTrainerArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Trainer identifier.
    #[arg(long = "trainer", value_name = "IDENTIFIER")]
    pub trainer: String,

    /// Index of the difficulty game segment.
    #[arg(long = "segment", value_name = "INDEX")]
    pub segment: usize,

    /// Third of the segment's level range to draw from.
    #[arg(long = "section", value_enum, default_value = "middle")]
    pub section: SectionArg,

    /// Seed for reproducible levels.
    #[arg(long = "seed")]
    pub seed: Option<u64>,
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

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SectionArg {
    Early,
    Middle,
    Late,
}

impl From<SectionArg> for Section {
    fn from(value: SectionArg) -> Self {
        match value {
            SectionArg::Early => Section::Early,
            SectionArg::Middle => Section::Middle,
            SectionArg::Late => Section::Late,
        }
    }
}
