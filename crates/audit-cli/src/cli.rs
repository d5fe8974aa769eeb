//! Command line definitions for `single-audit`.

use std::path::PathBuf;

use audit_model::SectionName;
use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "single-audit",
    version,
    about = "Single audit intake - validate section workbooks and assign agencies",
    long_about = "Take in single audit section workbooks, check every cell against the \
                  reporting rules, cross-validate whole submissions, and assign the \
                  cognizant or oversight agency from the Federal Awards."
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

    /// Log output format.
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

    /// Intake configuration overrides (TOML).
    #[arg(long = "config", value_name = "TOML", global = true)]
    pub config: Option<PathBuf>,

    /// Reference-data directory with a pinned manifest (program catalog,
    /// baseline history).
    #[arg(long = "standards", value_name = "DIR", global = true)]
    pub standards: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Take in one section workbook and print its canonical JSON.
    Extract(ExtractArgs),

    /// Run every cross-section validator over a submission document.
    CrossValidate(CrossValidateArgs),

    /// Assign the cognizant or oversight agency for a Federal Awards record.
    AssignAgency(AssignAgencyArgs),

    /// Rebuild the cognizant baseline from historical award rows.
    RebuildBaseline(RebuildBaselineArgs),
}

#[derive(Parser)]
pub struct ExtractArgs {
    /// Workbook to read (.xlsx, or .json IR for migrated data).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Section the workbook is expected to hold (e.g. federal_awards).
    #[arg(long = "section", value_name = "SECTION")]
    pub section: SectionName,

    /// UEI the workbook must declare.
    #[arg(long = "uei", value_name = "UEI")]
    pub uei: Option<String>,

    /// Accept the historical migration sentinel in Y/N cells.
    #[arg(long = "migration")]
    pub migration: bool,

    /// Write canonical JSON here instead of stdout.
    #[arg(long = "out", value_name = "FILE")]
    pub out: Option<PathBuf>,

    /// Write the full cell error list, with help links, as JSON.
    #[arg(long = "errors-json", value_name = "FILE")]
    pub errors_json: Option<PathBuf>,
}

#[derive(Parser)]
pub struct CrossValidateArgs {
    /// Submission document: sections, metadata and waivers.
    #[arg(value_name = "SUBMISSION")]
    pub submission: PathBuf,

    /// Earlier submissions of the auditee (JSON list).
    #[arg(long = "history", value_name = "FILE")]
    pub history: Option<PathBuf>,
}

#[derive(Parser)]
pub struct AssignAgencyArgs {
    /// Canonical Federal Awards record (JSON).
    #[arg(value_name = "FEDERAL_AWARDS")]
    pub awards: PathBuf,

    /// Auditee EIN used for the baseline lookup.
    #[arg(long = "ein", value_name = "EIN")]
    pub ein: String,

    /// Cognizant baseline CSV.
    #[arg(long = "baseline", value_name = "CSV")]
    pub baseline: Option<PathBuf>,
}

#[derive(Parser)]
pub struct RebuildBaselineArgs {
    /// Historical award rows (CSV). Defaults to the reference data's
    /// baseline history.
    #[arg(value_name = "HISTORY")]
    pub history: Option<PathBuf>,

    /// Where to write the rebuilt baseline CSV.
    #[arg(long = "out", value_name = "CSV")]
    pub out: PathBuf,
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
