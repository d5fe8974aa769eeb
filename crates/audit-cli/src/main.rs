//! Single audit intake CLI.

use std::io::{self, IsTerminal};

use anyhow::{Context, Result};
use audit_cli::logging::{LogConfig, LogFormat, init_logging};
use audit_standards::{IntakeConfig, ReferenceData};
use clap::{ColorChoice, Parser};
use tracing::level_filters::LevelFilter;
use tracing::{error, info};

mod cli;
mod commands;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{
    Verdict, run_assign_agency, run_cross_validate, run_extract, run_rebuild_baseline,
};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match run(&cli) {
        Ok(Verdict::Passed) => 0,
        Ok(Verdict::Failed) => 1,
        Err(err) => {
            error!("{err:#}");
            eprintln!("error: {err:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: &Cli) -> Result<Verdict> {
    let reference = cli
        .standards
        .as_deref()
        .map(ReferenceData::verify_and_load)
        .transpose()
        .context("load reference data")?;
    let mut config = match &cli.config {
        Some(path) => IntakeConfig::load(path)
            .with_context(|| format!("load config {}", path.display()))?,
        None => IntakeConfig::default(),
    };
    if let Some(reference) = &reference {
        info!(
            root = %reference.root.display(),
            programs = reference.program_catalog.len(),
            "reference data verified"
        );
        config = config.with_program_catalog(reference.program_catalog.clone());
    }

    match &cli.command {
        Command::Extract(args) => run_extract(args, &config),
        Command::CrossValidate(args) => run_cross_validate(args, &config),
        Command::AssignAgency(args) => run_assign_agency(args, &config),
        Command::RebuildBaseline(args) => {
            run_rebuild_baseline(args, &config, reference.as_ref())
        }
    }
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
