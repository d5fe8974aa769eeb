//! Subcommand implementations.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use audit_cli::summary::{agency_line, print_cell_errors, print_cross_errors};
use audit_core::{
    BaselineTable, IntakeOptions, assign_agency, build_baseline, extract_file, read_history,
};
use audit_model::Submission;
use audit_model::records::FederalAwards;
use audit_standards::{IntakeConfig, ReferenceData, standards_root};
use audit_validate::{InMemoryHistory, Validated, cross_validate};
use tracing::info;

use crate::cli::{AssignAgencyArgs, CrossValidateArgs, ExtractArgs, RebuildBaselineArgs};

/// Outcome of a command that ran to completion. `Failed` means the input was
/// judged and rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Passed,
    Failed,
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    serde_json::from_reader(file).with_context(|| format!("parse {}", path.display()))
}

pub fn run_extract(args: &ExtractArgs, config: &IntakeConfig) -> Result<Verdict> {
    let mut options = IntakeOptions::new(args.section).migration(args.migration);
    if let Some(uei) = &args.uei {
        options = options.with_expected_uei(uei);
    }
    let outcome = extract_file(&args.file, &options, config)
        .with_context(|| format!("extract {} from {}", args.section, args.file.display()))?;

    match outcome {
        Validated::Accepted(record) => {
            let json = record
                .to_canonical_json()
                .context("serialize canonical record")?;
            match &args.out {
                Some(path) => {
                    std::fs::write(path, json)
                        .with_context(|| format!("write {}", path.display()))?;
                    info!(path = %path.display(), "canonical record written");
                }
                None => println!("{json}"),
            }
            Ok(Verdict::Passed)
        }
        Validated::Rejected(errors) => {
            print_cell_errors(&errors);
            if let Some(path) = &args.errors_json {
                let json =
                    serde_json::to_string_pretty(&errors).context("serialize cell errors")?;
                std::fs::write(path, json)
                    .with_context(|| format!("write {}", path.display()))?;
            }
            Ok(Verdict::Failed)
        }
    }
}

pub fn run_cross_validate(args: &CrossValidateArgs, config: &IntakeConfig) -> Result<Verdict> {
    let submission: Submission = read_json(&args.submission)?;
    let history: InMemoryHistory = match &args.history {
        Some(path) => read_json(path)?,
        None => InMemoryHistory::default(),
    };
    let errors = cross_validate(&submission, &history, &config.thresholds);
    print_cross_errors(&errors);
    Ok(if errors.is_empty() {
        Verdict::Passed
    } else {
        Verdict::Failed
    })
}

pub fn run_assign_agency(args: &AssignAgencyArgs, config: &IntakeConfig) -> Result<Verdict> {
    let awards: FederalAwards = read_json(&args.awards)?;
    let year = config.thresholds.baseline_year;
    let baseline = match &args.baseline {
        Some(path) => BaselineTable::load(year, path)
            .with_context(|| format!("load baseline {}", path.display()))?,
        None => BaselineTable::empty(year),
    };
    let assignment = assign_agency(&awards, &args.ein, &baseline, &config.thresholds)?;
    println!(
        "{}",
        serde_json::to_string_pretty(&assignment).context("serialize assignment")?
    );
    eprintln!("{}", agency_line(&assignment));
    Ok(Verdict::Passed)
}

fn history_from(reference: &ReferenceData) -> Result<PathBuf> {
    match &reference.baseline_history {
        Some(path) => Ok(path.clone()),
        None => bail!(
            "no history file given and {} lists no baseline history",
            reference.root.display()
        ),
    }
}

pub fn run_rebuild_baseline(
    args: &RebuildBaselineArgs,
    config: &IntakeConfig,
    reference: Option<&ReferenceData>,
) -> Result<Verdict> {
    let source = match (&args.history, reference) {
        (Some(path), _) => path.clone(),
        (None, Some(reference)) => history_from(reference)?,
        (None, None) => {
            let root = standards_root();
            let reference = ReferenceData::verify_and_load(&root)
                .with_context(|| format!("load reference data from {}", root.display()))?;
            history_from(&reference)?
        }
    };
    let file = File::open(&source).with_context(|| format!("open {}", source.display()))?;
    let history = read_history(file).with_context(|| format!("read {}", source.display()))?;
    let table = build_baseline(&history, &config.thresholds);
    let csv = table.to_csv().context("serialize baseline")?;
    std::fs::write(&args.out, csv).with_context(|| format!("write {}", args.out.display()))?;
    println!(
        "Baseline {}: {} auditee(s), version {}",
        table.year(),
        table.len(),
        table.version()
    );
    Ok(Verdict::Passed)
}
