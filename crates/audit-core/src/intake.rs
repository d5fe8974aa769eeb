//! Section intake: read, transform, check and map one workbook.

use std::path::Path;

use audit_ingest::read_workbook;
use audit_map::map_section;
use audit_model::{SectionName, SectionRecord, WorkbookIr};
use audit_standards::IntakeConfig;
use audit_transform::TransformPipeline;
use audit_validate::{Validated, check_workbook};
use tracing::{debug, info, info_span, warn};

use crate::error::IntakeError;

/// What the caller knows about the workbook being taken in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeOptions {
    pub section: SectionName,
    /// UEI the workbook must declare, when the submission already has one.
    pub expected_uei: Option<String>,
    /// Migrated data may carry the historical sentinel in Y/N cells.
    pub is_migration: bool,
}

impl IntakeOptions {
    pub fn new(section: SectionName) -> Self {
        Self {
            section,
            expected_uei: None,
            is_migration: false,
        }
    }

    pub fn with_expected_uei(mut self, uei: impl Into<String>) -> Self {
        self.expected_uei = Some(uei.into());
        self
    }

    pub fn migration(mut self, is_migration: bool) -> Self {
        self.is_migration = is_migration;
        self
    }
}

/// Read a workbook file and take it in as one section.
pub fn extract_file(
    path: &Path,
    options: &IntakeOptions,
    config: &IntakeConfig,
) -> Result<Validated<SectionRecord>, IntakeError> {
    let span = info_span!(
        "extract",
        section = %options.section,
        source_file = %path.display()
    );
    let _guard = span.enter();
    let ir = read_workbook(path).inspect_err(|error| warn!(%error, "workbook rejected"))?;
    extract_ir(ir, options, config)
}

/// Take in a workbook that is already in IR form.
///
/// Fatal problems come back as `Err`. Field problems come back as
/// `Validated::Rejected` carrying every cell error found.
pub fn extract_ir(
    ir: WorkbookIr,
    options: &IntakeOptions,
    config: &IntakeConfig,
) -> Result<Validated<SectionRecord>, IntakeError> {
    let span = info_span!("section", section = %options.section);
    let _guard = span.enter();

    let template = config.template(options.section);
    let ir = TransformPipeline::for_section(options.section).run(ir, &template);

    let errors = check_workbook(
        &ir,
        &template,
        config,
        options.expected_uei.as_deref(),
        options.is_migration,
    )
    .inspect_err(|error| warn!(%error, "fatal check failed"))?;
    if !errors.is_empty() {
        info!(errors = errors.len(), "section rejected");
        return Ok(Validated::Rejected(errors));
    }

    let record = map_section(&ir, &template)?;
    debug!(uei = %record.auditee_uei(), "section accepted");
    Ok(Validated::Accepted(record))
}
