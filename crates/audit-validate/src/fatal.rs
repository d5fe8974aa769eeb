//! Fatal pre-checks.
//!
//! These run first and stop at the first failure: there is no point checking
//! dozens of fields in a workbook that is the wrong one.

use audit_model::SectionName;
use audit_standards::{AUDITEE_UEI_RANGE, SECTION_NAME_RANGE, TemplateVersion, VERSION_RANGE};
use tracing::warn;

use crate::context::CheckContext;
use crate::error::FatalError;

pub fn run_fatal(ctx: &CheckContext<'_>, expected_uei: Option<&str>) -> Result<(), FatalError> {
    let result = section_identity(ctx)
        .and_then(|()| template_version(ctx))
        .and_then(|()| auditee_uei(ctx, expected_uei))
        .and_then(|()| required_ranges(ctx));
    if let Err(error) = &result {
        warn!(section = %ctx.template.section, %error, "fatal workbook check failed");
    }
    result
}

fn section_identity(ctx: &CheckContext<'_>) -> Result<(), FatalError> {
    if ctx.ir.range(SECTION_NAME_RANGE).is_none() {
        return Err(FatalError::UnknownWorkbook {
            range: SECTION_NAME_RANGE,
        });
    }
    let label = ctx.field(SECTION_NAME_RANGE);
    let expected = ctx.template.section;
    match SectionName::from_workbook_label(&label) {
        Some(found) if found == expected => Ok(()),
        Some(found) => Err(FatalError::WrongSection {
            expected: expected.display_name().to_string(),
            found: found.display_name().to_string(),
        }),
        None => Err(FatalError::WrongSection {
            expected: expected.display_name().to_string(),
            found: if label.is_empty() {
                "an unnamed section".to_string()
            } else {
                label
            },
        }),
    }
}

fn template_version(ctx: &CheckContext<'_>) -> Result<(), FatalError> {
    let minimum = ctx.config.minimum_template_version;
    let raw = ctx.field(VERSION_RANGE);
    match raw.parse::<TemplateVersion>() {
        Ok(found) if found >= minimum => Ok(()),
        _ => Err(FatalError::OutdatedTemplate {
            found: if raw.is_empty() {
                "(none)".to_string()
            } else {
                raw
            },
            minimum,
        }),
    }
}

fn auditee_uei(ctx: &CheckContext<'_>, expected: Option<&str>) -> Result<(), FatalError> {
    let found = ctx.field(AUDITEE_UEI_RANGE);
    if found.is_empty() {
        return Err(FatalError::MissingRequiredField {
            range: AUDITEE_UEI_RANGE.to_string(),
        });
    }
    match expected {
        Some(expected) if !expected.trim().eq_ignore_ascii_case(&found) => {
            Err(FatalError::UeiMismatch {
                expected: expected.trim().to_string(),
                found,
            })
        }
        _ => Ok(()),
    }
}

fn required_ranges(ctx: &CheckContext<'_>) -> Result<(), FatalError> {
    let template = ctx.template;
    template
        .fields
        .iter()
        .chain(template.columns.iter())
        .filter(|mapping| mapping.required)
        .find(|mapping| ctx.ir.range(mapping.range).is_none())
        .map_or(Ok(()), |missing| {
            Err(FatalError::MissingRequiredField {
                range: missing.range.to_string(),
            })
        })
}
