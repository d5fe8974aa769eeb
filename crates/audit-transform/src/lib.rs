//! Transform pipeline.
//!
//! Transforms are pure `IR -> IR` functions run after the general group and
//! before any check. They fill defaults and renumber; they never reject data,
//! so checks can assume normalized input.

pub mod columns;
pub mod general;
pub mod sections;

use audit_model::{SectionName, WorkbookIr};
use audit_standards::SectionTemplate;
use tracing::trace;

/// A named pure transform.
#[derive(Clone, Copy)]
pub struct Transform {
    pub name: &'static str,
    pub apply: fn(WorkbookIr, &SectionTemplate) -> WorkbookIr,
}

impl std::fmt::Debug for Transform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transform").field("name", &self.name).finish()
    }
}

const fn step(
    name: &'static str,
    apply: fn(WorkbookIr, &SectionTemplate) -> WorkbookIr,
) -> Transform {
    Transform { name, apply }
}

const GENERAL: &[Transform] = &[
    step("strip_text", general::strip_text),
    step("uppercase_yes_no", general::uppercase_yes_no),
];

fn section_steps(section: SectionName) -> &'static [Transform] {
    const FEDERAL_AWARDS: &[Transform] = &[
        step("default_findings_count", sections::default_findings_count),
        step("default_cluster_name", sections::default_cluster_name),
        step("default_program_total", sections::default_program_total),
        step("default_cluster_total", sections::default_cluster_total),
    ];
    const FINDINGS: &[Transform] = &[step(
        "default_prior_references",
        sections::default_prior_references,
    )];
    const NOTES: &[Transform] = &[step("renumber_notes", sections::renumber_notes)];
    const EINS: &[Transform] = &[step("strip_ein_hyphens", sections::strip_ein_hyphens)];

    match section {
        SectionName::FederalAwards => FEDERAL_AWARDS,
        SectionName::FindingsUniformGuidance => FINDINGS,
        SectionName::NotesToSefa => NOTES,
        SectionName::GeneralInformation
        | SectionName::AdditionalEins
        | SectionName::SecondaryAuditors => EINS,
        SectionName::FindingsText
        | SectionName::CorrectiveActionPlan
        | SectionName::AdditionalUeis => &[],
    }
}

/// Ordered transforms for one section: general first, then the section's own.
#[derive(Debug, Clone)]
pub struct TransformPipeline {
    steps: Vec<Transform>,
}

impl TransformPipeline {
    pub fn for_section(section: SectionName) -> Self {
        let steps = GENERAL
            .iter()
            .chain(section_steps(section))
            .copied()
            .collect();
        Self { steps }
    }

    pub fn step_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.steps.iter().map(|step| step.name)
    }

    pub fn run(&self, ir: WorkbookIr, template: &SectionTemplate) -> WorkbookIr {
        self.steps.iter().fold(ir, |ir, step| {
            trace!(transform = step.name, "applying transform");
            (step.apply)(ir, template)
        })
    }
}

/// Run the full pipeline for the template's section.
pub fn transform(ir: WorkbookIr, template: &SectionTemplate) -> WorkbookIr {
    TransformPipeline::for_section(template.section).run(ir, template)
}
