//! Cross-validation of a whole submission.
//!
//! Each validator looks at the full normalized submission and returns plain
//! messages. Validators are independent of each other: the engine runs every
//! registered validator and concatenates the results. Validators named in the
//! submission's waiver set are not invoked.

mod history;
mod identity;
mod policy;
mod references;

pub use history::{HistoricalSubmission, InMemoryHistory, SubmissionHistory};

use std::sync::OnceLock;

use audit_model::{Submission, ValidatorKey};
use audit_standards::Thresholds;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info_span, warn};

/// Everything a cross-validator may look at.
#[derive(Clone, Copy)]
pub struct CrossContext<'a> {
    pub submission: &'a Submission,
    pub history: &'a dyn SubmissionHistory,
    pub thresholds: &'a Thresholds,
}

/// One cross-validation failure, tagged with the validator that raised it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{message}")]
pub struct CrossValidationError {
    pub validator: ValidatorKey,
    pub message: String,
}

/// A submission-wide rule.
pub trait CrossValidator: Send + Sync {
    /// Stable key, also used in waiver sets.
    fn key(&self) -> ValidatorKey;

    fn description(&self) -> &'static str {
        "Cross-validator"
    }

    /// Messages for every violation found; empty when the rule holds.
    fn validate(&self, ctx: &CrossContext<'_>) -> Vec<String>;
}

/// Ordered collection of cross-validators.
#[derive(Default)]
pub struct ValidatorRegistry {
    validators: Vec<Box<dyn CrossValidator>>,
}

impl ValidatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a validator, replacing any with the same key.
    pub fn register(&mut self, validator: Box<dyn CrossValidator>) {
        let key = validator.key();
        match self.validators.iter_mut().find(|v| v.key() == key) {
            Some(slot) => *slot = validator,
            None => self.validators.push(validator),
        }
    }

    pub fn get(&self, key: ValidatorKey) -> Option<&dyn CrossValidator> {
        self.validators
            .iter()
            .find(|validator| validator.key() == key)
            .map(|validator| validator.as_ref())
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = ValidatorKey> + '_ {
        self.validators.iter().map(|validator| validator.key())
    }

    /// Run every validator that is not waived and collect all errors.
    pub fn run(&self, ctx: &CrossContext<'_>) -> Vec<CrossValidationError> {
        let mut errors = Vec::new();
        for validator in &self.validators {
            let key = validator.key();
            if ctx.submission.is_waived(key) {
                warn!(
                    validator = %key,
                    report_id = %ctx.submission.metadata.report_id,
                    "cross-validator waived"
                );
                continue;
            }
            let messages = validator.validate(ctx);
            debug!(validator = %key, errors = messages.len(), "cross-validator finished");
            errors.extend(
                messages
                    .into_iter()
                    .map(|message| CrossValidationError { validator: key, message }),
            );
        }
        errors
    }
}

static DEFAULT_REGISTRY: OnceLock<ValidatorRegistry> = OnceLock::new();

/// The registry with every built-in validator, built on first use.
pub fn default_registry() -> &'static ValidatorRegistry {
    DEFAULT_REGISTRY.get_or_init(build_default_registry)
}

fn build_default_registry() -> ValidatorRegistry {
    use ValidatorKey as K;
    let mut registry = ValidatorRegistry::new();
    let builtin: [(ValidatorKey, &'static str, ValidateFn); 16] = [
        (K::UeiConsistency, "every section declares the same UEI", identity::uei_consistency),
        (
            K::AdditionalUeis,
            "additional UEIs match the multiple-UEI answer",
            identity::additional_ueis,
        ),
        (
            K::AdditionalEins,
            "additional EINs match the multiple-EIN answer",
            identity::additional_eins,
        ),
        (
            K::AwardReferenceDeclaration,
            "findings cite declared awards",
            references::award_reference_declaration,
        ),
        (
            K::FindingReferenceUniqueness,
            "award and reference number pairs are unique",
            references::finding_reference_uniqueness,
        ),
        (
            K::FindingsCountConsistency,
            "declared finding counts match the findings",
            references::findings_count_consistency,
        ),
        (
            K::PriorReferences,
            "prior references resolve to earlier findings",
            references::prior_references,
        ),
        (
            K::DuplicateSubmission,
            "one disseminated report per audit year",
            policy::duplicate_submission,
        ),
        (
            K::ExpenditureThreshold,
            "expenditure meets the single audit threshold",
            policy::expenditure_threshold,
        ),
        (K::CertifyingContacts, "certifying contacts differ", policy::certifying_contacts),
        (K::BiennialLowRisk, "biennial audits are not low-risk", policy::biennial_low_risk),
        (
            K::CorrectiveActionPlanReferences,
            "findings and corrective action plans agree",
            references::corrective_action_plan_references,
        ),
        (
            K::FindingsTextReferences,
            "findings and finding texts agree",
            references::findings_text_references,
        ),
        (
            K::SecondaryAuditors,
            "secondary auditors match the answer given",
            identity::secondary_auditors,
        ),
        (K::SectionCompleteness, "required sections are present", identity::section_completeness),
        (
            K::GeneralInformation,
            "general information is well formed",
            identity::general_information,
        ),
    ];
    for (key, description, validate) in builtin {
        registry.register(Box::new(FunctionValidator {
            key,
            description,
            validate,
        }));
    }
    registry
}

/// Run the default registry over a submission.
pub fn cross_validate(
    submission: &Submission,
    history: &dyn SubmissionHistory,
    thresholds: &Thresholds,
) -> Vec<CrossValidationError> {
    let span = info_span!(
        "cross_validate",
        report_id = %submission.metadata.report_id
    );
    let _guard = span.enter();
    let ctx = CrossContext {
        submission,
        history,
        thresholds,
    };
    default_registry().run(&ctx)
}

type ValidateFn = fn(&CrossContext<'_>) -> Vec<String>;

/// Adapts a plain function to [`CrossValidator`].
struct FunctionValidator {
    key: ValidatorKey,
    description: &'static str,
    validate: ValidateFn,
}

impl CrossValidator for FunctionValidator {
    fn key(&self) -> ValidatorKey {
        self.key
    }

    fn description(&self) -> &'static str {
        self.description
    }

    fn validate(&self, ctx: &CrossContext<'_>) -> Vec<String> {
        (self.validate)(ctx)
    }
}

/// `A`, `A and B`, `A, B, and C`.
pub(crate) fn join_list<S: AsRef<str>>(items: &[S]) -> String {
    match items {
        [] => String::new(),
        [one] => one.as_ref().to_string(),
        [first, second] => format!("{} and {}", first.as_ref(), second.as_ref()),
        [rest @ .., last] => {
            let head: Vec<&str> = rest.iter().map(AsRef::as_ref).collect();
            format!("{}, and {}", head.join(", "), last.as_ref())
        }
    }
}
