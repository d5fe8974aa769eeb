#![deny(unsafe_code)]

pub mod catalog;
pub mod config;
pub mod error;
pub mod hash;
pub mod manifest;
pub mod paths;
pub mod templates;
pub mod thresholds;

pub use crate::catalog::ProgramCatalog;
pub use crate::config::{DEFAULT_HELP_BASE_URL, IntakeConfig, TemplateVersion};
pub use crate::error::StandardsError;
pub use crate::manifest::ReferenceData;
pub use crate::paths::{STANDARDS_ENV_VAR, standards_root};
pub use crate::templates::{
    AUDITEE_UEI_RANGE, FORM_SHEET, Fanout, RangeMapping, SECTION_NAME_RANGE, SectionTemplate,
    VERSION_RANGE, ValueKind,
};
pub use crate::thresholds::{ExpenditureBracket, Thresholds};
