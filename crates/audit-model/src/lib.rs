pub mod cell_error;
pub mod enums;
pub mod error;
pub mod ir;
pub mod records;
pub mod submission;

pub use cell_error::{CellError, ErrorDetail};
pub use enums::{AuditPeriod, AuditType, DeMinimisRate, MIGRATION_SENTINEL, SectionName, YesNo};
pub use error::{ModelError, Result};
pub use ir::{
    CellRef, CellValue, NamedRange, Sheet, WorkbookIr, column_index, column_letters, parse_date,
};
pub use records::SectionRecord;
pub use submission::{Submission, SubmissionMetadata, SubmissionSections, ValidatorKey};
