//! Canonical section records.
//!
//! Each workbook section maps into one of these typed records. Construction
//! from a mapped JSON document goes through serde, so a document that does not
//! fit the section's schema is rejected at the boundary.

mod awards;
mod entities;
mod findings;
mod general;

pub use awards::{
    Cluster, DirectOrIndirectAward, FederalAward, FederalAwards, LoanOrLoanGuarantee,
    OTHER_CLUSTER, PassthroughEntity, Program, STATE_CLUSTER, Subrecipients,
};
pub use entities::{
    AdditionalEin, AdditionalEins, AdditionalUei, AdditionalUeis, SecondaryAuditor,
    SecondaryAuditors,
};
pub use findings::{
    CorrectiveActionEntry, CorrectiveActionPlan, FindingDetail, FindingEntry, FindingProgram,
    FindingTextEntry, FindingsText, FindingsUniformGuidance, NOT_APPLICABLE,
};
pub use general::{GeneralInformation, NoteEntry, NotesToSefa};

use serde::Serialize;
use serde_json::Value;

use crate::enums::SectionName;
use crate::error::{ModelError, Result};

/// A canonical record for any section.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SectionRecord {
    GeneralInformation(GeneralInformation),
    FederalAwards(FederalAwards),
    FindingsUniformGuidance(FindingsUniformGuidance),
    FindingsText(FindingsText),
    CorrectiveActionPlan(CorrectiveActionPlan),
    AdditionalUeis(AdditionalUeis),
    AdditionalEins(AdditionalEins),
    SecondaryAuditors(SecondaryAuditors),
    NotesToSefa(NotesToSefa),
}

fn schema<T: serde::de::DeserializeOwned>(section: SectionName, value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|source| ModelError::Schema {
        section: section.as_str(),
        source,
    })
}

impl SectionRecord {
    /// Build the typed record for `section` from a mapped JSON document.
    pub fn from_json(section: SectionName, value: Value) -> Result<Self> {
        Ok(match section {
            SectionName::GeneralInformation => {
                SectionRecord::GeneralInformation(schema(section, value)?)
            }
            SectionName::FederalAwards => SectionRecord::FederalAwards(schema(section, value)?),
            SectionName::FindingsUniformGuidance => {
                SectionRecord::FindingsUniformGuidance(schema(section, value)?)
            }
            SectionName::FindingsText => SectionRecord::FindingsText(schema(section, value)?),
            SectionName::CorrectiveActionPlan => {
                SectionRecord::CorrectiveActionPlan(schema(section, value)?)
            }
            SectionName::AdditionalUeis => SectionRecord::AdditionalUeis(schema(section, value)?),
            SectionName::AdditionalEins => SectionRecord::AdditionalEins(schema(section, value)?),
            SectionName::SecondaryAuditors => {
                SectionRecord::SecondaryAuditors(schema(section, value)?)
            }
            SectionName::NotesToSefa => SectionRecord::NotesToSefa(schema(section, value)?),
        })
    }

    pub fn section(&self) -> SectionName {
        match self {
            SectionRecord::GeneralInformation(_) => SectionName::GeneralInformation,
            SectionRecord::FederalAwards(_) => SectionName::FederalAwards,
            SectionRecord::FindingsUniformGuidance(_) => SectionName::FindingsUniformGuidance,
            SectionRecord::FindingsText(_) => SectionName::FindingsText,
            SectionRecord::CorrectiveActionPlan(_) => SectionName::CorrectiveActionPlan,
            SectionRecord::AdditionalUeis(_) => SectionName::AdditionalUeis,
            SectionRecord::AdditionalEins(_) => SectionName::AdditionalEins,
            SectionRecord::SecondaryAuditors(_) => SectionName::SecondaryAuditors,
            SectionRecord::NotesToSefa(_) => SectionName::NotesToSefa,
        }
    }

    /// UEI the section declares for its auditee.
    pub fn auditee_uei(&self) -> &str {
        match self {
            SectionRecord::GeneralInformation(record) => &record.auditee_uei,
            SectionRecord::FederalAwards(record) => &record.auditee_uei,
            SectionRecord::FindingsUniformGuidance(record) => &record.auditee_uei,
            SectionRecord::FindingsText(record) => &record.auditee_uei,
            SectionRecord::CorrectiveActionPlan(record) => &record.auditee_uei,
            SectionRecord::AdditionalUeis(record) => &record.auditee_uei,
            SectionRecord::AdditionalEins(record) => &record.auditee_uei,
            SectionRecord::SecondaryAuditors(record) => &record.auditee_uei,
            SectionRecord::NotesToSefa(record) => &record.auditee_uei,
        }
    }

    /// Canonical JSON text. Field order is fixed by the record types, so the
    /// same record always renders to the same bytes.
    pub fn to_canonical_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
