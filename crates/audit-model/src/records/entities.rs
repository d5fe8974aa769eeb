use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdditionalUeis {
    pub auditee_uei: String,
    #[serde(default)]
    pub additional_ueis_entries: Vec<AdditionalUei>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdditionalUei {
    pub additional_uei: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdditionalEins {
    pub auditee_uei: String,
    #[serde(default)]
    pub additional_eins_entries: Vec<AdditionalEin>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdditionalEin {
    pub additional_ein: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecondaryAuditors {
    pub auditee_uei: String,
    #[serde(default)]
    pub secondary_auditors_entries: Vec<SecondaryAuditor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecondaryAuditor {
    pub secondary_auditor_name: String,
    pub secondary_auditor_ein: String,
    pub secondary_auditor_address_street: String,
    pub secondary_auditor_address_city: String,
    pub secondary_auditor_address_state: String,
    pub secondary_auditor_address_zipcode: String,
    pub secondary_auditor_contact_name: String,
    pub secondary_auditor_contact_title: String,
    pub secondary_auditor_contact_phone: String,
    pub secondary_auditor_contact_email: String,
}
