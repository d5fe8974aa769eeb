//! Section workbook templates.
//!
//! A template tells the pipeline which named ranges a section's workbook
//! carries, where its data rows start, and where each range lands in the
//! canonical record. Named ranges are the stable keys; sheet layout is not.

use audit_model::SectionName;

/// Sheet holding every section's data ranges.
pub const FORM_SHEET: &str = "Form";

/// Reserved coversheet ranges present in every workbook.
pub const SECTION_NAME_RANGE: &str = "section_name";
pub const VERSION_RANGE: &str = "version";
pub const AUDITEE_UEI_RANGE: &str = "auditee_uei";

/// How a cell is coerced when it is mapped into the canonical record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    Integer,
    /// `Y` / `N` (or the migration sentinel), kept as text.
    YesNo,
    /// `Y` / `N` mapped to a boolean.
    Flag,
    /// A calendar date, emitted as ISO `YYYY-MM-DD`.
    Date,
}

/// One named range and its destination in the canonical record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeMapping {
    pub range: &'static str,
    pub path: &'static [&'static str],
    pub kind: ValueKind,
    pub required: bool,
}

impl RangeMapping {
    const fn new(range: &'static str, path: &'static [&'static str], kind: ValueKind) -> Self {
        Self {
            range,
            path,
            kind,
            required: true,
        }
    }

    const fn optional(
        range: &'static str,
        path: &'static [&'static str],
        kind: ValueKind,
    ) -> Self {
        Self {
            range,
            path,
            kind,
            required: false,
        }
    }
}

/// A set of parallel columns whose cells hold delimited lists that expand
/// into several sub-entries of the same row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fanout {
    pub list_path: &'static [&'static str],
    /// `(range, key within each sub-entry)`; the first part drives the count.
    pub parts: &'static [(&'static str, &'static str)],
    pub delimiter: char,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionTemplate {
    pub section: SectionName,
    pub sheet: &'static str,
    /// Last header row; data starts on the next physical row.
    pub header_row: u32,
    /// Scalar ranges copied to fixed paths.
    pub fields: Vec<RangeMapping>,
    /// Array receiving one object per data row, when the section has columns.
    pub entries_path: Option<&'static str>,
    pub columns: Vec<RangeMapping>,
    pub fanouts: Vec<Fanout>,
}

impl SectionTemplate {
    /// Zero-based data row of a physical spreadsheet row, `None` for header rows.
    pub fn row_index(&self, physical_row: u32) -> Option<usize> {
        physical_row
            .checked_sub(self.header_row + 1)
            .map(|offset| offset as usize)
    }

    pub fn column(&self, range: &str) -> Option<&RangeMapping> {
        self.columns.iter().find(|column| column.range == range)
    }

    pub fn field(&self, range: &str) -> Option<&RangeMapping> {
        self.fields.iter().find(|field| field.range == range)
    }

    /// Every column range, including fan-out parts.
    pub fn column_ranges(&self) -> Vec<&'static str> {
        let mut ranges: Vec<&'static str> = self.columns.iter().map(|c| c.range).collect();
        for fanout in &self.fanouts {
            ranges.extend(fanout.parts.iter().map(|(range, _)| *range));
        }
        ranges
    }

    pub fn builtin(section: SectionName) -> Self {
        match section {
            SectionName::GeneralInformation => general_information(),
            SectionName::FederalAwards => federal_awards(),
            SectionName::FindingsUniformGuidance => findings_uniform_guidance(),
            SectionName::FindingsText => findings_text(),
            SectionName::CorrectiveActionPlan => corrective_action_plan(),
            SectionName::AdditionalUeis => additional_ueis(),
            SectionName::AdditionalEins => additional_eins(),
            SectionName::SecondaryAuditors => secondary_auditors(),
            SectionName::NotesToSefa => notes_to_sefa(),
        }
    }
}

fn uei_field() -> RangeMapping {
    RangeMapping::new(AUDITEE_UEI_RANGE, &["auditee_uei"], ValueKind::Text)
}

fn list_template(
    section: SectionName,
    entries_path: &'static str,
    columns: Vec<RangeMapping>,
) -> SectionTemplate {
    SectionTemplate {
        section,
        sheet: FORM_SHEET,
        header_row: 2,
        fields: vec![uei_field()],
        entries_path: Some(entries_path),
        columns,
        fanouts: Vec::new(),
    }
}

fn general_information() -> SectionTemplate {
    use ValueKind::{Date, Flag, Text};
    SectionTemplate {
        section: SectionName::GeneralInformation,
        sheet: FORM_SHEET,
        header_row: 2,
        fields: vec![
            uei_field(),
            RangeMapping::new("auditee_ein", &["auditee_ein"], Text),
            RangeMapping::new("auditee_name", &["auditee_name"], Text),
            RangeMapping::new("fy_start_date", &["fy_start_date"], Date),
            RangeMapping::new("fy_end_date", &["fy_end_date"], Date),
            RangeMapping::new("audit_type", &["audit_type"], Text),
            RangeMapping::new("audit_period_covered", &["audit_period_covered"], Text),
            RangeMapping::new("multiple_ueis_covered", &["multiple_ueis_covered"], Flag),
            RangeMapping::new("multiple_eins_covered", &["multiple_eins_covered"], Flag),
            RangeMapping::new("secondary_auditors_exist", &["secondary_auditors_exist"], Flag),
            RangeMapping::new("is_low_risk_auditee", &["is_low_risk_auditee"], Flag),
        ],
        entries_path: None,
        columns: Vec::new(),
        fanouts: Vec::new(),
    }
}

fn federal_awards() -> SectionTemplate {
    use ValueKind::{Integer, Text, YesNo};
    let mut template = list_template(
        SectionName::FederalAwards,
        "federal_awards",
        vec![
            RangeMapping::new("award_reference", &["award_reference"], Text),
            RangeMapping::new(
                "federal_agency_prefix",
                &["program", "federal_agency_prefix"],
                Text,
            ),
            RangeMapping::new(
                "three_digit_extension",
                &["program", "three_digit_extension"],
                Text,
            ),
            RangeMapping::optional(
                "additional_award_identification",
                &["program", "additional_award_identification"],
                Text,
            ),
            RangeMapping::new("federal_program_name", &["program", "program_name"], Text),
            RangeMapping::new("amount_expended", &["program", "amount_expended"], Integer),
            RangeMapping::new(
                "federal_program_total",
                &["program", "federal_program_total"],
                Integer,
            ),
            RangeMapping::new("cluster_name", &["cluster", "cluster_name"], Text),
            RangeMapping::optional(
                "state_cluster_name",
                &["cluster", "state_cluster_name"],
                Text,
            ),
            RangeMapping::optional(
                "other_cluster_name",
                &["cluster", "other_cluster_name"],
                Text,
            ),
            RangeMapping::new("cluster_total", &["cluster", "cluster_total"], Integer),
            RangeMapping::new(
                "is_guaranteed",
                &["loan_or_loan_guarantee", "is_guaranteed"],
                YesNo,
            ),
            RangeMapping::optional(
                "loan_balance_at_audit_period_end",
                &["loan_or_loan_guarantee", "loan_balance_at_audit_period_end"],
                Text,
            ),
            RangeMapping::new(
                "is_direct",
                &["direct_or_indirect_award", "is_direct"],
                YesNo,
            ),
            RangeMapping::new("is_passed", &["subrecipients", "is_passed"], YesNo),
            RangeMapping::optional(
                "subrecipient_amount",
                &["subrecipients", "subrecipient_amount"],
                Integer,
            ),
            RangeMapping::new("is_major", &["program", "is_major"], YesNo),
            RangeMapping::optional(
                "audit_report_type",
                &["program", "audit_report_type"],
                Text,
            ),
            RangeMapping::new(
                "number_of_audit_findings",
                &["program", "number_of_audit_findings"],
                Integer,
            ),
        ],
    );
    template.fields.push(RangeMapping::new(
        "total_amount_expended",
        &["total_amount_expended"],
        Integer,
    ));
    template.fanouts.push(Fanout {
        list_path: &["direct_or_indirect_award", "entities"],
        parts: &[
            ("passthrough_name", "passthrough_name"),
            (
                "passthrough_identifying_number",
                "passthrough_identifying_number",
            ),
        ],
        delimiter: '|',
    });
    template
}

fn findings_uniform_guidance() -> SectionTemplate {
    use ValueKind::{Text, YesNo};
    list_template(
        SectionName::FindingsUniformGuidance,
        "findings_uniform_guidance_entries",
        vec![
            RangeMapping::new("award_reference", &["program", "award_reference"], Text),
            RangeMapping::new("reference_number", &["findings", "reference_number"], Text),
            RangeMapping::new(
                "compliance_requirement",
                &["program", "compliance_requirement"],
                Text,
            ),
            RangeMapping::new("modified_opinion", &["modified_opinion"], YesNo),
            RangeMapping::new("other_matters", &["other_matters"], YesNo),
            RangeMapping::new("material_weakness", &["material_weakness"], YesNo),
            RangeMapping::new("significant_deficiency", &["significant_deficiency"], YesNo),
            RangeMapping::new("other_findings", &["other_findings"], YesNo),
            RangeMapping::new("questioned_costs", &["questioned_costs"], YesNo),
            RangeMapping::new(
                "repeat_prior_reference",
                &["findings", "repeat_prior_reference"],
                YesNo,
            ),
            RangeMapping::new("prior_references", &["findings", "prior_references"], Text),
        ],
    )
}

fn findings_text() -> SectionTemplate {
    use ValueKind::{Text, YesNo};
    list_template(
        SectionName::FindingsText,
        "findings_text_entries",
        vec![
            RangeMapping::new("reference_number", &["reference_number"], Text),
            RangeMapping::new("text_of_finding", &["text_of_finding"], Text),
            RangeMapping::new("contains_chart_or_table", &["contains_chart_or_table"], YesNo),
        ],
    )
}

fn corrective_action_plan() -> SectionTemplate {
    use ValueKind::{Text, YesNo};
    list_template(
        SectionName::CorrectiveActionPlan,
        "corrective_action_plan_entries",
        vec![
            RangeMapping::new("reference_number", &["reference_number"], Text),
            RangeMapping::new("planned_action", &["planned_action"], Text),
            RangeMapping::new("contains_chart_or_table", &["contains_chart_or_table"], YesNo),
        ],
    )
}

fn additional_ueis() -> SectionTemplate {
    list_template(
        SectionName::AdditionalUeis,
        "additional_ueis_entries",
        vec![RangeMapping::new(
            "additional_uei",
            &["additional_uei"],
            ValueKind::Text,
        )],
    )
}

fn additional_eins() -> SectionTemplate {
    list_template(
        SectionName::AdditionalEins,
        "additional_eins_entries",
        vec![RangeMapping::new(
            "additional_ein",
            &["additional_ein"],
            ValueKind::Text,
        )],
    )
}

fn secondary_auditors() -> SectionTemplate {
    const COLUMNS: [&str; 10] = [
        "secondary_auditor_name",
        "secondary_auditor_ein",
        "secondary_auditor_address_street",
        "secondary_auditor_address_city",
        "secondary_auditor_address_state",
        "secondary_auditor_address_zipcode",
        "secondary_auditor_contact_name",
        "secondary_auditor_contact_title",
        "secondary_auditor_contact_phone",
        "secondary_auditor_contact_email",
    ];
    const PATHS: [&[&str]; 10] = [
        &["secondary_auditor_name"],
        &["secondary_auditor_ein"],
        &["secondary_auditor_address_street"],
        &["secondary_auditor_address_city"],
        &["secondary_auditor_address_state"],
        &["secondary_auditor_address_zipcode"],
        &["secondary_auditor_contact_name"],
        &["secondary_auditor_contact_title"],
        &["secondary_auditor_contact_phone"],
        &["secondary_auditor_contact_email"],
    ];
    list_template(
        SectionName::SecondaryAuditors,
        "secondary_auditors_entries",
        COLUMNS
            .into_iter()
            .zip(PATHS)
            .map(|(range, path)| RangeMapping::new(range, path, ValueKind::Text))
            .collect(),
    )
}

fn notes_to_sefa() -> SectionTemplate {
    use ValueKind::{Integer, Text, YesNo};
    let mut template = list_template(
        SectionName::NotesToSefa,
        "notes_to_sefa_entries",
        vec![
            RangeMapping::new("seq_number", &["seq_number"], Integer),
            RangeMapping::optional("note_title", &["note_title"], Text),
            RangeMapping::optional("note_content", &["note_content"], Text),
            RangeMapping::new("contains_chart_or_table", &["contains_chart_or_table"], YesNo),
        ],
    );
    template.fields.extend([
        RangeMapping::new("accounting_policies", &["accounting_policies"], Text),
        RangeMapping::new("is_minimis_rate_used", &["is_minimis_rate_used"], Text),
        RangeMapping::new("rate_explained", &["rate_explained"], Text),
    ]);
    template
}
