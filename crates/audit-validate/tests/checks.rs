use audit_model::{CellError, CellRef, CellValue, NamedRange, SectionName, Sheet, WorkbookIr};
use audit_standards::{IntakeConfig, ProgramCatalog, SectionTemplate};
use audit_validate::{FatalError, check_names, check_workbook};
use proptest::prelude::*;

const UEI: &str = "ZQGGHJH74DW7";

fn t(value: &str) -> CellValue {
    if value.is_empty() {
        CellValue::Missing
    } else {
        CellValue::text(value)
    }
}

fn n(value: i64) -> CellValue {
    CellValue::Integer(value)
}

/// A workbook with the reserved coversheet ranges, scalar fields on row 1 of
/// the form and data columns starting on row 3.
fn workbook(
    section: SectionName,
    fields: &[(&str, CellValue)],
    columns: &[(&str, Vec<CellValue>)],
) -> WorkbookIr {
    let mut coversheet = Sheet::new("Coversheet");
    coversheet.ranges.push(NamedRange::new(
        "section_name",
        CellRef::new("A", 1),
        vec![t(section.workbook_label())],
    ));
    coversheet.ranges.push(NamedRange::new("version", CellRef::new("A", 2), vec![t("1.1.2")]));

    let mut form = Sheet::new("Form");
    form.ranges.push(NamedRange::new("auditee_uei", CellRef::new("A", 1), vec![t(UEI)]));
    for (idx, (name, value)) in fields.iter().enumerate() {
        let letter = audit_model::column_letters(idx as u32 + 1);
        form.ranges
            .push(NamedRange::new(*name, CellRef::new(letter, 1), vec![value.clone()]));
    }
    for (idx, (name, values)) in columns.iter().enumerate() {
        let letter = audit_model::column_letters(idx as u32);
        form.ranges
            .push(NamedRange::new(*name, CellRef::new(letter, 3), values.clone()));
    }
    WorkbookIr::new(vec![coversheet, form])
}

fn run(section: SectionName, ir: &WorkbookIr, config: &IntakeConfig) -> Vec<CellError> {
    let template = SectionTemplate::builtin(section);
    check_workbook(ir, &template, config, Some(UEI), false).expect("passes fatal checks")
}

fn texts(errors: &[CellError]) -> Vec<String> {
    errors.iter().map(ToString::to_string).collect()
}

fn awards(rows: &[[&str; 12]], total: i64) -> WorkbookIr {
    const NAMES: [&str; 12] = [
        "award_reference",
        "federal_agency_prefix",
        "three_digit_extension",
        "federal_program_name",
        "amount_expended",
        "cluster_name",
        "is_guaranteed",
        "is_direct",
        "passthrough_name",
        "is_passed",
        "is_major",
        "audit_report_type",
    ];
    let mut columns: Vec<(&str, Vec<CellValue>)> = NAMES
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let values = rows
                .iter()
                .map(|row| match *name {
                    "amount_expended" => n(row[idx].parse().expect("amount")),
                    _ => t(row[idx]),
                })
                .collect();
            (*name, values)
        })
        .collect();
    let amounts: Vec<i64> = rows.iter().map(|row| row[4].parse().expect("amount")).collect();
    let program_totals = rows
        .iter()
        .map(|row| {
            let aln = (row[1], row[2]);
            n(rows
                .iter()
                .zip(&amounts)
                .filter(|(other, _)| (other[1], other[2]) == aln)
                .map(|(_, amount)| amount)
                .sum())
        })
        .collect();
    columns.push(("federal_program_total", program_totals));
    columns.push(("cluster_total", vec![n(0); rows.len()]));
    columns.push(("number_of_audit_findings", vec![n(0); rows.len()]));
    workbook(
        SectionName::FederalAwards,
        &[("total_amount_expended", n(total))],
        &columns,
    )
}

const GOOD_AWARD: [&str; 12] = [
    "AWARD-0001", "93", "600", "Head Start", "100", "N/A", "N", "Y", "", "N", "Y", "U",
];

#[test]
fn section_checks_follow_the_general_group() {
    let names: Vec<_> = check_names(SectionName::NotesToSefa).collect();
    assert_eq!(
        names,
        vec![
            "migration_sentinel",
            "auditee_uei_shape",
            "required",
            "yes_no",
            "whole_numbers",
            "dates",
            "de_minimis_rate",
            "note_pairs",
        ]
    );
}

#[test]
fn a_clean_award_row_has_no_errors() {
    let ir = awards(&[GOOD_AWARD], 100);
    let errors = run(SectionName::FederalAwards, &ir, &IntakeConfig::default());
    assert!(errors.is_empty(), "{:?}", texts(&errors));
}

#[test]
fn wrong_section_is_fatal() {
    let ir = awards(&[GOOD_AWARD], 100);
    let template = SectionTemplate::builtin(SectionName::NotesToSefa);
    let err = check_workbook(&ir, &template, &IntakeConfig::default(), None, false)
        .expect_err("wrong workbook");
    assert_eq!(
        err,
        FatalError::WrongSection {
            expected: "Notes to SEFA".to_string(),
            found: "Federal Awards".to_string(),
        }
    );
}

#[test]
fn missing_section_name_is_an_unknown_workbook() {
    let mut ir = awards(&[GOOD_AWARD], 100);
    ir.sheets.remove(0);
    let template = SectionTemplate::builtin(SectionName::FederalAwards);
    let err = check_workbook(&ir, &template, &IntakeConfig::default(), None, false)
        .expect_err("no coversheet");
    assert_eq!(err, FatalError::UnknownWorkbook { range: "section_name" });
}

#[test]
fn outdated_template_and_uei_mismatch_are_fatal() {
    let template = SectionTemplate::builtin(SectionName::FederalAwards);
    let config = IntakeConfig::default();

    let mut old = awards(&[GOOD_AWARD], 100);
    old.replace_values("version", vec![t("1.0.9")]);
    assert!(matches!(
        check_workbook(&old, &template, &config, None, false),
        Err(FatalError::OutdatedTemplate { .. })
    ));

    let ir = awards(&[GOOD_AWARD], 100);
    assert!(check_workbook(&ir, &template, &config, Some(&UEI.to_lowercase()), false).is_ok());
    assert_eq!(
        check_workbook(&ir, &template, &config, Some("AAAAAAAAAAAA"), false),
        Err(FatalError::UeiMismatch {
            expected: "AAAAAAAAAAAA".to_string(),
            found: UEI.to_string(),
        })
    );
}

#[test]
fn missing_required_column_is_fatal() {
    let mut ir = awards(&[GOOD_AWARD], 100);
    ir.sheets[1].ranges.retain(|range| range.name != "is_major");
    let template = SectionTemplate::builtin(SectionName::FederalAwards);
    assert_eq!(
        check_workbook(&ir, &template, &IntakeConfig::default(), None, false),
        Err(FatalError::MissingRequiredField {
            range: "is_major".to_string()
        })
    );
}

#[test]
fn award_errors_accumulate_with_cell_locations() {
    let mut duplicate = GOOD_AWARD;
    duplicate[2] = "60";
    duplicate[11] = "";
    let errors = run(
        SectionName::FederalAwards,
        &awards(&[GOOD_AWARD, duplicate], 200),
        &IntakeConfig::default(),
    );
    assert_eq!(
        texts(&errors),
        vec![
            "Form!A4: Award reference AWARD-0001 appears more than once",
            "Form!C4: Extension 60 must be three digits, RD, RD#, or U##",
            "Form!L4: Audit report type is required when is major is Y",
        ]
    );
    assert!(errors.iter().all(|e| e.detail.link.contains('#')));
}

#[test]
fn conditional_columns_follow_their_flags() {
    let mut indirect = GOOD_AWARD;
    indirect[7] = "N";
    let mut passed = GOOD_AWARD;
    passed[0] = "AWARD-0002";
    passed[9] = "Y";
    passed[10] = "N";
    let errors = run(
        SectionName::FederalAwards,
        &awards(&[indirect, passed], 200),
        &IntakeConfig::default(),
    );
    let texts = texts(&errors);
    assert!(texts.contains(&"Form!I3: Passthrough name is required for indirect awards".to_string()));
    assert!(texts.iter().any(|t| t.contains("Subrecipient amount is required")));
    assert!(texts.iter().any(|t| t.contains("Audit report type must be empty")));
}

#[test]
fn state_and_other_clusters_need_their_names() {
    let mut ir = awards(&[GOOD_AWARD], 100);
    ir.replace_values("cluster_name", vec![t("STATE CLUSTER")]);
    let errors = run(SectionName::FederalAwards, &ir, &IntakeConfig::default());
    assert!(
        texts(&errors)
            .iter()
            .any(|t| t.contains("State cluster name is required")),
        "{:?}",
        texts(&errors)
    );
}

#[test]
fn totals_must_match_the_amounts() {
    let ir = awards(&[GOOD_AWARD], 250);
    let errors = run(SectionName::FederalAwards, &ir, &IntakeConfig::default());
    assert_eq!(
        texts(&errors),
        vec!["Form!B1: Total amount expended is 250, but the amounts expended add up to 100"]
    );
}

#[test]
fn overflowing_sums_are_reported_at_the_totals() {
    let mut second = GOOD_AWARD;
    second[0] = "AWARD-0002";
    let mut ir = awards(&[GOOD_AWARD, second], 200);
    ir.replace_values("amount_expended", vec![n(i64::MAX), n(i64::MAX)]);
    ir.replace_values("federal_program_total", vec![n(1), n(1)]);
    let errors = run(SectionName::FederalAwards, &ir, &IntakeConfig::default());
    assert_eq!(
        texts(&errors),
        vec![
            "Form!M3: The amounts expended behind Federal program total add up to more than \
             9223372036854775807",
            "Form!M4: The amounts expended behind Federal program total add up to more than \
             9223372036854775807",
            "Form!B1: The amounts expended add up to more than 9223372036854775807",
        ]
    );
}

#[test]
fn catalog_rejects_unknown_listings() {
    let mut catalog = ProgramCatalog::default();
    catalog.insert("93", "600", "Head Start");
    let config = IntakeConfig::default().with_program_catalog(catalog);

    let mut unknown = GOOD_AWARD;
    unknown[0] = "AWARD-0002";
    unknown[2] = "601";
    let mut unlisted = GOOD_AWARD;
    unlisted[0] = "AWARD-0003";
    unlisted[2] = "U01";
    let errors = run(
        SectionName::FederalAwards,
        &awards(&[GOOD_AWARD, unknown, unlisted], 300),
        &config,
    );
    assert_eq!(
        texts(&errors),
        vec![
            "Form!C4: 93.601 is not in the assistance listing catalog",
            // The workbook has no additional identification column, so the
            // error falls back to the first column of the data row.
            "Form!A5: Extension U01 requires an additional award identification",
        ]
    );
}

#[test]
fn migration_sentinel_depends_on_the_intake_kind() {
    let mut row = GOOD_AWARD;
    row[6] = "GSA_MIGRATION";
    let ir = awards(&[row], 100);
    let template = SectionTemplate::builtin(SectionName::FederalAwards);
    let config = IntakeConfig::default();

    let errors = check_workbook(&ir, &template, &config, None, false).expect("fatal ok");
    assert_eq!(
        texts(&errors),
        vec!["Form!G3: GSA_MIGRATION is only permitted in migrated submissions"]
    );
    let migrated = check_workbook(&ir, &template, &config, None, true).expect("fatal ok");
    assert!(migrated.is_empty(), "{:?}", texts(&migrated));
}

fn finding_row(
    reference: &str,
    grid: [&str; 5],
    repeat: &str,
    prior: &str,
) -> Vec<(&'static str, CellValue)> {
    let mut row = vec![
        ("award_reference", t("AWARD-0001")),
        ("reference_number", t(reference)),
        ("compliance_requirement", t("AB")),
    ];
    for (name, flag) in [
        "modified_opinion",
        "other_matters",
        "material_weakness",
        "significant_deficiency",
        "other_findings",
    ]
    .into_iter()
    .zip(grid)
    {
        row.push((name, t(flag)));
    }
    row.push(("questioned_costs", t("N")));
    row.push(("repeat_prior_reference", t(repeat)));
    row.push(("prior_references", t(prior)));
    row
}

fn findings(rows: &[Vec<(&'static str, CellValue)>]) -> WorkbookIr {
    let columns: Vec<(&str, Vec<CellValue>)> = rows[0]
        .iter()
        .enumerate()
        .map(|(idx, (name, _))| (*name, rows.iter().map(|row| row[idx].1.clone()).collect()))
        .collect();
    workbook(SectionName::FindingsUniformGuidance, &[], &columns)
}

#[test]
fn findings_rules() {
    let ir = findings(&[
        finding_row("2023-001", ["Y", "N", "N", "N", "N"], "N", "N/A"),
        finding_row("23-2", ["Y", "Y", "N", "N", "N"], "Y", "2022-001, 22-4"),
    ]);
    let errors = run(SectionName::FindingsUniformGuidance, &ir, &IntakeConfig::default());
    assert_eq!(
        texts(&errors),
        vec![
            "Form!B4: Reference number 23-2 must look like 2023-001",
            "Form!D4: The combination YYNNN of finding classifications is not allowed",
            "Form!K4: Prior references must be comma separated, like 2021-001, 2022-004; could not read 22-4",
        ]
    );
}

#[test]
fn additional_ueis_are_shaped_and_unique() {
    let ir = workbook(
        SectionName::AdditionalUeis,
        &[],
        &[("additional_uei", vec![t("ABCDEFGHJK12"), t("0BCDEFGHJK12"), t("ABCDEFGHJK12")])],
    );
    let errors = run(SectionName::AdditionalUeis, &ir, &IntakeConfig::default());
    assert_eq!(
        texts(&errors),
        vec![
            "Form!A4: 0BCDEFGHJK12 is not a valid UEI",
            "Form!A5: ABCDEFGHJK12 appears more than once",
        ]
    );
}

#[test]
fn notes_need_title_and_content_together() {
    let ir = workbook(
        SectionName::NotesToSefa,
        &[
            ("accounting_policies", t("Cash basis")),
            ("is_minimis_rate_used", t("Maybe")),
            ("rate_explained", t("We did not")),
        ],
        &[
            ("seq_number", vec![n(1), n(2)]),
            ("note_title", vec![t("Loans"), t("")]),
            ("note_content", vec![t("None outstanding"), t("Orphan text")]),
            ("contains_chart_or_table", vec![t("N"), t("N")]),
        ],
    );
    let errors = run(SectionName::NotesToSefa, &ir, &IntakeConfig::default());
    assert_eq!(
        texts(&errors),
        vec![
            "Form!C1: De minimis rate answer must be Y, N, or Both, not Maybe",
            "Form!B4: A note needs both a title and content",
        ]
    );
}

#[test]
fn general_information_fields() {
    let ir = workbook(
        SectionName::GeneralInformation,
        &[
            ("auditee_ein", t("12345678")),
            ("auditee_name", t("City of Springfield")),
            ("fy_start_date", t("2023-07-01")),
            ("fy_end_date", t("06/30/2023")),
            ("audit_type", t("single-audit")),
            ("audit_period_covered", t("quarterly")),
            ("multiple_ueis_covered", t("N")),
            ("multiple_eins_covered", t("N")),
            ("secondary_auditors_exist", t("N")),
            ("is_low_risk_auditee", t("maybe")),
        ],
        &[],
    );
    let errors = run(SectionName::GeneralInformation, &ir, &IntakeConfig::default());
    assert_eq!(
        texts(&errors),
        vec![
            "Form!K1: Is low risk auditee must be Y or N, not maybe",
            "Form!B1: Auditee EIN 12345678 must be nine digits",
            "Form!G1: Audit period covered must be one of annual, biennial, other, not quarterly",
            "Form!E1: Fiscal period end 2023-06-30 must be after its start 2023-07-01",
        ]
    );
}

const FLAGS: [&str; 2] = ["Y", "N"];

proptest! {
    #[test]
    fn grid_errors_only_for_disallowed_combinations(bits in prop::array::uniform5(0usize..2)) {
        let grid = bits.map(|b| FLAGS[b]);
        let ir = findings(&[finding_row("2023-001", grid, "N", "N/A")]);
        let errors = run(SectionName::FindingsUniformGuidance, &ir, &IntakeConfig::default());
        let allowed = audit_validate::patterns::ALLOWED_GRIDS.contains(&bits.map(|b| b == 0));
        prop_assert_eq!(errors.is_empty(), allowed);
    }

    #[test]
    fn later_duplicates_are_flagged_at_their_own_row(
        refs in prop::collection::vec(1u32..5, 1..10),
    ) {
        let references: Vec<String> = refs.iter().map(|r| format!("AWARD-{r:04}")).collect();
        let ir = workbook(
            SectionName::FederalAwards,
            &[],
            &[("award_reference", references.iter().map(|r| t(r)).collect())],
        );
        let template = SectionTemplate::builtin(SectionName::FederalAwards);
        let config = IntakeConfig::default();
        let ctx = audit_validate::CheckContext::new(&ir, &template, &config);
        let duplicates: Vec<u32> = audit_validate::run_all(&ctx)
            .into_iter()
            .filter(|e| e.text().contains("appears more than once"))
            .map(|e| e.row)
            .collect();
        let mut seen = std::collections::BTreeSet::new();
        let expected: Vec<u32> = refs
            .iter()
            .enumerate()
            .filter(|(_, r)| !seen.insert(**r))
            .map(|(idx, _)| idx as u32 + 3)
            .collect();
        prop_assert_eq!(duplicates, expected);
    }
}
