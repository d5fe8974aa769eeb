use std::path::PathBuf;

use audit_core::{IntakeError, IntakeOptions, extract_file, extract_ir};
use audit_model::{CellRef, CellValue, NamedRange, SectionName, SectionRecord, Sheet, WorkbookIr};
use audit_standards::IntakeConfig;
use audit_validate::{FatalError, Validated};
use tempfile::TempDir;

const UEI: &str = "ZQGGHJH74DW7";

fn t(value: &str) -> CellValue {
    CellValue::text(value)
}

fn workbook(section: SectionName, column: &str, values: Vec<CellValue>) -> WorkbookIr {
    let mut coversheet = Sheet::new("Coversheet");
    coversheet.ranges.push(NamedRange::new(
        "section_name",
        CellRef::new("A", 1),
        vec![t(section.workbook_label())],
    ));
    coversheet
        .ranges
        .push(NamedRange::new("version", CellRef::new("A", 2), vec![t("1.1.2")]));
    let mut form = Sheet::new("Form");
    form.ranges
        .push(NamedRange::new("auditee_uei", CellRef::new("A", 1), vec![t(UEI)]));
    form.ranges
        .push(NamedRange::new(column, CellRef::new("A", 3), values));
    WorkbookIr::new(vec![coversheet, form])
}

fn write_json(dir: &TempDir, name: &str, ir: &WorkbookIr) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, serde_json::to_vec_pretty(ir).expect("serializes")).expect("writes");
    path
}

#[test]
fn clean_workbook_is_accepted() {
    let ir = workbook(
        SectionName::AdditionalEins,
        "additional_ein",
        vec![t(" 12-3456789 "), t("987654321")],
    );
    let options = IntakeOptions::new(SectionName::AdditionalEins).with_expected_uei(UEI);
    let outcome = extract_ir(ir, &options, &IntakeConfig::default()).expect("no fatal error");
    let Validated::Accepted(SectionRecord::AdditionalEins(record)) = outcome else {
        panic!("expected accepted additional EINs, got {outcome:?}");
    };
    let eins: Vec<&str> = record
        .additional_eins_entries
        .iter()
        .map(|entry| entry.additional_ein.as_str())
        .collect();
    assert_eq!(eins, vec!["123456789", "987654321"]);
}

#[test]
fn field_errors_are_returned_together() {
    let ir = workbook(
        SectionName::AdditionalUeis,
        "additional_uei",
        vec![t("ABCDEFGHJK12"), t("0BCDEFGHJK12"), t("ABCDEFGHJK12")],
    );
    let options = IntakeOptions::new(SectionName::AdditionalUeis);
    let outcome = extract_ir(ir, &options, &IntakeConfig::default()).expect("no fatal error");
    let Validated::Rejected(errors) = outcome else {
        panic!("expected rejection");
    };
    let texts: Vec<String> = errors.iter().map(ToString::to_string).collect();
    assert_eq!(
        texts,
        vec![
            "Form!A4: 0BCDEFGHJK12 is not a valid UEI",
            "Form!A5: ABCDEFGHJK12 appears more than once",
        ]
    );
}

#[test]
fn fatal_problems_stop_intake() {
    let ir = workbook(
        SectionName::AdditionalUeis,
        "additional_uei",
        vec![t("ABCDEFGHJK12")],
    );
    let options = IntakeOptions::new(SectionName::AdditionalEins);
    let err = extract_ir(ir.clone(), &options, &IntakeConfig::default()).unwrap_err();
    assert!(matches!(err, IntakeError::Fatal(FatalError::WrongSection { .. })));

    let options = IntakeOptions::new(SectionName::AdditionalUeis).with_expected_uei("ABCDEFGHJK99");
    let err = extract_ir(ir, &options, &IntakeConfig::default()).unwrap_err();
    assert!(matches!(err, IntakeError::Fatal(FatalError::UeiMismatch { .. })));
}

#[test]
fn extraction_is_idempotent() {
    let dir = TempDir::new().expect("tempdir");
    let ir = workbook(
        SectionName::AdditionalUeis,
        "additional_uei",
        vec![t("ABCDEFGHJK12"), t(" BCDEFGHJK123")],
    );
    let path = write_json(&dir, "additional-ueis.json", &ir);
    let options = IntakeOptions::new(SectionName::AdditionalUeis);
    let config = IntakeConfig::default();

    let render = || match extract_file(&path, &options, &config).expect("no fatal error") {
        Validated::Accepted(record) => record.to_canonical_json().expect("serializes"),
        Validated::Rejected(errors) => panic!("unexpected errors: {errors:?}"),
    };
    let first = render();
    assert_eq!(first, render());
    assert!(first.contains("\"additional_uei\": \"BCDEFGHJK123\""));
}

/// A Federal Awards workbook with one direct, non-major award per amount.
fn awards_workbook(amounts: &[&str], total: &str) -> WorkbookIr {
    let rows = amounts.len();
    let references = (1..=rows).map(|n| t(&format!("AWARD-{n:04}"))).collect();
    let mut ir = workbook(SectionName::FederalAwards, "award_reference", references);
    let repeat = |value: &str| vec![t(value); rows];
    let columns: Vec<(&str, Vec<CellValue>)> = vec![
        ("federal_agency_prefix", repeat("93")),
        ("three_digit_extension", repeat("600")),
        ("federal_program_name", repeat("Head Start")),
        ("amount_expended", amounts.iter().map(|amount| t(amount)).collect()),
        ("federal_program_total", vec![CellValue::Missing; rows]),
        ("cluster_name", vec![CellValue::Missing; rows]),
        ("cluster_total", vec![CellValue::Missing; rows]),
        ("is_guaranteed", repeat("N")),
        ("is_direct", repeat("Y")),
        ("is_passed", repeat("N")),
        ("is_major", repeat("N")),
        ("number_of_audit_findings", vec![CellValue::Missing; rows]),
    ];
    let form = &mut ir.sheets[1];
    form.ranges.push(NamedRange::new(
        "total_amount_expended",
        CellRef::new("B", 1),
        vec![t(total)],
    ));
    for (idx, (name, values)) in columns.into_iter().enumerate() {
        let letter = audit_model::column_letters(idx as u32 + 1);
        form.ranges
            .push(NamedRange::new(name, CellRef::new(letter, 3), values));
    }
    ir
}

#[test]
fn overflowing_amounts_are_rejected_as_cell_errors() {
    let max = i64::MAX.to_string();
    let ir = awards_workbook(&[&max, &max], "10");
    let options = IntakeOptions::new(SectionName::FederalAwards).with_expected_uei(UEI);
    let outcome = extract_ir(ir, &options, &IntakeConfig::default()).expect("no fatal error");
    let Validated::Rejected(errors) = outcome else {
        panic!("expected rejection, got {outcome:?}");
    };
    let texts: Vec<String> = errors.iter().map(ToString::to_string).collect();
    let program_total = format!("behind Federal program total add up to more than {max}");
    assert_eq!(
        texts.iter().filter(|text| text.contains(&program_total)).count(),
        2,
        "{texts:?}"
    );
    let total = format!("The amounts expended add up to more than {max}");
    assert!(texts.iter().any(|text| text.contains(&total)), "{texts:?}");
}

#[test]
fn unsupported_files_are_rejected_before_reading() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("awards.csv");
    std::fs::write(&path, "award_reference\nAWARD-0001\n").expect("writes");
    let err = extract_file(
        &path,
        &IntakeOptions::new(SectionName::FederalAwards),
        &IntakeConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        IntakeError::Ingest(audit_ingest::IngestError::UnsupportedFormat { .. })
    ));
}
