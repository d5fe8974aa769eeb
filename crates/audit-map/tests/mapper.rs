use audit_map::{MappingError, map_document, map_section};
use audit_model::records::{FederalAwards, PassthroughEntity};
use audit_model::{
    CellRef, CellValue, NamedRange, SectionName, SectionRecord, Sheet, WorkbookIr, YesNo,
};
use audit_standards::SectionTemplate;
use proptest::prelude::*;
use serde_json::json;

const UEI: &str = "ZQGGHJH74DW7";

fn t(value: &str) -> CellValue {
    if value.is_empty() {
        CellValue::Missing
    } else {
        CellValue::text(value)
    }
}

/// Scalars on row 1 of the form, columns starting at `first_row`.
fn workbook(
    fields: &[(&str, CellValue)],
    columns: &[(&str, Vec<CellValue>)],
    first_row: u32,
) -> WorkbookIr {
    let mut form = Sheet::new("Form");
    form.ranges
        .push(NamedRange::new("auditee_uei", CellRef::new("A", 1), vec![t(UEI)]));
    for (idx, (name, value)) in fields.iter().enumerate() {
        let letter = audit_model::column_letters(idx as u32 + 1);
        form.ranges
            .push(NamedRange::new(*name, CellRef::new(letter, 1), vec![value.clone()]));
    }
    for (idx, (name, values)) in columns.iter().enumerate() {
        let letter = audit_model::column_letters(idx as u32);
        form.ranges.push(NamedRange::new(
            *name,
            CellRef::new(letter, first_row),
            values.clone(),
        ));
    }
    WorkbookIr::new(vec![form])
}

fn award_columns(rows: &[[&str; 5]]) -> Vec<(&'static str, Vec<CellValue>)> {
    let constant = |value: &str| rows.iter().map(|_| t(value)).collect::<Vec<_>>();
    let column = |idx: usize| rows.iter().map(|row| t(row[idx])).collect::<Vec<_>>();
    vec![
        ("award_reference", column(0)),
        ("federal_agency_prefix", constant("93")),
        ("three_digit_extension", constant("600")),
        ("federal_program_name", constant("Head Start")),
        (
            "amount_expended",
            rows.iter().map(|_| CellValue::Integer(1000)).collect(),
        ),
        (
            "federal_program_total",
            rows.iter().map(|_| CellValue::Number(1000.0)).collect(),
        ),
        ("cluster_name", constant("N/A")),
        ("cluster_total", constant("0")),
        ("is_guaranteed", constant("N")),
        ("is_direct", column(1)),
        ("passthrough_name", column(2)),
        ("passthrough_identifying_number", column(3)),
        ("is_passed", constant("N")),
        ("is_major", constant("Y")),
        ("audit_report_type", column(4)),
        ("number_of_audit_findings", constant("0")),
    ]
}

fn federal_awards(record: SectionRecord) -> FederalAwards {
    match record {
        SectionRecord::FederalAwards(awards) => awards,
        other => panic!("expected federal awards, got {:?}", other.section()),
    }
}

#[test]
fn awards_map_into_nested_records() {
    let columns = award_columns(&[
        ["AWARD-0001", "Y", "", "", "U"],
        ["AWARD-0002", "N", "State DOE|County", "SD-1|", ""],
    ]);
    let ir = workbook(
        &[("total_amount_expended", CellValue::Integer(2000))],
        &columns,
        3,
    );
    let template = SectionTemplate::builtin(SectionName::FederalAwards);
    let awards = federal_awards(map_section(&ir, &template).expect("maps"));

    assert_eq!(awards.auditee_uei, UEI);
    assert_eq!(awards.total_amount_expended, 2000);
    assert_eq!(awards.federal_awards.len(), 2);

    let first = &awards.federal_awards[0];
    assert_eq!(first.aln(), "93.600");
    assert_eq!(first.program.federal_program_total, 1000);
    assert_eq!(first.program.audit_report_type.as_deref(), Some("U"));
    assert!(first.direct_or_indirect_award.entities.is_empty());

    let second = &awards.federal_awards[1];
    assert_eq!(second.direct_or_indirect_award.is_direct, YesNo::No);
    assert_eq!(second.program.audit_report_type, None);
    assert_eq!(
        second.direct_or_indirect_award.entities,
        vec![
            PassthroughEntity {
                passthrough_name: "State DOE".to_string(),
                passthrough_identifying_number: Some("SD-1".to_string()),
            },
            PassthroughEntity {
                passthrough_name: "County".to_string(),
                passthrough_identifying_number: None,
            },
        ]
    );
}

#[test]
fn entries_are_indexed_by_physical_row() {
    // Data starts on row 3; a column that begins on row 4 fills entry 1.
    let ir = workbook(&[], &[("additional_uei", vec![t("ABCDEFGHJK12")])], 4);
    let template = SectionTemplate::builtin(SectionName::AdditionalUeis);
    let document = map_document(&ir, &template).expect("maps");
    assert_eq!(
        document,
        json!({
            "auditee_uei": UEI,
            "additional_ueis_entries": [{}, { "additional_uei": "ABCDEFGHJK12" }]
        })
    );

    // The backfilled entry does not fit the record schema.
    let err = map_section(&ir, &template).unwrap_err();
    assert!(matches!(err, MappingError::Schema(_)), "{err}");
}

#[test]
fn general_information_coerces_dates_and_flags() {
    let ir = workbook(
        &[
            ("auditee_ein", t("123456789")),
            ("auditee_name", t("City of Springfield")),
            ("fy_start_date", t("07/01/2023")),
            ("fy_end_date", t("2024-06-30T00:00:00")),
            ("audit_type", t("single-audit")),
            ("audit_period_covered", t("annual")),
            ("multiple_ueis_covered", t("N")),
            ("multiple_eins_covered", CellValue::Bool(true)),
            ("secondary_auditors_exist", t("N")),
            ("is_low_risk_auditee", t("Y")),
        ],
        &[],
        3,
    );
    let template = SectionTemplate::builtin(SectionName::GeneralInformation);
    let document = map_document(&ir, &template).expect("maps");
    assert_eq!(document["fy_start_date"], json!("2023-07-01"));
    assert_eq!(document["fy_end_date"], json!("2024-06-30"));
    assert_eq!(document["multiple_eins_covered"], json!(true));
    assert_eq!(document["is_low_risk_auditee"], json!(true));

    let SectionRecord::GeneralInformation(general) =
        map_section(&ir, &template).expect("maps")
    else {
        panic!("expected general information");
    };
    assert_eq!(general.audit_year(), 2023);
    assert!(!general.multiple_ueis_covered);
}

#[test]
fn uncoercible_cells_name_their_range_and_row() {
    let ir = workbook(
        &[],
        &[
            ("seq_number", vec![t("1"), t("two")]),
            ("contains_chart_or_table", vec![t("N"), t("N")]),
        ],
        3,
    );
    let template = SectionTemplate::builtin(SectionName::NotesToSefa);
    let err = map_document(&ir, &template).unwrap_err();
    assert_eq!(
        err.to_string(),
        "seq_number row 1: cannot read \"two\" as a whole number"
    );
}

#[test]
fn notes_omit_empty_optional_cells() {
    let ir = workbook(
        &[
            ("accounting_policies", t("Cash basis")),
            ("is_minimis_rate_used", t("N")),
            ("rate_explained", t("Not used")),
        ],
        &[
            ("seq_number", vec![t("1")]),
            ("note_title", vec![t("")]),
            ("note_content", vec![t("")]),
            ("contains_chart_or_table", vec![t("N")]),
        ],
        3,
    );
    let template = SectionTemplate::builtin(SectionName::NotesToSefa);
    let document = map_document(&ir, &template).expect("maps");
    assert_eq!(
        document["notes_to_sefa_entries"],
        json!([{ "seq_number": 1, "contains_chart_or_table": "N" }])
    );
}

#[test]
fn canonical_json_is_stable() {
    let ir = workbook(&[], &[("additional_uei", vec![t("ABCDEFGHJK12")])], 3);
    let template = SectionTemplate::builtin(SectionName::AdditionalUeis);
    let record = map_section(&ir, &template).expect("maps");
    insta::assert_snapshot!(record.to_canonical_json().expect("serializes"), @r#"
    {
      "auditee_uei": "ZQGGHJH74DW7",
      "additional_ueis_entries": [
        {
          "additional_uei": "ABCDEFGHJK12"
        }
      ]
    }
    "#);
}

proptest! {
    #[test]
    fn every_filled_row_becomes_one_entry(
        ueis in prop::collection::vec("[A-HJ-NP-Z1-9]{12}", 1..20),
    ) {
        let values: Vec<CellValue> = ueis.iter().map(|uei| t(uei)).collect();
        let ir = workbook(&[], &[("additional_uei", values)], 3);
        let template = SectionTemplate::builtin(SectionName::AdditionalUeis);
        let SectionRecord::AdditionalUeis(record) = map_section(&ir, &template).unwrap() else {
            panic!("expected additional UEIs");
        };
        let mapped: Vec<&str> = record
            .additional_ueis_entries
            .iter()
            .map(|entry| entry.additional_uei.as_str())
            .collect();
        prop_assert_eq!(mapped, ueis.iter().map(String::as_str).collect::<Vec<_>>());
    }
}
