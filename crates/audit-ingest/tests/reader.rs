use std::fs;

use audit_ingest::{IngestError, WorkbookFormat, read_workbook, read_workbook_bytes};
use audit_model::{CellRef, CellValue};
use rust_xlsxwriter::Workbook;

fn federal_awards_workbook() -> Vec<u8> {
    let mut workbook = Workbook::new();
    {
        let cover = workbook.add_worksheet();
        cover.set_name("Coversheet").expect("name");
        cover.write_string(0, 1, "FederalAwardsExpended").expect("write");
        cover.write_string(1, 1, "1.1.0").expect("write");
    }
    {
        let form = workbook.add_worksheet();
        form.set_name("Form").expect("name");
        form.write_string(0, 1, "ABC123DEF456").expect("write");
        form.write_string(2, 0, "AWARD-0001").expect("write");
        form.write_string(3, 0, "AWARD-0002").expect("write");
        form.write_number(2, 1, 1000.0).expect("write");
        form.write_number(3, 1, 250.0).expect("write");
        form.write_number(4, 1, 75.0).expect("write");
        form.write_string(2, 3, "lookup").expect("write");
    }
    workbook
        .define_name("section_name", "=Coversheet!$B$1")
        .expect("define");
    workbook.define_name("version", "=Coversheet!$B$2").expect("define");
    workbook.define_name("auditee_uei", "=Form!$B$1").expect("define");
    workbook
        .define_name("award_reference", "=Form!$A$3:$A$50")
        .expect("define");
    workbook
        .define_name("amount_expended", "=Form!$B$3:$B$50")
        .expect("define");
    workbook
        .define_name("lookup_table", "=Form!$C$3:$D$10")
        .expect("define");
    workbook.save_to_buffer().expect("save")
}

#[test]
fn reads_named_ranges_and_trims_columns_to_a_common_length() {
    let ir = read_workbook_bytes(&federal_awards_workbook(), WorkbookFormat::Xlsx).expect("ir");

    assert_eq!(ir.sheets.len(), 2);
    assert_eq!(ir.scalar_text("section_name"), "FederalAwardsExpended");
    assert_eq!(ir.scalar_text("auditee_uei"), "ABC123DEF456");

    let references = ir.range("award_reference").expect("award_reference");
    let amounts = ir.range("amount_expended").expect("amount_expended");
    assert_eq!(references.values.len(), 3);
    assert_eq!(amounts.values.len(), 3);
    assert_eq!(references.values[2], CellValue::Missing);
    assert_eq!(amounts.values[2].to_text(), "75");
    assert_eq!(references.start_cell, CellRef::new("A", 3));
    assert_eq!(references.end_cell, CellRef::new("A", 5));
    assert!(ir.range("lookup_table").is_none());
}

#[test]
fn reads_from_disk_by_extension() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("awards.xlsx");
    fs::write(&path, federal_awards_workbook()).expect("write");
    let ir = read_workbook(&path).expect("ir");
    assert_eq!(ir.sheet_of("award_reference"), Some("Form"));
}

#[test]
fn rejects_unknown_extensions_before_reading() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("awards.csv");
    fs::write(&path, "award_reference\nAWARD-0001\n").expect("write");
    let error = read_workbook(&path).expect_err("unsupported");
    assert!(matches!(error, IngestError::UnsupportedFormat { .. }));
}

#[test]
fn workbook_without_section_name_is_unknown() {
    let mut workbook = Workbook::new();
    {
        let form = workbook.add_worksheet();
        form.set_name("Form").expect("name");
        form.write_string(2, 0, "AWARD-0001").expect("write");
    }
    workbook
        .define_name("award_reference", "=Form!$A$3:$A$5")
        .expect("define");
    let bytes = workbook.save_to_buffer().expect("save");

    let error = read_workbook_bytes(&bytes, WorkbookFormat::Xlsx).expect_err("unknown");
    assert!(matches!(error, IngestError::UnknownWorkbook { .. }));
}

#[test]
fn json_fallback_is_the_serialized_ir() {
    let document = serde_json::json!([
        {
            "name": "Coversheet",
            "ranges": [{
                "name": "section_name",
                "start_cell": { "column": "B", "row": 1 },
                "end_cell": { "column": "B", "row": 1 },
                "values": ["AdditionalUEIs"]
            }]
        },
        {
            "name": "Form",
            "ranges": [{
                "name": "additional_uei",
                "start_cell": { "column": "A", "row": 3 },
                "end_cell": { "column": "A", "row": 6 },
                "values": ["ZQGGHJH74DW7", null, "", null]
            }]
        }
    ]);
    let bytes = serde_json::to_vec(&document).expect("json");
    let ir = read_workbook_bytes(&bytes, WorkbookFormat::Json).expect("ir");
    let range = ir.range("additional_uei").expect("range");
    assert_eq!(range.values, vec![CellValue::text("ZQGGHJH74DW7")]);
    assert_eq!(range.end_cell, CellRef::new("A", 3));

    let error = read_workbook_bytes(b"{ not json", WorkbookFormat::Json).expect_err("malformed");
    assert!(matches!(error, IngestError::Json { .. }));
}
