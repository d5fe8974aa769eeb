use std::fs;

use audit_model::SectionName;
use audit_standards::hash::sha256_hex;
use audit_standards::{
    IntakeConfig, ReferenceData, SectionTemplate, StandardsError, TemplateVersion, ValueKind,
};
use chrono::NaiveDate;

const CATALOG: &str = "prefix,extension,program_name\n93,600,Head Start\n10,555,National School Lunch Program\n";

fn write_reference_dir(catalog: &str, pinned: &str) -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("programs.csv"), catalog).expect("write catalog");
    let manifest = format!(
        r#"[manifest]
schema = "single-audit.reference-manifest"
schema_version = 1

[[files]]
path = "programs.csv"
sha256 = "{}"
kind = "csv"
role = "program_catalog"
"#,
        sha256_hex(pinned.as_bytes())
    );
    fs::write(dir.path().join("manifest.toml"), manifest).expect("write manifest");
    dir
}

#[test]
fn defaults_cover_every_section() {
    let config = IntakeConfig::default();
    for section in SectionName::ALL {
        assert_eq!(config.template(section).section, section);
    }
    assert_eq!(config.thresholds.cognizant_ceiling, 50_000_000);
    assert_eq!(config.minimum_template_version, TemplateVersion::new(1, 1, 0));
    assert_eq!(
        config.help_link("award-reference"),
        "https://www.fac.gov/documentation/validation/#award-reference"
    );
}

#[test]
fn expenditure_brackets_are_half_open() {
    let thresholds = IntakeConfig::default().thresholds;
    let day = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).expect("date");
    assert_eq!(
        thresholds.bracket_for(day(2024, 9, 30)).map(|b| b.minimum),
        Some(750_000)
    );
    assert_eq!(
        thresholds.bracket_for(day(2024, 10, 1)).map(|b| b.minimum),
        Some(1_000_000)
    );
}

#[test]
fn federal_awards_template_maps_rows_below_the_header() {
    let template = SectionTemplate::builtin(SectionName::FederalAwards);
    assert_eq!(template.entries_path, Some("federal_awards"));
    assert_eq!(template.row_index(3), Some(0));
    assert_eq!(template.row_index(2), None);
    assert!(template.column_ranges().contains(&"passthrough_name"));
    assert_eq!(
        template.column("amount_expended").map(|c| c.kind),
        Some(ValueKind::Integer)
    );
    assert!(template.field("total_amount_expended").is_some());
}

#[test]
fn toml_overrides_thresholds_and_loads_relative_catalog() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("programs.csv"), CATALOG).expect("write catalog");
    let path = dir.path().join("intake.toml");
    fs::write(
        &path,
        r#"
help_base_url = "https://help.example/"
minimum_template_version = "1.2"
program_catalog = "programs.csv"

[thresholds]
cognizant_ceiling = 1000
"#,
    )
    .expect("write config");

    let config = IntakeConfig::load(&path).expect("config");
    assert_eq!(config.thresholds.cognizant_ceiling, 1000);
    assert_eq!(config.thresholds.baseline_year, 2019);
    assert_eq!(config.minimum_template_version, TemplateVersion::new(1, 2, 0));
    let catalog = config.program_catalog.expect("catalog");
    assert!(catalog.contains("93", "600"));
    assert!(catalog.has_prefix("10"));
    assert_eq!(catalog.program_name("10.555"), Some("National School Lunch Program"));
}

#[test]
fn out_of_range_concentration_is_rejected() {
    let error = IntakeConfig::from_toml_str(
        "[thresholds]\ndirect_concentration = 1.5\n",
        std::path::Path::new("."),
    )
    .expect_err("invalid ratio");
    assert!(matches!(error, StandardsError::InvalidConfig { .. }));
}

#[test]
fn template_versions_compare_numerically() {
    let older: TemplateVersion = "1.0.9".parse().expect("version");
    let newer: TemplateVersion = "1.10.0".parse().expect("version");
    assert!(older < newer);
    assert!("1.x".parse::<TemplateVersion>().is_err());
    assert!("1.2.3.4".parse::<TemplateVersion>().is_err());
}

#[test]
fn manifest_pins_are_verified_before_loading() {
    let dir = write_reference_dir(CATALOG, CATALOG);
    let data = ReferenceData::verify_and_load(dir.path()).expect("reference data");
    assert_eq!(data.program_catalog.len(), 2);
    assert!(data.baseline_history.is_none());

    let tampered = write_reference_dir(CATALOG, "prefix,extension,program_name\n");
    let error = ReferenceData::verify_and_load(tampered.path()).expect_err("mismatch");
    assert!(matches!(error, StandardsError::Sha256Mismatch { .. }));
}

#[test]
fn bundled_reference_data_verifies() {
    let root = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../standards");
    let data = ReferenceData::verify_and_load(&root).expect("bundled reference data");
    assert!(data.program_catalog.contains("93", "600"));
    assert_eq!(
        data.program_catalog.program_name("10.555"),
        Some("National School Lunch Program")
    );
    assert!(
        data.baseline_history
            .as_deref()
            .is_some_and(|path| path.ends_with("baseline_history.csv"))
    );
}
