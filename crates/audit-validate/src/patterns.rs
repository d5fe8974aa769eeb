//! Value shapes shared by section checks and cross-validators.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use audit_model::YesNo;
use regex::Regex;

fn pattern(source: &str) -> Regex {
    // Sources are literals in this module; a bad one is a programming error.
    Regex::new(source).unwrap_or_else(|e| panic!("invalid built-in pattern {source}: {e}"))
}

static AWARD_REFERENCE: LazyLock<Regex> = LazyLock::new(|| pattern(r"^AWARD-(\d+)$"));
static REFERENCE_NUMBER: LazyLock<Regex> = LazyLock::new(|| pattern(r"^(\d{4})-\d{3}$"));
static AGENCY_PREFIX: LazyLock<Regex> = LazyLock::new(|| pattern(r"^\d{2}$"));
static EXTENSION: LazyLock<Regex> = LazyLock::new(|| pattern(r"^(\d{3}|RD\d?|U\d{2})$"));
static UEI: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"^[1-9A-HJ-NP-Z][0-9A-HJ-NP-Z]{11}$"));
static EIN: LazyLock<Regex> = LazyLock::new(|| pattern(r"^\d{9}$"));
static ZIP: LazyLock<Regex> = LazyLock::new(|| pattern(r"^\d{5}(-?\d{4})?$"));
static PHONE: LazyLock<Regex> = LazyLock::new(|| pattern(r"^\(?\d{3}\)?[-. ]?\d{3}[-. ]?\d{4}$"));
static EMAIL: LazyLock<Regex> = LazyLock::new(|| pattern(r"^[^@\s]+@[^@\s]+\.[^@\s]+$"));
static STATE: LazyLock<Regex> = LazyLock::new(|| pattern(r"^[A-Z]{2}$"));

/// Letters a compliance requirement may be built from.
pub const COMPLIANCE_LETTERS: &str = "ABCEFGHIJLMNP";

/// Audit report types for major programs.
pub const REPORT_TYPES: [&str; 4] = ["U", "Q", "A", "D"];

/// The nine allowed joint values of (modified opinion, other matters,
/// material weakness, significant deficiency, other findings).
pub const ALLOWED_GRIDS: [[bool; 5]; 9] = [
    [true, false, false, false, false],
    [true, false, true, false, false],
    [true, false, false, true, false],
    [false, true, false, false, false],
    [false, true, true, false, false],
    [false, true, false, true, false],
    [false, false, true, false, false],
    [false, false, false, true, false],
    [false, false, false, false, true],
];

pub fn is_award_reference(value: &str) -> bool {
    AWARD_REFERENCE.is_match(value)
}

/// Numeric suffix of an award reference, digits as written.
pub fn award_reference_digits(value: &str) -> Option<&str> {
    AWARD_REFERENCE
        .captures(value.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

pub fn is_reference_number(value: &str) -> bool {
    REFERENCE_NUMBER.is_match(value)
}

/// Year part of a finding reference number.
pub fn reference_year(value: &str) -> Option<i32> {
    REFERENCE_NUMBER
        .captures(value.trim())
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

pub fn is_agency_prefix(value: &str) -> bool {
    AGENCY_PREFIX.is_match(value)
}

pub fn is_extension(value: &str) -> bool {
    EXTENSION.is_match(value)
}

/// `RD` and `U##` extensions identify programs not on the listing and need
/// an additional award identification.
pub fn extension_needs_identification(value: &str) -> bool {
    value.starts_with("RD") || value.starts_with('U')
}

pub fn is_uei(value: &str) -> bool {
    UEI.is_match(value)
}

pub fn is_ein(value: &str) -> bool {
    EIN.is_match(value)
}

pub fn is_zip(value: &str) -> bool {
    ZIP.is_match(value)
}

pub fn is_phone(value: &str) -> bool {
    PHONE.is_match(value)
}

pub fn is_email(value: &str) -> bool {
    EMAIL.is_match(value)
}

pub fn is_state(value: &str) -> bool {
    STATE.is_match(value)
}

/// Letters drawn from [`COMPLIANCE_LETTERS`], each at most once.
pub fn is_compliance_requirement(value: &str) -> bool {
    let mut seen = BTreeSet::new();
    !value.is_empty() && value.chars().all(|c| COMPLIANCE_LETTERS.contains(c) && seen.insert(c))
}

/// Whether five Y/N flags form an allowed grid. Migrated answers are not
/// judged.
pub fn is_allowed_grid(flags: [YesNo; 5]) -> bool {
    if flags.contains(&YesNo::Migration) {
        return true;
    }
    let bits = flags.map(|flag| flag.is_yes());
    ALLOWED_GRIDS.contains(&bits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uei_excludes_ambiguous_letters_and_leading_zero() {
        assert!(is_uei("ZQGGHJH74DW7"));
        assert!(!is_uei("0QGGHJH74DW7"));
        assert!(!is_uei("ZQGGHJH74DO7"));
        assert!(!is_uei("ZQGGHJH74DI7"));
        assert!(!is_uei("ZQGGHJH74DW"));
    }

    #[test]
    fn extensions_follow_listing_shapes() {
        for ok in ["600", "RD", "RD1", "U01"] {
            assert!(is_extension(ok), "{ok}");
        }
        for bad in ["60", "RD12", "U1", "ABC"] {
            assert!(!is_extension(bad), "{bad}");
        }
    }

    #[test]
    fn compliance_letters_do_not_repeat() {
        assert!(is_compliance_requirement("ABC"));
        assert!(!is_compliance_requirement("AAB"));
        assert!(!is_compliance_requirement("D"));
        assert!(!is_compliance_requirement(""));
    }
}
