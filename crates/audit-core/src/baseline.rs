//! Historical cognizant baseline.
//!
//! The baseline records which agency each large auditee was assigned in the
//! reference year. A table is immutable once built and identified by the
//! sha256 of its rows. Rebuilding produces a complete new table that replaces
//! the current one in a single swap, so readers always see one whole version.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use audit_standards::Thresholds;
use audit_standards::hash::sha256_hex;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::agency::{AgencyTotals, is_agency_prefix};
use crate::error::BaselineError;

/// One auditee's cognizant agency in the reference year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaselineEntry {
    pub dbkey: String,
    pub audit_year: i32,
    pub ein: String,
    pub cognizant_agency: String,
}

/// One historical award row, as exported from prior-year submissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalAward {
    pub dbkey: String,
    pub audit_year: i32,
    pub ein: String,
    pub agency_prefix: String,
    pub amount_expended: i64,
    #[serde(deserialize_with = "yes_no_flag")]
    pub is_direct: bool,
}

fn yes_no_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match raw.trim().to_ascii_uppercase().as_str() {
        "Y" | "TRUE" | "1" => Ok(true),
        "N" | "FALSE" | "0" | "" => Ok(false),
        other => Err(serde::de::Error::custom(format!(
            "expected Y or N, got {other:?}"
        ))),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaselineTable {
    year: i32,
    /// Keyed by EIN.
    entries: BTreeMap<String, BaselineEntry>,
    version: String,
}

impl BaselineTable {
    pub fn empty(year: i32) -> Self {
        Self::from_entries(year, Vec::new())
    }

    /// Entries from other years are dropped. The first entry for an EIN wins.
    pub fn from_entries(year: i32, entries: impl IntoIterator<Item = BaselineEntry>) -> Self {
        let mut by_ein = BTreeMap::new();
        for entry in entries {
            if entry.audit_year == year {
                by_ein.entry(entry.ein.trim().to_string()).or_insert(entry);
            }
        }
        let mut canonical = String::new();
        for entry in by_ein.values() {
            canonical.push_str(&format!(
                "{},{},{},{}\n",
                entry.dbkey, entry.audit_year, entry.ein, entry.cognizant_agency
            ));
        }
        Self {
            year,
            version: sha256_hex(canonical.as_bytes()),
            entries: by_ein,
        }
    }

    /// Prior cognizant agency of an EIN in the reference year.
    pub fn lookup(&self, ein: &str) -> Option<&str> {
        self.entries
            .get(ein.trim())
            .map(|entry| entry.cognizant_agency.as_str())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Content hash identifying this version of the table.
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &BaselineEntry> {
        self.entries.values()
    }

    pub fn read_csv(year: i32, reader: impl Read) -> Result<Self, BaselineError> {
        let mut csv = csv::Reader::from_reader(reader);
        let mut entries: Vec<BaselineEntry> = Vec::new();
        for row in csv.deserialize() {
            entries.push(row?);
        }
        Ok(Self::from_entries(year, entries))
    }

    pub fn load(year: i32, path: &Path) -> Result<Self, BaselineError> {
        let file = std::fs::File::open(path).map_err(|source| BaselineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::read_csv(year, file)
    }

    pub fn to_csv(&self) -> Result<Vec<u8>, BaselineError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for entry in self.entries() {
            writer.serialize(entry)?;
        }
        writer
            .into_inner()
            .map_err(|error| BaselineError::Csv {
                source: error.into_error().into(),
            })
    }
}

pub fn read_history(reader: impl Read) -> Result<Vec<HistoricalAward>, BaselineError> {
    let mut csv = csv::Reader::from_reader(reader);
    let mut awards = Vec::new();
    for (index, row) in csv.deserialize::<HistoricalAward>().enumerate() {
        let award = row?;
        if !is_agency_prefix(award.agency_prefix.trim()) {
            return Err(BaselineError::InvalidRow {
                row: index + 1,
                message: format!("agency prefix {:?} is not two digits", award.agency_prefix),
            });
        }
        awards.push(award);
    }
    Ok(awards)
}

/// Rerun the agency aggregation over the reference year's awards and keep
/// every auditee whose expenditure exceeds the cognizant ceiling.
pub fn build_baseline(history: &[HistoricalAward], thresholds: &Thresholds) -> BaselineTable {
    struct Auditee<'a> {
        dbkey: &'a str,
        ein: &'a str,
        expended: Option<i64>,
        totals: AgencyTotals,
    }

    let year = thresholds.baseline_year;
    let mut order: Vec<Auditee<'_>> = Vec::new();
    let mut index: BTreeMap<&str, usize> = BTreeMap::new();
    for award in history.iter().filter(|award| award.audit_year == year) {
        let slot = *index.entry(award.dbkey.as_str()).or_insert_with(|| {
            order.push(Auditee {
                dbkey: &award.dbkey,
                ein: award.ein.trim(),
                expended: Some(0),
                totals: AgencyTotals::new(),
            });
            order.len() - 1
        });
        let auditee = &mut order[slot];
        auditee.expended = auditee
            .expended
            .and_then(|total| total.checked_add(award.amount_expended));
        auditee
            .totals
            .add(&award.agency_prefix, award.amount_expended, award.is_direct);
    }

    let entries = order.iter().filter_map(|auditee| {
        let (Some(expended), false) = (auditee.expended, auditee.totals.overflowed()) else {
            warn!(
                dbkey = auditee.dbkey,
                "historical amounts overflow; auditee left out of the baseline"
            );
            return None;
        };
        if expended <= thresholds.cognizant_ceiling {
            return None;
        }
        let (agency, _) = auditee
            .totals
            .candidate(expended, thresholds.direct_concentration)?;
        Some(BaselineEntry {
            dbkey: auditee.dbkey.to_string(),
            audit_year: year,
            ein: auditee.ein.to_string(),
            cognizant_agency: agency.to_string(),
        })
    });
    BaselineTable::from_entries(year, entries.collect::<Vec<_>>())
}

/// Shared handle on the current baseline version.
///
/// Readers take an `Arc` snapshot and keep using it even if a rebuild swaps
/// in a newer table meanwhile.
#[derive(Debug)]
pub struct BaselineStore {
    current: RwLock<Arc<BaselineTable>>,
}

impl BaselineStore {
    pub fn new(table: BaselineTable) -> Self {
        Self {
            current: RwLock::new(Arc::new(table)),
        }
    }

    pub fn snapshot(&self) -> Arc<BaselineTable> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Point readers at `table`; returns the version it replaced.
    pub fn replace(&self, table: BaselineTable) -> Arc<BaselineTable> {
        self.swap(Arc::new(table))
    }

    fn swap(&self, next: Arc<BaselineTable>) -> Arc<BaselineTable> {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *current, next)
    }

    /// Build a complete table from history, then swap it in.
    pub fn rebuild(
        &self,
        history: &[HistoricalAward],
        thresholds: &Thresholds,
    ) -> Arc<BaselineTable> {
        let table = Arc::new(build_baseline(history, thresholds));
        let previous = self.swap(Arc::clone(&table));
        info!(
            year = table.year(),
            entries = table.len(),
            version = %table.version(),
            previous = %previous.version(),
            "cognizant baseline rebuilt"
        );
        table
    }
}
