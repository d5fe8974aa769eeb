//! Assistance listing program catalog.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::error::StandardsError;

/// Known `prefix.extension` pairs and their program names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramCatalog {
    programs: BTreeMap<String, String>,
    prefixes: BTreeSet<String>,
}

impl ProgramCatalog {
    pub fn insert(&mut self, prefix: &str, extension: &str, program_name: &str) {
        self.prefixes.insert(prefix.to_string());
        self.programs
            .insert(format!("{prefix}.{extension}"), program_name.to_string());
    }

    pub fn contains(&self, prefix: &str, extension: &str) -> bool {
        self.programs.contains_key(&format!("{prefix}.{extension}"))
    }

    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.prefixes.contains(prefix)
    }

    pub fn program_name(&self, aln: &str) -> Option<&str> {
        self.programs.get(aln).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }

    /// Parse a catalog CSV with `prefix,extension,program_name` headers.
    pub fn from_csv_bytes(path: &Path, bytes: &[u8]) -> Result<Self, StandardsError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(bytes);
        let headers = reader
            .headers()
            .map_err(|e| StandardsError::csv(path, e))?
            .clone();
        let position = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim_matches('\u{feff}').trim() == name)
                .ok_or_else(|| StandardsError::csv(path, format!("missing column {name}")))
        };
        let prefix_idx = position("prefix")?;
        let extension_idx = position("extension")?;
        let name_idx = position("program_name")?;

        let mut catalog = Self::default();
        for row in reader.records() {
            let row = row.map_err(|e| StandardsError::csv(path, e))?;
            let prefix = row.get(prefix_idx).unwrap_or("").trim();
            let extension = row.get(extension_idx).unwrap_or("").trim();
            if prefix.is_empty() || extension.is_empty() {
                continue;
            }
            catalog.insert(prefix, extension, row.get(name_idx).unwrap_or("").trim());
        }
        Ok(catalog)
    }

    pub fn load(path: &Path) -> Result<Self, StandardsError> {
        let bytes = std::fs::read(path).map_err(|e| StandardsError::io(path, e))?;
        Self::from_csv_bytes(path, &bytes)
    }
}
