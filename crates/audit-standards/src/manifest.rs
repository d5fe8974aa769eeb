//! Pinned reference-data manifest.
//!
//! A reference directory carries a `manifest.toml` listing every file with its
//! role and sha256. Files are verified before anything is parsed.

use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::catalog::ProgramCatalog;
use crate::error::StandardsError;
use crate::hash::sha256_hex;

pub const MANIFEST_SCHEMA: &str = "single-audit.reference-manifest";

pub const PROGRAM_CATALOG_ROLE: &str = "program_catalog";
pub const BASELINE_HISTORY_ROLE: &str = "baseline_history";

const ALLOWED_KINDS: &[&str] = &["csv", "toml", "json", "other"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub manifest: ManifestHeader,
    pub files: Vec<ManifestFile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestHeader {
    pub schema: String,
    pub schema_version: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestFile {
    pub path: String,
    pub sha256: String,
    pub kind: String,
    pub role: String,
}

/// Verified reference data ready for use.
#[derive(Debug, Clone)]
pub struct ReferenceData {
    pub root: PathBuf,
    pub files: Vec<ManifestFile>,
    pub program_catalog: ProgramCatalog,
    /// Historical award rows the cognizant baseline is rebuilt from.
    pub baseline_history: Option<PathBuf>,
}

impl ReferenceData {
    pub fn verify_and_load(root: &Path) -> Result<Self, StandardsError> {
        let manifest = load_manifest(&crate::paths::manifest_path(root))?;
        validate_manifest(&manifest)?;

        let mut files = manifest.files.clone();
        files.sort_by(|a, b| a.path.cmp(&b.path));
        for file in &files {
            verify_file(root, file)?;
        }

        let catalog_file = files
            .iter()
            .find(|f| f.role == PROGRAM_CATALOG_ROLE)
            .ok_or_else(|| StandardsError::MissingRole {
                role: PROGRAM_CATALOG_ROLE.to_string(),
            })?;
        let program_catalog = ProgramCatalog::load(&root.join(&catalog_file.path))?;
        let baseline_history = files
            .iter()
            .find(|f| f.role == BASELINE_HISTORY_ROLE)
            .map(|f| root.join(&f.path));

        Ok(Self {
            root: root.to_path_buf(),
            files,
            program_catalog,
            baseline_history,
        })
    }
}

fn load_manifest(path: &Path) -> Result<Manifest, StandardsError> {
    let contents = std::fs::read_to_string(path).map_err(|e| StandardsError::io(path, e))?;
    toml::from_str(&contents).map_err(|e| StandardsError::Toml {
        path: path.to_path_buf(),
        source: e,
    })
}

fn validate_manifest(manifest: &Manifest) -> Result<(), StandardsError> {
    if manifest.manifest.schema != MANIFEST_SCHEMA {
        return Err(StandardsError::InvalidManifest {
            message: format!("unsupported schema: {}", manifest.manifest.schema),
        });
    }
    if manifest.manifest.schema_version != 1 {
        return Err(StandardsError::InvalidManifest {
            message: format!(
                "unsupported schema_version: {}",
                manifest.manifest.schema_version
            ),
        });
    }

    let mut roles: BTreeSet<&str> = BTreeSet::new();
    for file in &manifest.files {
        if !roles.insert(file.role.as_str()) {
            return Err(StandardsError::DuplicateRole {
                role: file.role.clone(),
            });
        }
        if !ALLOWED_KINDS.contains(&file.kind.as_str()) {
            return Err(StandardsError::InvalidManifest {
                message: format!("unsupported kind '{}' for {}", file.kind, file.path),
            });
        }
        if file.sha256.len() != 64 || !file.sha256.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(StandardsError::InvalidManifest {
                message: format!("sha256 for {} must be 64 hex characters", file.path),
            });
        }
        validate_path(&file.path)?;
    }
    Ok(())
}

/// Manifest paths stay inside the reference directory.
fn validate_path(path: &str) -> Result<(), StandardsError> {
    let candidate = Path::new(path);
    let escapes = candidate
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if path.is_empty() || escapes {
        return Err(StandardsError::InvalidPath {
            path: candidate.to_path_buf(),
            message: "must be a relative path inside the reference directory".to_string(),
        });
    }
    Ok(())
}

fn verify_file(root: &Path, file: &ManifestFile) -> Result<(), StandardsError> {
    let full_path = root.join(&file.path);
    let bytes = std::fs::read(&full_path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            StandardsError::MissingFile {
                path: full_path.clone(),
            }
        } else {
            StandardsError::io(full_path.clone(), e)
        }
    })?;

    let actual = sha256_hex(&bytes);
    let expected = file.sha256.to_ascii_lowercase();
    if actual != expected {
        return Err(StandardsError::Sha256Mismatch {
            path: full_path,
            expected,
            actual,
        });
    }
    Ok(())
}
