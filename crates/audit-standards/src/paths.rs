//! Reference-data directory resolution.

use std::path::PathBuf;

/// Environment variable for overriding the reference-data directory.
pub const STANDARDS_ENV_VAR: &str = "SINGLE_AUDIT_STANDARDS_DIR";

/// Get the reference-data root directory.
///
/// Resolution order:
/// 1. `SINGLE_AUDIT_STANDARDS_DIR` environment variable
/// 2. `standards/` directory relative to workspace root
pub fn standards_root() -> PathBuf {
    if let Ok(root) = std::env::var(STANDARDS_ENV_VAR) {
        return PathBuf::from(root);
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../standards")
}

/// Manifest file inside a reference-data directory.
pub fn manifest_path(root: &std::path::Path) -> PathBuf {
    root.join("manifest.toml")
}
