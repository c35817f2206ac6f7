//! Standards directory path resolution.

use std::path::{Path, PathBuf};

use crate::manifest::MANIFEST_FILE;

/// Environment variable for overriding the standards directory.
pub const STANDARDS_ENV_VAR: &str = "GROWTH_STANDARDS_DIR";

/// Get the standards root directory.
///
/// Resolution order:
/// 1. `GROWTH_STANDARDS_DIR` environment variable
/// 2. `standards/` directory relative to workspace root
///
/// # Example
///
/// ```rust,ignore
/// let root = growth_standards::standards_root();
/// let store = growth_standards::ReferenceTableStore::load(&root)?;
/// ```
pub fn standards_root() -> PathBuf {
    if let Ok(root) = std::env::var(STANDARDS_ENV_VAR) {
        return PathBuf::from(root);
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../standards")
}

/// Path of the manifest inside a standards directory.
pub fn manifest_path(standards_dir: &Path) -> PathBuf {
    standards_dir.join(MANIFEST_FILE)
}
