#![deny(unsafe_code)]

use growth_model::{Indicator, Sex};
use serde::{Deserialize, Serialize};

pub const MANIFEST_FILE: &str = "manifest.toml";
pub const MANIFEST_SCHEMA: &str = "growth-standards.manifest";
pub const MANIFEST_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub manifest: ManifestHeader,
    #[serde(default)]
    pub tables: Vec<ManifestTable>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestHeader {
    pub schema: String,
    pub schema_version: u32,
    /// Edition of the published standard, e.g. "WHO Child Growth Standards 2006".
    #[serde(default)]
    pub edition: Option<String>,
    /// Indicators that must be present for both sexes.
    #[serde(default)]
    pub required: Vec<Indicator>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestTable {
    pub indicator: Indicator,
    pub sex: Sex,
    pub path: String,
    #[serde(default)]
    pub sha256: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}
