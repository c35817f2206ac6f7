#![deny(unsafe_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Component, Path, PathBuf};

use growth_model::{Axis, GrowthError, Indicator, Sex};
use tracing::{debug, info, info_span};

use crate::csv::lms::parse_table_bytes;
use crate::error::StandardsError;
use crate::hash::{is_valid_sha256, sha256_hex};
use crate::manifest::{MANIFEST_SCHEMA, MANIFEST_SCHEMA_VERSION, Manifest, ManifestTable};
use crate::paths::manifest_path;
use crate::table::ReferenceTable;

#[derive(Debug, Clone, serde::Serialize)]
pub struct TableSummary {
    pub indicator: Indicator,
    pub sex: Sex,
    pub axis: Axis,
    pub rows: usize,
    pub min_key: f64,
    pub max_key: f64,
    pub path: Option<String>,
    pub sha256: Option<String>,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct VerifySummary {
    pub standards_dir: PathBuf,
    pub edition: Option<String>,
    pub table_count: usize,
    pub row_count: usize,
    pub checksums_verified: usize,
    pub tables: Vec<TableSummary>,
}

/// Process-wide, read-only LMS reference tables keyed by indicator and sex.
///
/// Built once at startup and shared by reference; there is no interior
/// mutability, so concurrent lookups need no locking.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTableStore {
    edition: Option<String>,
    tables: BTreeMap<(Indicator, Sex), ReferenceTable>,
}

impl ReferenceTableStore {
    /// Load every table listed in `standards_dir/manifest.toml`.
    pub fn load(standards_dir: &Path) -> Result<Self, StandardsError> {
        Self::verify_and_load(standards_dir).map(|(store, _)| store)
    }

    pub fn verify_and_load(standards_dir: &Path) -> Result<(Self, VerifySummary), StandardsError> {
        let span = info_span!("load_standards", dir = %standards_dir.display());
        let _guard = span.enter();

        let manifest = load_manifest(&manifest_path(standards_dir))?;
        validate_manifest(&manifest)?;

        let mut tables = Vec::with_capacity(manifest.tables.len());
        let mut summaries = Vec::with_capacity(manifest.tables.len());
        let mut checksums_verified = 0usize;
        for entry in &manifest.tables {
            let full_path = standards_dir.join(&entry.path);
            let bytes = read_table_file(&full_path)?;
            let actual = sha256_hex(&bytes);
            if let Some(expected) = &entry.sha256 {
                let expected = expected.to_ascii_lowercase();
                if actual != expected {
                    return Err(StandardsError::Sha256Mismatch {
                        path: full_path,
                        expected,
                        actual,
                    });
                }
                checksums_verified += 1;
            }
            let table = parse_table_bytes(&bytes, entry.indicator, entry.sex, &entry.path)?;
            debug!(
                indicator = entry.indicator.as_str(),
                sex = entry.sex.as_str(),
                axis = table.axis().as_str(),
                rows = table.len(),
                "parsed reference table"
            );
            summaries.push(table_summary(&table, Some(entry.path.clone()), Some(actual)));
            tables.push(table);
        }

        let mut store = Self::from_tables(tables, &manifest.manifest.required)?;
        store.edition = manifest.manifest.edition.clone();

        let summary = VerifySummary {
            standards_dir: standards_dir.to_path_buf(),
            edition: store.edition.clone(),
            table_count: store.len(),
            row_count: store.row_count(),
            checksums_verified,
            tables: summaries,
        };
        info!(
            tables = summary.table_count,
            rows = summary.row_count,
            checksums = checksums_verified,
            "loaded growth standards"
        );
        Ok((store, summary))
    }

    /// Build a store from in-memory tables.
    ///
    /// Both sexes must be present for every indicator that has a table and for
    /// every indicator in `required`.
    pub fn from_tables<I>(tables: I, required: &[Indicator]) -> Result<Self, StandardsError>
    where
        I: IntoIterator<Item = ReferenceTable>,
    {
        let mut by_key = BTreeMap::new();
        for table in tables {
            let key = (table.indicator(), table.sex());
            if by_key.contains_key(&key) {
                return Err(StandardsError::DuplicateTable {
                    indicator: key.0,
                    sex: key.1,
                });
            }
            by_key.insert(key, table);
        }

        let mut indicators: BTreeSet<Indicator> = by_key.keys().map(|(ind, _)| *ind).collect();
        indicators.extend(required.iter().copied());
        for indicator in indicators {
            for sex in Sex::ALL {
                if !by_key.contains_key(&(indicator, sex)) {
                    return Err(StandardsError::malformed(
                        "reference set",
                        format!("missing {} table for {sex}", indicator.as_str()),
                    ));
                }
            }
        }

        Ok(Self {
            edition: None,
            tables: by_key,
        })
    }

    /// Table for `indicator` and `sex`.
    pub fn lookup(&self, indicator: Indicator, sex: Sex) -> Result<&ReferenceTable, GrowthError> {
        self.tables
            .get(&(indicator, sex))
            .ok_or(GrowthError::UnknownIndicatorOrSex { indicator, sex })
    }

    pub fn edition(&self) -> Option<&str> {
        self.edition.as_deref()
    }

    pub fn tables(&self) -> impl Iterator<Item = &ReferenceTable> {
        self.tables.values()
    }

    pub fn indicators(&self) -> BTreeSet<Indicator> {
        self.tables.keys().map(|(indicator, _)| *indicator).collect()
    }

    pub fn summaries(&self) -> Vec<TableSummary> {
        self.tables
            .values()
            .map(|table| table_summary(table, None, None))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.tables.values().map(ReferenceTable::len).sum()
    }
}

fn table_summary(
    table: &ReferenceTable,
    path: Option<String>,
    sha256: Option<String>,
) -> TableSummary {
    let (min_key, max_key) = table.domain();
    TableSummary {
        indicator: table.indicator(),
        sex: table.sex(),
        axis: table.axis(),
        rows: table.len(),
        min_key,
        max_key,
        path,
        sha256,
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
    if manifest.manifest.schema_version != MANIFEST_SCHEMA_VERSION {
        return Err(StandardsError::InvalidManifest {
            message: format!(
                "unsupported schema_version: {}",
                manifest.manifest.schema_version
            ),
        });
    }
    if manifest.tables.is_empty() {
        return Err(StandardsError::InvalidManifest {
            message: "manifest lists no tables".to_string(),
        });
    }

    let mut seen: BTreeSet<(Indicator, Sex)> = BTreeSet::new();
    for table in &manifest.tables {
        if !seen.insert((table.indicator, table.sex)) {
            return Err(StandardsError::DuplicateTable {
                indicator: table.indicator,
                sex: table.sex,
            });
        }
        validate_entry(table)?;
    }
    Ok(())
}

fn validate_entry(table: &ManifestTable) -> Result<(), StandardsError> {
    if let Some(sha) = &table.sha256
        && !is_valid_sha256(sha)
    {
        return Err(StandardsError::InvalidSha256 {
            path: PathBuf::from(&table.path),
            message: "sha256 must be 64 hex characters".to_string(),
        });
    }
    validate_path(&table.path)?;
    Ok(())
}

fn validate_path(path: &str) -> Result<PathBuf, StandardsError> {
    if path.contains('\\') {
        return Err(StandardsError::InvalidPath {
            path: PathBuf::from(path),
            message: "manifest path must use '/' separators".to_string(),
        });
    }

    let p = PathBuf::from(path);
    if p.is_absolute() {
        return Err(StandardsError::InvalidPath {
            path: p,
            message: "manifest path must be relative".to_string(),
        });
    }

    for c in p.components() {
        if matches!(c, Component::ParentDir) {
            return Err(StandardsError::InvalidPath {
                path: PathBuf::from(path),
                message: "manifest path must not traverse out of the standards directory"
                    .to_string(),
            });
        }
    }

    Ok(p)
}

fn read_table_file(full_path: &Path) -> Result<Vec<u8>, StandardsError> {
    std::fs::read(full_path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            StandardsError::MissingFile {
                path: full_path.to_path_buf(),
            }
        } else {
            StandardsError::io(full_path, e)
        }
    })
}
