#![deny(unsafe_code)]

use std::path::PathBuf;

use growth_model::{GrowthError, Indicator, Sex};

/// Failure while loading reference tables. Every variant is fatal: the
/// process must not classify against partial or corrupt tables.
#[derive(Debug, thiserror::Error)]
pub enum StandardsError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML manifest {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid manifest: {message}")]
    InvalidManifest { message: String },

    #[error("invalid sha256 for {path}: {message}")]
    InvalidSha256 { path: PathBuf, message: String },

    #[error("invalid manifest path {path}: {message}")]
    InvalidPath { path: PathBuf, message: String },

    #[error("missing file listed in manifest: {path}")]
    MissingFile { path: PathBuf },

    #[error("sha256 mismatch for {path} (expected {expected}, got {actual})")]
    Sha256Mismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("duplicate reference table for {indicator} ({sex})")]
    DuplicateTable { indicator: Indicator, sex: Sex },

    #[error("failed to parse CSV {origin}: {message}")]
    Csv { origin: String, message: String },

    #[error("malformed reference data in {origin}: {message}")]
    MalformedReferenceData { origin: String, message: String },
}

impl StandardsError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn malformed(origin: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedReferenceData {
            origin: origin.into(),
            message: message.into(),
        }
    }
}

impl From<StandardsError> for GrowthError {
    fn from(error: StandardsError) -> Self {
        GrowthError::malformed(error.to_string())
    }
}
