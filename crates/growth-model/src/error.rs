use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::enums::{Indicator, Sex};

/// Failure of a single classification step.
///
/// Table-load failures are fatal at startup; the other three kinds are
/// recovered per indicator by the assessment and reported alongside the
/// indicators that succeeded.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GrowthError {
    #[error("malformed reference data: {message}")]
    MalformedReferenceData { message: String },

    #[error("no reference table for {indicator} ({sex})")]
    UnknownIndicatorOrSex { indicator: Indicator, sex: Sex },

    #[error("{indicator} key {value} is outside the reference domain [{min}, {max}]")]
    OutOfRange {
        indicator: Indicator,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("invalid measurement: {reason}")]
    InvalidMeasurement { reason: String },
}

impl GrowthError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedReferenceData {
            message: message.into(),
        }
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidMeasurement {
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            GrowthError::MalformedReferenceData { .. } => ErrorKind::MalformedReferenceData,
            GrowthError::UnknownIndicatorOrSex { .. } => ErrorKind::UnknownIndicatorOrSex,
            GrowthError::OutOfRange { .. } => ErrorKind::OutOfRange,
            GrowthError::InvalidMeasurement { .. } => ErrorKind::InvalidMeasurement,
        }
    }
}

/// Stable discriminant of [`GrowthError`] for counting and serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    MalformedReferenceData,
    UnknownIndicatorOrSex,
    OutOfRange,
    InvalidMeasurement,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::MalformedReferenceData => "malformed_reference_data",
            ErrorKind::UnknownIndicatorOrSex => "unknown_indicator_or_sex",
            ErrorKind::OutOfRange => "out_of_range",
            ErrorKind::InvalidMeasurement => "invalid_measurement",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

pub type Result<T> = std::result::Result<T, GrowthError>;
