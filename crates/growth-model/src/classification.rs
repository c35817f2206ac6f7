//! Z-score and classification result records.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::enums::{Category, Indicator};
use crate::reference::Lms;

/// Decimal places used when reporting z-scores.
pub const Z_SCORE_DECIMALS: i32 = 2;

/// Decimal places used when reporting percentiles.
pub const PERCENTILE_DECIMALS: i32 = 1;

/// Decimal places used when reporting BMI values.
pub const BMI_DECIMALS: i32 = 2;

/// Round `value` half away from zero to `places` decimal places.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Standard normal cumulative distribution function.
pub fn normal_cdf(z: f64) -> f64 {
    0.5 * (1.0 + libm::erf(z / std::f64::consts::SQRT_2))
}

fn serialize_z<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(round_to(*value, Z_SCORE_DECIMALS))
}

fn serialize_percentile<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(round_to(*value, PERCENTILE_DECIMALS))
}

fn serialize_bmi<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(round_to(*value, BMI_DECIMALS))
}

/// Output of the z-score calculation for one indicator.
///
/// `z_score` is kept unrounded; serialization and [`Self::reported_z_score`]
/// round it for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ZScoreResult {
    pub indicator: Indicator,
    #[serde(serialize_with = "serialize_z")]
    pub z_score: f64,
    #[serde(flatten)]
    pub lms: Lms,
    /// Independent value looked up, in the table's axis unit.
    pub key: f64,
    /// Measured dependent value (weight, height or BMI).
    pub measured: f64,
    /// False when `key` matched a table row exactly.
    pub interpolated: bool,
    /// Percentile of the reference population below `z_score`.
    #[serde(serialize_with = "serialize_percentile")]
    pub percentile: f64,
    /// True when `z_score` is outside WHO's biologically plausible limits.
    pub implausible: bool,
    /// True when `z_score` was clamped to the indicator's plausible range.
    pub capped: bool,
}

impl ZScoreResult {
    pub fn new(
        indicator: Indicator,
        z_score: f64,
        lms: Lms,
        key: f64,
        measured: f64,
        interpolated: bool,
    ) -> Self {
        let (low, high) = indicator.plausible_range();
        Self {
            indicator,
            z_score,
            lms,
            key,
            measured,
            interpolated,
            percentile: normal_cdf(z_score) * 100.0,
            implausible: z_score < low || z_score > high,
            capped: false,
        }
    }

    /// Mark the score as clamped. A clamped score is always implausible.
    #[must_use]
    pub fn with_capped(mut self, capped: bool) -> Self {
        self.capped = capped;
        self.implausible |= capped;
        self
    }

    pub fn reported_z_score(&self) -> f64 {
        round_to(self.z_score, Z_SCORE_DECIMALS)
    }

    pub fn reported_percentile(&self) -> f64 {
        round_to(self.percentile, PERCENTILE_DECIMALS)
    }
}

/// Half-open z-score interval `[low, high)`; `None` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub low: Option<f64>,
    pub high: Option<f64>,
}

impl Bounds {
    pub const fn new(low: Option<f64>, high: Option<f64>) -> Self {
        Self { low, high }
    }

    pub fn contains(&self, z: f64) -> bool {
        self.low.is_none_or(|low| z >= low) && self.high.is_none_or(|high| z < high)
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.low, self.high) {
            (Some(low), Some(high)) => write!(f, "[{low:+}, {high:+})"),
            (Some(low), None) => write!(f, "[{low:+}, +inf)"),
            (None, Some(high)) => write!(f, "(-inf, {high:+})"),
            (None, None) => write!(f, "(-inf, +inf)"),
        }
    }
}

/// Category assigned to one indicator for one subject.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub indicator: Indicator,
    #[serde(serialize_with = "serialize_z")]
    pub z_score: f64,
    pub category: Category,
    pub boundary_used: Bounds,
    /// The z-score calculation this classification was made from.
    pub score: ZScoreResult,
}

impl ClassificationResult {
    pub fn label(&self) -> &'static str {
        self.category.label()
    }
}

/// Adult BMI category from fixed cut-offs; no z-score is involved.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AdultBmiResult {
    #[serde(serialize_with = "serialize_bmi")]
    pub bmi: f64,
    pub category: Category,
    /// BMI interval (kg/m2) the value fell in.
    pub boundary_used: Bounds,
}

impl AdultBmiResult {
    pub fn label(&self) -> &'static str {
        self.category.label()
    }

    pub fn reported_bmi(&self) -> f64 {
        round_to(self.bmi, BMI_DECIMALS)
    }
}
