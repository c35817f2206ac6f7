//! Type-safe enumerations for growth standards metadata.
//!
//! Reference files, CLI flags and persisted screening records all name these
//! concepts as strings. Parsing happens once at the boundary; everything past
//! it works with the closed enums below.
//!
//! # WHO Reference
//!
//! - Indicators: WHO Child Growth Standards (2006), Chapter 1
//! - Length/height tables: 45-110 cm (recumbent), 65-120 cm (standing)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Average month length in days used by WHO to convert ages.
pub const DAYS_PER_MONTH: f64 = 30.4375;

/// Biological sex of the subject, selecting the reference population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub const ALL: [Sex; 2] = [Sex::Male, Sex::Female];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }

    /// Returns the display label used in screening records ("Male"/"Female").
    pub fn label(&self) -> &'static str {
        match self {
            Sex::Male => "Male",
            Sex::Female => "Female",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Sex {
    type Err = String;

    /// Accepts the spellings found in screening records and WHO file names
    /// (case-insensitive): `male`, `m`, `boy`, `boys`, `female`, `f`, `girl`, `girls`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" | "boy" | "boys" | "1" => Ok(Sex::Male),
            "female" | "f" | "girl" | "girls" | "2" => Ok(Sex::Female),
            _ => Err(format!("Unknown sex: {s}")),
        }
    }
}

/// Unit of the independent variable a reference table is keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// Completed months of age (WHO "Month" tables).
    AgeMonths,
    /// Days of age (WHO expanded "Day" tables).
    AgeDays,
    /// Recumbent length or standing height in centimetres.
    LengthCm,
}

impl Axis {
    pub fn as_str(&self) -> &'static str {
        match self {
            Axis::AgeMonths => "age_months",
            Axis::AgeDays => "age_days",
            Axis::LengthCm => "length_cm",
        }
    }

    pub fn is_age(&self) -> bool {
        matches!(self, Axis::AgeMonths | Axis::AgeDays)
    }

    /// Short unit suffix for display ("mo", "d", "cm").
    pub fn unit(&self) -> &'static str {
        match self {
            Axis::AgeMonths => "mo",
            Axis::AgeDays => "d",
            Axis::LengthCm => "cm",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The measured quantity an indicator compares against the reference median.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasuredValue {
    WeightKg,
    HeightCm,
    Bmi,
}

impl MeasuredValue {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeasuredValue::WeightKg => "weight",
            MeasuredValue::HeightCm => "height",
            MeasuredValue::Bmi => "bmi",
        }
    }
}

/// Anthropometric indicator.
///
/// Each indicator fixes which reference table is consulted, which measured
/// value is the dependent variable, and whether the table is keyed by age or by
/// length/height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Indicator {
    /// Weight-for-age (underweight).
    WeightForAge,
    /// Length/height-for-age (stunting).
    HeightForAge,
    /// Weight-for-height, standing height 65-120 cm (wasting).
    WeightForHeight,
    /// Weight-for-length, recumbent length 45-110 cm (wasting, under two years).
    WeightForLength,
    /// BMI-for-age.
    BmiForAge,
}

impl Indicator {
    pub const ALL: [Indicator; 5] = [
        Indicator::WeightForAge,
        Indicator::HeightForAge,
        Indicator::WeightForHeight,
        Indicator::WeightForLength,
        Indicator::BmiForAge,
    ];

    /// Returns the snake_case name used in manifests and persisted columns.
    pub fn as_str(&self) -> &'static str {
        match self {
            Indicator::WeightForAge => "weight_for_age",
            Indicator::HeightForAge => "height_for_age",
            Indicator::WeightForHeight => "weight_for_height",
            Indicator::WeightForLength => "weight_for_length",
            Indicator::BmiForAge => "bmi_for_age",
        }
    }

    /// Returns the human-readable label ("Weight-for-Age").
    pub fn label(&self) -> &'static str {
        match self {
            Indicator::WeightForAge => "Weight-for-Age",
            Indicator::HeightForAge => "Height-for-Age",
            Indicator::WeightForHeight => "Weight-for-Height",
            Indicator::WeightForLength => "Weight-for-Length",
            Indicator::BmiForAge => "BMI-for-Age",
        }
    }

    /// Returns the WHO abbreviation ("wfa", "hfa", ...).
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Indicator::WeightForAge => "wfa",
            Indicator::HeightForAge => "hfa",
            Indicator::WeightForHeight => "wfh",
            Indicator::WeightForLength => "wfl",
            Indicator::BmiForAge => "bfa",
        }
    }

    /// Returns true if the independent variable is age (otherwise length/height).
    pub fn is_age_based(&self) -> bool {
        !matches!(
            self,
            Indicator::WeightForHeight | Indicator::WeightForLength
        )
    }

    /// Returns true if `axis` is a valid key unit for this indicator's tables.
    pub fn accepts_axis(&self, axis: Axis) -> bool {
        axis.is_age() == self.is_age_based()
    }

    pub fn measured_value(&self) -> MeasuredValue {
        match self {
            Indicator::WeightForAge | Indicator::WeightForHeight | Indicator::WeightForLength => {
                MeasuredValue::WeightKg
            }
            Indicator::HeightForAge => MeasuredValue::HeightCm,
            Indicator::BmiForAge => MeasuredValue::Bmi,
        }
    }

    /// Returns true if WHO's restricted z-score formula applies beyond ±3 SD.
    ///
    /// Weight-based indicators have right-skewed reference distributions; the
    /// height-for-age standard has `L = 1` and needs no correction.
    pub fn uses_restricted_zscore(&self) -> bool {
        !matches!(self, Indicator::HeightForAge)
    }

    /// WHO flag limits for biologically implausible z-scores (low, high).
    pub fn plausible_range(&self) -> (f64, f64) {
        match self {
            Indicator::WeightForAge => (-6.0, 5.0),
            Indicator::HeightForAge => (-6.0, 6.0),
            Indicator::WeightForHeight | Indicator::WeightForLength | Indicator::BmiForAge => {
                (-5.0, 5.0)
            }
        }
    }

    /// Default indicator set for a subject of the given age.
    ///
    /// - no age: weight-for-height only
    /// - under 24 months: WFA, HFA, WFL, BFA
    /// - 24 to 60 months: WFA, HFA, WFH, BFA
    /// - over 60 months: HFA, BFA
    ///
    /// Whether the age actually falls inside a table's domain is decided by the
    /// loaded tables, not here.
    pub fn applicable_for_age(age_days: Option<f64>) -> Vec<Indicator> {
        let Some(days) = age_days else {
            return vec![Indicator::WeightForHeight];
        };
        let months = days / DAYS_PER_MONTH;
        if months < 24.0 {
            vec![
                Indicator::WeightForAge,
                Indicator::HeightForAge,
                Indicator::WeightForLength,
                Indicator::BmiForAge,
            ]
        } else if months <= 60.0 {
            vec![
                Indicator::WeightForAge,
                Indicator::HeightForAge,
                Indicator::WeightForHeight,
                Indicator::BmiForAge,
            ]
        } else {
            vec![Indicator::HeightForAge, Indicator::BmiForAge]
        }
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Indicator {
    type Err = String;

    /// Parse an indicator name (case-insensitive).
    /// Accepts snake_case, kebab-case, labels and WHO abbreviations.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "weight_for_age" | "wfa" => Ok(Indicator::WeightForAge),
            "height_for_age" | "length_for_age" | "length_height_for_age" | "hfa" | "lfa"
            | "lhfa" => Ok(Indicator::HeightForAge),
            "weight_for_height" | "wfh" => Ok(Indicator::WeightForHeight),
            "weight_for_length" | "wfl" => Ok(Indicator::WeightForLength),
            "bmi_for_age" | "bfa" | "bmi" => Ok(Indicator::BmiForAge),
            _ => Err(format!("Unknown indicator: {s}")),
        }
    }
}

/// Nutritional-status category produced by the classifier.
///
/// One closed set covers every indicator; each indicator's boundary table only
/// ever yields its own subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    SeverelyUnderweight,
    Underweight,
    SeverelyStunted,
    Stunted,
    SeverelyWasted,
    Wasted,
    Normal,
    Overweight,
    Obese,
    Tall,
}

impl Category {
    /// Returns the canonical label as stored in screening records.
    pub fn label(&self) -> &'static str {
        match self {
            Category::SeverelyUnderweight => "Severely Underweight",
            Category::Underweight => "Underweight",
            Category::SeverelyStunted => "Severely Stunted",
            Category::Stunted => "Stunted",
            Category::SeverelyWasted => "Severely Wasted",
            Category::Wasted => "Wasted",
            Category::Normal => "Normal",
            Category::Overweight => "Overweight",
            Category::Obese => "Obese",
            Category::Tall => "Tall",
        }
    }

    /// Below -3 SD on any indicator.
    pub fn is_severe(&self) -> bool {
        matches!(
            self,
            Category::SeverelyUnderweight | Category::SeverelyStunted | Category::SeverelyWasted
        )
    }

    /// Moderate undernutrition (-3 to -2 SD) or any overweight band.
    pub fn is_moderate(&self) -> bool {
        matches!(
            self,
            Category::Underweight
                | Category::Stunted
                | Category::Wasted
                | Category::Overweight
                | Category::Obese
        )
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', '_'], " ");
        match normalized.as_str() {
            "severely underweight" => Ok(Category::SeverelyUnderweight),
            "underweight" => Ok(Category::Underweight),
            "severely stunted" => Ok(Category::SeverelyStunted),
            "stunted" => Ok(Category::Stunted),
            "severely wasted" => Ok(Category::SeverelyWasted),
            "wasted" => Ok(Category::Wasted),
            "normal" => Ok(Category::Normal),
            "overweight" => Ok(Category::Overweight),
            "obese" => Ok(Category::Obese),
            "tall" => Ok(Category::Tall),
            _ => Err(format!("Unknown category: {s}")),
        }
    }
}
