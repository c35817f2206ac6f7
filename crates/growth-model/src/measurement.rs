//! Subject measurement record.
//!
//! Every field apart from sex is optional: screening data is often partial and
//! the assessment reports a missing value per indicator instead of rejecting
//! the whole record.

use serde::{Deserialize, Serialize};

use crate::enums::{DAYS_PER_MONTH, Indicator, MeasuredValue, Sex};
use crate::error::{GrowthError, Result};

/// Upper plausibility limit for body weight.
pub const MAX_WEIGHT_KG: f64 = 200.0;

/// Upper plausibility limit for length/height.
pub const MAX_HEIGHT_CM: f64 = 300.0;

/// Age from which BMI is classified with adult cut-offs (20 years).
pub const ADULT_AGE_MONTHS: f64 = 240.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub sex: Sex,
    pub age_days: Option<f64>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
}

impl Measurement {
    pub fn new(sex: Sex) -> Self {
        Self {
            sex,
            age_days: None,
            weight_kg: None,
            height_cm: None,
        }
    }

    #[must_use]
    pub fn with_age_days(mut self, days: f64) -> Self {
        self.age_days = Some(days);
        self
    }

    #[must_use]
    pub fn with_age_months(mut self, months: f64) -> Self {
        self.age_days = Some(months * DAYS_PER_MONTH);
        self
    }

    #[must_use]
    pub fn with_weight(mut self, kg: f64) -> Self {
        self.weight_kg = Some(kg);
        self
    }

    #[must_use]
    pub fn with_height(mut self, cm: f64) -> Self {
        self.height_cm = Some(cm);
        self
    }

    pub fn age_months(&self) -> Option<f64> {
        self.age_days.map(|days| days / DAYS_PER_MONTH)
    }

    /// True from 20 years of age, when BMI-for-age gives way to adult BMI.
    pub fn is_adult(&self) -> bool {
        self.age_months()
            .is_some_and(|months| months >= ADULT_AGE_MONTHS)
    }

    /// Body-mass index, `weight_kg / height_m^2`, when both are present.
    pub fn bmi(&self) -> Option<f64> {
        let weight = self.weight_kg?;
        let height_m = self.height_cm? / 100.0;
        Some(weight / (height_m * height_m))
    }

    /// Validated age in days.
    pub fn checked_age_days(&self) -> Result<f64> {
        let days = self
            .age_days
            .ok_or_else(|| GrowthError::invalid("age is required"))?;
        if !days.is_finite() || days < 0.0 {
            return Err(GrowthError::invalid(format!(
                "age must be a non-negative number of days, got {days}"
            )));
        }
        Ok(days)
    }

    /// Validated weight in kilograms.
    pub fn checked_weight(&self) -> Result<f64> {
        let weight = self
            .weight_kg
            .ok_or_else(|| GrowthError::invalid("weight is required"))?;
        check_range("weight", weight, MAX_WEIGHT_KG, "kg")
    }

    /// Validated length/height in centimetres.
    pub fn checked_height(&self) -> Result<f64> {
        let height = self
            .height_cm
            .ok_or_else(|| GrowthError::invalid("height is required"))?;
        check_range("height", height, MAX_HEIGHT_CM, "cm")
    }

    /// BMI from validated weight and height.
    pub fn checked_bmi(&self) -> Result<f64> {
        let weight = self.checked_weight()?;
        let height_m = self.checked_height()? / 100.0;
        Ok(weight / (height_m * height_m))
    }

    /// The dependent measured value for `indicator`.
    pub fn value_for(&self, indicator: Indicator) -> Result<f64> {
        match indicator.measured_value() {
            MeasuredValue::WeightKg => self.checked_weight(),
            MeasuredValue::HeightCm => self.checked_height(),
            MeasuredValue::Bmi => self.checked_bmi(),
        }
    }
}

fn check_range(name: &str, value: f64, max: f64, unit: &str) -> Result<f64> {
    if !value.is_finite() || value <= 0.0 {
        return Err(GrowthError::invalid(format!(
            "{name} must be a positive number, got {value}"
        )));
    }
    if value > max {
        return Err(GrowthError::invalid(format!(
            "{name} {value} {unit} exceeds the plausible maximum of {max} {unit}"
        )));
    }
    Ok(value)
}
