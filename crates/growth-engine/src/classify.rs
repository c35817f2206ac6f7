//! WHO cut-offs mapping a z-score to a nutritional-status category.

use growth_model::{
    AdultBmiResult, Bounds, Category, ClassificationResult, Indicator, ZScoreResult,
};
use serde::Serialize;

/// One half-open z-score band and the category it yields.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Band {
    pub bounds: Bounds,
    pub category: Category,
}

const fn band(low: Option<f64>, high: Option<f64>, category: Category) -> Band {
    Band {
        bounds: Bounds::new(low, high),
        category,
    }
}

const WEIGHT_FOR_AGE: [Band; 4] = [
    band(None, Some(-3.0), Category::SeverelyUnderweight),
    band(Some(-3.0), Some(-2.0), Category::Underweight),
    band(Some(-2.0), Some(2.0), Category::Normal),
    band(Some(2.0), None, Category::Overweight),
];

const HEIGHT_FOR_AGE: [Band; 4] = [
    band(None, Some(-3.0), Category::SeverelyStunted),
    band(Some(-3.0), Some(-2.0), Category::Stunted),
    band(Some(-2.0), Some(3.0), Category::Normal),
    band(Some(3.0), None, Category::Tall),
];

const WASTING: [Band; 5] = [
    band(None, Some(-3.0), Category::SeverelyWasted),
    band(Some(-3.0), Some(-2.0), Category::Wasted),
    band(Some(-2.0), Some(1.0), Category::Normal),
    band(Some(1.0), Some(2.0), Category::Overweight),
    band(Some(2.0), None, Category::Obese),
];

/// Adult BMI cut-offs in kg/m2.
const ADULT_BMI: [Band; 4] = [
    band(None, Some(18.5), Category::Underweight),
    band(Some(18.5), Some(25.0), Category::Normal),
    band(Some(25.0), Some(30.0), Category::Overweight),
    band(Some(30.0), None, Category::Obese),
];

/// Ordered, contiguous bands for `indicator`, lowest first.
pub fn boundaries(indicator: Indicator) -> &'static [Band] {
    match indicator {
        Indicator::WeightForAge => &WEIGHT_FOR_AGE,
        Indicator::HeightForAge => &HEIGHT_FOR_AGE,
        Indicator::WeightForHeight | Indicator::WeightForLength | Indicator::BmiForAge => {
            &WASTING
        }
    }
}

/// Open-ended top band of `indicator`.
fn top_band(indicator: Indicator) -> Band {
    match indicator {
        Indicator::WeightForAge => WEIGHT_FOR_AGE[WEIGHT_FOR_AGE.len() - 1],
        Indicator::HeightForAge => HEIGHT_FOR_AGE[HEIGHT_FOR_AGE.len() - 1],
        Indicator::WeightForHeight | Indicator::WeightForLength | Indicator::BmiForAge => {
            WASTING[WASTING.len() - 1]
        }
    }
}

/// Category and band for an unrounded z-score. Total: NaN lands in the top band.
pub fn classify(indicator: Indicator, z: f64) -> (Category, Bounds) {
    let band = boundaries(indicator)
        .iter()
        .find(|band| band.bounds.contains(z))
        .copied()
        .unwrap_or_else(|| top_band(indicator));
    (band.category, band.bounds)
}

/// Adult BMI bands, lowest first.
pub fn adult_bmi_boundaries() -> &'static [Band] {
    &ADULT_BMI
}

/// Classify an adult BMI value against the fixed cut-offs.
pub fn classify_adult_bmi(bmi: f64) -> AdultBmiResult {
    let band = ADULT_BMI
        .iter()
        .find(|band| band.bounds.contains(bmi))
        .copied()
        .unwrap_or(ADULT_BMI[ADULT_BMI.len() - 1]);
    AdultBmiResult {
        bmi,
        category: band.category,
        boundary_used: band.bounds,
    }
}

/// Classify a computed z-score.
pub fn classify_score(score: ZScoreResult) -> ClassificationResult {
    let (category, boundary_used) = classify(score.indicator, score.z_score);
    ClassificationResult {
        indicator: score.indicator,
        z_score: score.z_score,
        category,
        boundary_used,
        score,
    }
}
