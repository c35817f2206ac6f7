//! Per-subject assessment across several indicators.

use std::collections::BTreeMap;
use std::fmt;

use growth_model::{
    AdultBmiResult, Axis, Category, ClassificationResult, DAYS_PER_MONTH, ErrorKind,
    GrowthError, Indicator, Measurement, Result, Sex, ZScoreResult,
};
use growth_standards::ReferenceTableStore;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use tracing::{debug, debug_span};

use crate::classify::{classify_adult_bmi, classify_score};
use crate::interpolate::interpolate;
use crate::zscore::zscore;

/// Overall nutritional risk derived from the categories of one assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Moderate,
    Severe,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 3] = [RiskLevel::Low, RiskLevel::Moderate, RiskLevel::Severe];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Moderate => "moderate",
            RiskLevel::Severe => "severe",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::Severe => "Severe",
        }
    }

    /// General advice for a subject at this risk level.
    pub fn recommendations(&self) -> &'static [&'static str] {
        match self {
            RiskLevel::Severe => &[
                "Immediate medical attention required",
                "Refer to pediatric nutritionist",
                "Consider hospitalization for severe malnutrition",
            ],
            RiskLevel::Moderate => &[
                "Schedule follow-up within 2 weeks",
                "Provide nutritional counseling",
                "Monitor growth closely",
            ],
            RiskLevel::Low => &[
                "Continue regular monitoring",
                "Maintain healthy diet and lifestyle",
            ],
        }
    }

    fn of(category: Category) -> Self {
        if category.is_severe() {
            RiskLevel::Severe
        } else if category.is_moderate() {
            RiskLevel::Moderate
        } else {
            RiskLevel::Low
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Advice added when an indicator lands in a specific category.
const INDICATOR_ADVICE: [(Indicator, Category, &str); 3] = [
    (
        Indicator::WeightForAge,
        Category::Underweight,
        "Focus on weight gain strategies",
    ),
    (
        Indicator::HeightForAge,
        Category::Stunted,
        "Address stunting concerns",
    ),
    (
        Indicator::BmiForAge,
        Category::Overweight,
        "Implement healthy weight management",
    ),
];

fn log_failure(indicator: Indicator, error: &GrowthError) {
    debug!(
        indicator = indicator.as_str(),
        kind = error.kind().as_str(),
        "indicator not assessed"
    );
}

/// Runs indicators for measurements against a shared, read-only store.
#[derive(Debug, Clone, Copy)]
pub struct Assessor<'a> {
    store: &'a ReferenceTableStore,
}

impl<'a> Assessor<'a> {
    pub fn new(store: &'a ReferenceTableStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &'a ReferenceTableStore {
        self.store
    }

    /// Assess every requested indicator. A failing indicator is recorded next
    /// to the ones that succeeded; it never aborts the others.
    ///
    /// BMI-for-age for an adult is classified with the adult cut-offs and
    /// reported through [`GrowthAssessment::adult_bmi`].
    pub fn assess(&self, measurement: &Measurement, indicators: &[Indicator]) -> GrowthAssessment {
        let span = debug_span!(
            "assess",
            sex = measurement.sex.as_str(),
            indicators = indicators.len()
        );
        let _guard = span.enter();

        let adult = measurement.is_adult();
        let mut results = BTreeMap::new();
        let mut adult_bmi = None;
        for &indicator in indicators {
            if adult && indicator == Indicator::BmiForAge {
                if adult_bmi.is_none() {
                    let outcome = Self::adult_bmi(measurement);
                    if let Err(error) = &outcome {
                        log_failure(indicator, error);
                    }
                    adult_bmi = Some(outcome);
                }
                continue;
            }
            if results.contains_key(&indicator) {
                continue;
            }
            let outcome = self.assess_indicator(measurement, indicator);
            if let Err(error) = &outcome {
                log_failure(indicator, error);
            }
            results.insert(indicator, outcome);
        }

        GrowthAssessment {
            sex: measurement.sex,
            age_days: measurement.age_days,
            results,
            adult_bmi,
        }
    }

    /// Adult BMI category for `measurement`; needs weight and height only.
    pub fn adult_bmi(measurement: &Measurement) -> Result<AdultBmiResult> {
        measurement.checked_bmi().map(classify_adult_bmi)
    }

    /// Assess the default indicator set for the subject's age.
    pub fn assess_applicable(&self, measurement: &Measurement) -> GrowthAssessment {
        self.assess(
            measurement,
            &Indicator::applicable_for_age(measurement.age_days),
        )
    }

    pub fn assess_indicator(
        &self,
        measurement: &Measurement,
        indicator: Indicator,
    ) -> Result<ClassificationResult> {
        self.zscore(measurement, indicator).map(classify_score)
    }

    /// Z-score for one indicator without classifying it.
    pub fn zscore(&self, measurement: &Measurement, indicator: Indicator) -> Result<ZScoreResult> {
        let table = self.store.lookup(indicator, measurement.sex)?;
        let key = match table.axis() {
            Axis::AgeDays => measurement.checked_age_days()?,
            Axis::AgeMonths => measurement.checked_age_days()? / DAYS_PER_MONTH,
            Axis::LengthCm => measurement.checked_height()?,
        };
        let measured = measurement.value_for(indicator)?;
        let found = interpolate(table, key)?;
        let z = zscore(indicator, measured, found.lms)?;
        Ok(ZScoreResult::new(
            indicator,
            z.value,
            found.lms,
            key,
            measured,
            found.interpolated,
        )
        .with_capped(z.capped))
    }
}

/// Results of one subject's assessment, keyed by indicator.
#[derive(Debug, Clone, PartialEq)]
pub struct GrowthAssessment {
    sex: Sex,
    age_days: Option<f64>,
    results: BTreeMap<Indicator, Result<ClassificationResult>>,
    adult_bmi: Option<Result<AdultBmiResult>>,
}

impl GrowthAssessment {
    pub fn sex(&self) -> Sex {
        self.sex
    }

    pub fn age_days(&self) -> Option<f64> {
        self.age_days
    }

    /// Z-score based results. Adult BMI is kept apart in [`Self::adult_bmi`].
    pub fn results(&self) -> &BTreeMap<Indicator, Result<ClassificationResult>> {
        &self.results
    }

    pub fn get(&self, indicator: Indicator) -> Option<&Result<ClassificationResult>> {
        self.results.get(&indicator)
    }

    /// Adult BMI outcome, present when BMI-for-age was requested for an adult.
    pub fn adult_bmi(&self) -> Option<&Result<AdultBmiResult>> {
        self.adult_bmi.as_ref()
    }

    pub fn successes(&self) -> impl Iterator<Item = &ClassificationResult> {
        self.results.values().filter_map(|outcome| outcome.as_ref().ok())
    }

    /// Failed indicators, adult BMI included.
    pub fn failures(&self) -> impl Iterator<Item = (Indicator, &GrowthError)> {
        let adult = self
            .adult_bmi
            .as_ref()
            .and_then(|outcome| outcome.as_ref().err())
            .map(|error| (Indicator::BmiForAge, error));
        self.results
            .iter()
            .filter_map(|(indicator, outcome)| outcome.as_ref().err().map(|e| (*indicator, e)))
            .chain(adult)
    }

    /// Category per assessed indicator; adult BMI counts as BMI-for-age.
    pub fn categories(&self) -> impl Iterator<Item = (Indicator, Category)> + '_ {
        let adult = self
            .adult_bmi
            .as_ref()
            .and_then(|outcome| outcome.as_ref().ok())
            .map(|result| (Indicator::BmiForAge, result.category));
        self.successes()
            .map(|result| (result.indicator, result.category))
            .chain(adult)
    }

    pub fn category(&self, indicator: Indicator) -> Option<Category> {
        self.categories()
            .find(|(assessed, _)| *assessed == indicator)
            .map(|(_, category)| category)
    }

    pub fn len(&self) -> usize {
        self.results.len() + usize::from(self.adult_bmi.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when at least one indicator produced a category.
    pub fn is_assessed(&self) -> bool {
        self.categories().next().is_some()
    }

    /// True when indicators were requested and none of them succeeded.
    pub fn all_failed(&self) -> bool {
        !self.is_empty() && !self.is_assessed()
    }

    pub fn risk_level(&self) -> RiskLevel {
        self.categories()
            .map(|(_, category)| RiskLevel::of(category))
            .max()
            .unwrap_or(RiskLevel::Low)
    }

    /// Indicators whose category raised the risk level above low.
    pub fn risk_factors(&self) -> Vec<(Indicator, Category)> {
        self.categories()
            .filter(|(_, category)| RiskLevel::of(*category) > RiskLevel::Low)
            .collect()
    }

    /// Follow-up advice: the risk level's general advice, then advice for
    /// specific findings. Empty when nothing could be assessed.
    pub fn recommendations(&self) -> Vec<&'static str> {
        if !self.is_assessed() {
            return Vec::new();
        }
        let mut advice = self.risk_level().recommendations().to_vec();
        advice.extend(
            INDICATOR_ADVICE
                .iter()
                .filter(|(indicator, category, _)| self.category(*indicator) == Some(*category))
                .map(|(_, _, text)| *text),
        );
        advice
    }
}

#[derive(Serialize)]
#[serde(tag = "status")]
enum OutcomeView<'a> {
    #[serde(rename = "ok")]
    Assessed(&'a ClassificationResult),
    #[serde(rename = "error")]
    Failed {
        indicator: Indicator,
        kind: ErrorKind,
        message: String,
    },
}

#[derive(Serialize)]
#[serde(tag = "status")]
enum AdultBmiView<'a> {
    #[serde(rename = "ok")]
    Assessed(&'a AdultBmiResult),
    #[serde(rename = "error")]
    Failed { kind: ErrorKind, message: String },
}

impl Serialize for GrowthAssessment {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let outcomes: Vec<OutcomeView<'_>> = self
            .results
            .iter()
            .map(|(indicator, outcome)| match outcome {
                Ok(result) => OutcomeView::Assessed(result),
                Err(error) => OutcomeView::Failed {
                    indicator: *indicator,
                    kind: error.kind(),
                    message: error.to_string(),
                },
            })
            .collect();

        let mut state = serializer.serialize_struct("GrowthAssessment", 6)?;
        state.serialize_field("sex", &self.sex)?;
        state.serialize_field("age_days", &self.age_days)?;
        state.serialize_field("risk_level", &self.risk_level())?;
        state.serialize_field("results", &outcomes)?;
        match &self.adult_bmi {
            Some(Ok(result)) => {
                state.serialize_field("adult_bmi", &AdultBmiView::Assessed(result))?;
            }
            Some(Err(error)) => state.serialize_field(
                "adult_bmi",
                &AdultBmiView::Failed {
                    kind: error.kind(),
                    message: error.to_string(),
                },
            )?,
            None => state.skip_field("adult_bmi")?,
        }
        state.serialize_field("recommendations", &self.recommendations())?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_level_ordering() {
        assert!(RiskLevel::Severe > RiskLevel::Moderate);
        assert!(RiskLevel::Moderate > RiskLevel::Low);
        assert_eq!(RiskLevel::of(Category::SeverelyStunted), RiskLevel::Severe);
        assert_eq!(RiskLevel::of(Category::Obese), RiskLevel::Moderate);
        assert_eq!(RiskLevel::of(Category::Tall), RiskLevel::Low);
        assert_eq!(RiskLevel::of(Category::Normal), RiskLevel::Low);
    }

    #[test]
    fn each_risk_level_has_advice() {
        for level in RiskLevel::ALL {
            assert!(!level.recommendations().is_empty());
        }
        assert_eq!(
            RiskLevel::Severe.recommendations()[0],
            "Immediate medical attention required"
        );
    }

    #[test]
    fn empty_store_reports_unknown_tables() {
        let store = ReferenceTableStore::default();
        let assessment = Assessor::new(&store).assess(
            &Measurement::new(Sex::Male).with_weight(10.0),
            &[Indicator::WeightForAge, Indicator::WeightForAge],
        );
        assert_eq!(assessment.len(), 1);
        assert!(assessment.all_failed());
        assert_eq!(assessment.risk_level(), RiskLevel::Low);
        assert!(assessment.recommendations().is_empty());
        let (_, error) = assessment.failures().next().unwrap();
        assert_eq!(error.kind(), ErrorKind::UnknownIndicatorOrSex);
    }
}
