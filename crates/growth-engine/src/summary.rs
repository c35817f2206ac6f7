//! Aggregate statistics over many assessments.

use std::collections::BTreeMap;

use growth_model::{Category, ErrorKind, Indicator, round_to};
use serde::Serialize;

use crate::assessment::{GrowthAssessment, RiskLevel};

/// Dashboard counts for a screening campaign.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScreeningSummary {
    pub total_screened: usize,
    pub categories: BTreeMap<Indicator, BTreeMap<Category, usize>>,
    pub failures: BTreeMap<Indicator, BTreeMap<ErrorKind, usize>>,
    pub risk_levels: BTreeMap<RiskLevel, usize>,
    /// Subjects whose risk level is severe.
    pub high_risk_cases: usize,
    /// Severe acute malnutrition: severely wasted on weight-for-height or
    /// weight-for-length.
    pub sam_cases: usize,
    /// Severely wasted on any wasting indicator, BMI-for-age included.
    pub severely_wasted: usize,
    /// Share of screened subjects per category, in percent (1 dp).
    pub category_percentages: BTreeMap<Indicator, BTreeMap<Category, f64>>,
}

impl ScreeningSummary {
    pub fn from_assessments<'a, I>(assessments: I) -> Self
    where
        I: IntoIterator<Item = &'a GrowthAssessment>,
    {
        let mut summary = Self::default();
        for assessment in assessments {
            summary.record(assessment);
        }
        summary.update_percentages();
        summary
    }

    fn record(&mut self, assessment: &GrowthAssessment) {
        self.total_screened += 1;

        for (indicator, category) in assessment.categories() {
            *self
                .categories
                .entry(indicator)
                .or_default()
                .entry(category)
                .or_default() += 1;
        }
        for (indicator, error) in assessment.failures() {
            *self
                .failures
                .entry(indicator)
                .or_default()
                .entry(error.kind())
                .or_default() += 1;
        }

        let risk = assessment.risk_level();
        *self.risk_levels.entry(risk).or_default() += 1;
        if risk == RiskLevel::Severe {
            self.high_risk_cases += 1;
        }

        let severely_wasted_on = |indicator| {
            assessment.category(indicator) == Some(Category::SeverelyWasted)
        };
        if severely_wasted_on(Indicator::WeightForHeight)
            || severely_wasted_on(Indicator::WeightForLength)
        {
            self.sam_cases += 1;
        }
        if assessment
            .categories()
            .any(|(_, category)| category == Category::SeverelyWasted)
        {
            self.severely_wasted += 1;
        }
    }

    fn update_percentages(&mut self) {
        let total = self.total_screened;
        self.category_percentages = self
            .categories
            .iter()
            .map(|(indicator, counts)| {
                let shares = counts
                    .iter()
                    .map(|(category, count)| (*category, percentage(*count, total)))
                    .collect();
                (*indicator, shares)
            })
            .collect();
    }

    pub fn count(&self, indicator: Indicator, category: Category) -> usize {
        self.categories
            .get(&indicator)
            .and_then(|counts| counts.get(&category))
            .copied()
            .unwrap_or(0)
    }

    pub fn failure_count(&self) -> usize {
        self.failures
            .values()
            .flat_map(BTreeMap::values)
            .sum()
    }
}

fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round_to(count as f64 / total as f64 * 100.0, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_rounds_to_one_decimal() {
        assert_eq!(percentage(1, 3), 33.3);
        assert_eq!(percentage(2, 3), 66.7);
        assert_eq!(percentage(0, 0), 0.0);
    }

    #[test]
    fn empty_summary() {
        let none: Vec<GrowthAssessment> = Vec::new();
        let summary = ScreeningSummary::from_assessments(&none);
        assert_eq!(summary.total_screened, 0);
        assert_eq!(summary.failure_count(), 0);
        assert!(summary.category_percentages.is_empty());
    }
}
