//! Tests for growth-model types.

use std::str::FromStr;

use growth_model::{
    Axis, Bounds, Category, ErrorKind, GrowthError, Indicator, MAX_WEIGHT_KG, Measurement, Sex,
    normal_cdf, round_to,
};

#[test]
fn sex_from_str_parsing() {
    assert_eq!(Sex::from_str("Male").unwrap(), Sex::Male);
    assert_eq!(Sex::from_str(" girls ").unwrap(), Sex::Female);
    assert_eq!(Sex::from_str("F").unwrap(), Sex::Female);
    assert!(Sex::from_str("unknown").is_err());
}

#[test]
fn indicator_from_str_accepts_names_labels_and_abbreviations() {
    assert_eq!(
        Indicator::from_str("weight_for_age").unwrap(),
        Indicator::WeightForAge
    );
    assert_eq!(
        Indicator::from_str("Weight-for-Height").unwrap(),
        Indicator::WeightForHeight
    );
    assert_eq!(Indicator::from_str("LFA").unwrap(), Indicator::HeightForAge);
    assert_eq!(Indicator::from_str("bmi").unwrap(), Indicator::BmiForAge);
    assert_eq!(Indicator::from_str("wfl").unwrap(), Indicator::WeightForLength);
    assert!(Indicator::from_str("head_circumference").is_err());
}

#[test]
fn indicator_names_round_trip() {
    for indicator in Indicator::ALL {
        assert_eq!(Indicator::from_str(indicator.as_str()).unwrap(), indicator);
        assert_eq!(Indicator::from_str(indicator.label()).unwrap(), indicator);
    }
}

#[test]
fn indicator_axis_and_measured_value() {
    assert!(Indicator::WeightForAge.accepts_axis(Axis::AgeMonths));
    assert!(Indicator::BmiForAge.accepts_axis(Axis::AgeDays));
    assert!(!Indicator::HeightForAge.accepts_axis(Axis::LengthCm));
    assert!(Indicator::WeightForLength.accepts_axis(Axis::LengthCm));
    assert!(!Indicator::WeightForHeight.accepts_axis(Axis::AgeMonths));
    assert!(!Indicator::HeightForAge.uses_restricted_zscore());
    assert!(Indicator::BmiForAge.uses_restricted_zscore());
}

#[test]
fn applicable_indicators_follow_age_bands() {
    assert_eq!(
        Indicator::applicable_for_age(None),
        vec![Indicator::WeightForHeight]
    );
    let infant = Indicator::applicable_for_age(Some(200.0));
    assert!(infant.contains(&Indicator::WeightForLength));
    assert!(!infant.contains(&Indicator::WeightForHeight));
    let toddler = Indicator::applicable_for_age(Some(36.0 * 30.4375));
    assert!(toddler.contains(&Indicator::WeightForHeight));
    let school_age = Indicator::applicable_for_age(Some(96.0 * 30.4375));
    assert_eq!(
        school_age,
        vec![Indicator::HeightForAge, Indicator::BmiForAge]
    );
}

#[test]
fn category_labels_round_trip() {
    let categories = [
        Category::SeverelyUnderweight,
        Category::Underweight,
        Category::SeverelyStunted,
        Category::Stunted,
        Category::SeverelyWasted,
        Category::Wasted,
        Category::Normal,
        Category::Overweight,
        Category::Obese,
        Category::Tall,
    ];
    for category in categories {
        assert_eq!(Category::from_str(category.label()).unwrap(), category);
    }
    assert!(Category::SeverelyWasted.is_severe());
    assert!(Category::Obese.is_moderate());
    assert!(!Category::Tall.is_moderate());
    assert!(!Category::Normal.is_severe());
}

#[test]
fn measurement_missing_fields_are_invalid() {
    let measurement = Measurement::new(Sex::Male).with_weight(12.0);
    let err = measurement.checked_height().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidMeasurement);
    assert!(err.to_string().contains("height is required"));
    assert!(measurement.checked_age_days().is_err());
    assert!(measurement.value_for(Indicator::BmiForAge).is_err());
    assert_eq!(
        measurement.value_for(Indicator::WeightForAge).unwrap(),
        12.0
    );
}

#[test]
fn measurement_rejects_non_positive_and_implausible_values() {
    let zero = Measurement::new(Sex::Female).with_weight(0.0);
    assert!(zero.checked_weight().is_err());
    let negative = Measurement::new(Sex::Female).with_height(-4.0);
    assert!(negative.checked_height().is_err());
    let heavy = Measurement::new(Sex::Female).with_weight(MAX_WEIGHT_KG + 1.0);
    let err = heavy.checked_weight().unwrap_err();
    assert!(err.to_string().contains("plausible maximum"));
    let nan_age = Measurement::new(Sex::Female).with_age_days(f64::NAN);
    assert!(nan_age.checked_age_days().is_err());
}

#[test]
fn age_months_converts_with_who_month_length() {
    let measurement = Measurement::new(Sex::Male).with_age_months(24.0);
    let days = measurement.age_days.unwrap();
    assert!((days - 730.5).abs() < 1e-9);
    assert!((measurement.age_months().unwrap() - 24.0).abs() < 1e-12);
}

#[test]
fn error_kinds_are_distinct() {
    let errors = [
        GrowthError::malformed("bad row"),
        GrowthError::UnknownIndicatorOrSex {
            indicator: Indicator::BmiForAge,
            sex: Sex::Male,
        },
        GrowthError::OutOfRange {
            indicator: Indicator::WeightForHeight,
            value: 130.0,
            min: 65.0,
            max: 120.0,
        },
        GrowthError::invalid("weight is required"),
    ];
    let kinds: Vec<&str> = errors.iter().map(|e| e.kind().as_str()).collect();
    assert_eq!(
        kinds,
        vec![
            "malformed_reference_data",
            "unknown_indicator_or_sex",
            "out_of_range",
            "invalid_measurement"
        ]
    );
    assert!(errors[2].to_string().contains("130"));
}

#[test]
fn bounds_are_half_open() {
    let band = Bounds::new(Some(-3.0), Some(-2.0));
    assert!(band.contains(-3.0));
    assert!(band.contains(-2.5));
    assert!(!band.contains(-2.0));
    assert_eq!(band.to_string(), "[-3, -2)");
    assert_eq!(Bounds::new(None, Some(-3.0)).to_string(), "(-inf, -3)");
    assert_eq!(Bounds::new(Some(2.0), None).to_string(), "[+2, +inf)");
}

#[test]
fn normal_cdf_matches_known_values() {
    assert!((normal_cdf(0.0) - 0.5).abs() < 1e-12);
    assert!((normal_cdf(-2.0) - 0.022750).abs() < 1e-5);
    assert!((normal_cdf(1.0) - 0.841345).abs() < 1e-5);
    assert_eq!(round_to(2.345_678, 2), 2.35);
}
