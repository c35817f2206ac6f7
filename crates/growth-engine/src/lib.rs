#![deny(unsafe_code)]

//! Growth standards classification: LMS interpolation, z-scores, WHO
//! category cut-offs and per-subject assessment.
//!
//! Everything here is pure computation over a [`ReferenceTableStore`] loaded
//! once at startup; no I/O happens after load.
//!
//! [`ReferenceTableStore`]: growth_standards::ReferenceTableStore

pub mod age;
pub mod assessment;
pub mod classify;
pub mod interpolate;
pub mod summary;
pub mod zscore;

pub use age::{age_in_days, age_in_months, completed_months_rounded, parse_date};
pub use assessment::{Assessor, GrowthAssessment, RiskLevel};
pub use classify::{
    Band, adult_bmi_boundaries, boundaries, classify, classify_adult_bmi, classify_score,
};
pub use interpolate::{Interpolation, interpolate};
pub use summary::ScreeningSummary;
pub use zscore::{ZScore, lms_zscore, value_at, zscore};
