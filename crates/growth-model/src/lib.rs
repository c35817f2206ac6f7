#![deny(unsafe_code)]

pub mod classification;
pub mod enums;
pub mod error;
pub mod measurement;
pub mod reference;

pub use classification::{
    AdultBmiResult, Bounds, ClassificationResult, ZScoreResult, normal_cdf, round_to,
};
pub use enums::{Axis, Category, DAYS_PER_MONTH, Indicator, MeasuredValue, Sex};
pub use error::{ErrorKind, GrowthError, Result};
pub use measurement::{ADULT_AGE_MONTHS, MAX_HEIGHT_CM, MAX_WEIGHT_KG, Measurement};
pub use reference::{Lms, ReferenceRow};
