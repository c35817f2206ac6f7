use serde::{Deserialize, Serialize};

use crate::enums::Sex;

/// Box-Cox power (L), median (M) and coefficient of variation (S).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lms {
    #[serde(rename = "L")]
    pub l: f64,
    #[serde(rename = "M")]
    pub m: f64,
    #[serde(rename = "S")]
    pub s: f64,
}

impl Lms {
    pub fn new(l: f64, m: f64, s: f64) -> Self {
        Self { l, m, s }
    }

    pub fn is_finite(&self) -> bool {
        self.l.is_finite() && self.m.is_finite() && self.s.is_finite()
    }
}

/// One row of a growth standard table.
///
/// `key` is the independent variable in the owning table's axis unit
/// (months, days or centimetres).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceRow {
    pub key: f64,
    pub sex: Sex,
    #[serde(flatten)]
    pub lms: Lms,
}

impl ReferenceRow {
    pub fn new(key: f64, sex: Sex, lms: Lms) -> Self {
        Self { key, sex, lms }
    }
}
