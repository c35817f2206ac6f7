#![deny(unsafe_code)]

use growth_model::{Axis, GrowthError, Indicator, ReferenceRow, Sex};
use serde::Serialize;

/// LMS rows for one indicator and sex, strictly ascending by key.
///
/// Immutable once constructed; the constructor is the only place the ordering
/// and value invariants are checked.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceTable {
    indicator: Indicator,
    sex: Sex,
    axis: Axis,
    rows: Vec<ReferenceRow>,
}

impl ReferenceTable {
    pub fn new(
        indicator: Indicator,
        sex: Sex,
        axis: Axis,
        rows: Vec<ReferenceRow>,
    ) -> Result<Self, GrowthError> {
        validate_rows(indicator, sex, axis, &rows).map_err(GrowthError::malformed)?;
        Ok(Self::from_validated(indicator, sex, axis, rows))
    }

    pub(crate) fn from_validated(
        indicator: Indicator,
        sex: Sex,
        axis: Axis,
        rows: Vec<ReferenceRow>,
    ) -> Self {
        Self {
            indicator,
            sex,
            axis,
            rows,
        }
    }

    pub fn indicator(&self) -> Indicator {
        self.indicator
    }

    pub fn sex(&self) -> Sex {
        self.sex
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn rows(&self) -> &[ReferenceRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Smallest and largest tabulated key.
    pub fn domain(&self) -> (f64, f64) {
        // Never empty: `new` rejects empty tables.
        let first = self.rows.first().map_or(f64::NAN, |row| row.key);
        let last = self.rows.last().map_or(f64::NAN, |row| row.key);
        (first, last)
    }
}

pub(crate) fn validate_rows(
    indicator: Indicator,
    sex: Sex,
    axis: Axis,
    rows: &[ReferenceRow],
) -> Result<(), String> {
    if !indicator.accepts_axis(axis) {
        return Err(format!(
            "{} tables must be keyed by {}, not {axis}",
            indicator.as_str(),
            if indicator.is_age_based() {
                "age"
            } else {
                "length/height"
            }
        ));
    }
    if rows.is_empty() {
        return Err(format!(
            "{} table for {sex} has no rows",
            indicator.as_str()
        ));
    }

    let mut previous: Option<f64> = None;
    for (idx, row) in rows.iter().enumerate() {
        let number = idx + 1;
        if row.sex != sex {
            return Err(format!(
                "row {number}: sex {} does not match table sex {sex}",
                row.sex
            ));
        }
        if !row.key.is_finite() || row.key < 0.0 {
            return Err(format!("row {number}: invalid key {}", row.key));
        }
        if !row.lms.is_finite() {
            return Err(format!("row {number}: L, M and S must be finite numbers"));
        }
        if row.lms.m <= 0.0 {
            return Err(format!("row {number}: M must be positive, got {}", row.lms.m));
        }
        if row.lms.s <= 0.0 {
            return Err(format!("row {number}: S must be positive, got {}", row.lms.s));
        }
        if let Some(prev) = previous
            && row.key <= prev
        {
            return Err(format!(
                "row {number}: key {} is not greater than previous key {prev}",
                row.key
            ));
        }
        previous = Some(row.key);
    }
    Ok(())
}
