//! L/M/S lookup at an arbitrary key.

use growth_model::{GrowthError, Lms, Result};
use growth_standards::ReferenceTable;

/// Parameters found for a query key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interpolation {
    pub lms: Lms,
    /// False when the key matched a row exactly.
    pub interpolated: bool,
}

/// Look up `x` in `table`, interpolating linearly between adjacent rows.
///
/// An exact key returns the row's parameters unchanged. Keys outside the
/// tabulated domain are `OutOfRange`; there is no extrapolation.
pub fn interpolate(table: &ReferenceTable, x: f64) -> Result<Interpolation> {
    if !x.is_finite() {
        return Err(GrowthError::invalid(format!(
            "{} lookup key must be a finite number, got {x}",
            table.axis()
        )));
    }

    let rows = table.rows();
    let idx = rows.partition_point(|row| row.key < x);
    if let Some(row) = rows.get(idx)
        && row.key == x
    {
        return Ok(Interpolation {
            lms: row.lms,
            interpolated: false,
        });
    }
    if idx == 0 || idx == rows.len() {
        let (min, max) = table.domain();
        return Err(GrowthError::OutOfRange {
            indicator: table.indicator(),
            value: x,
            min,
            max,
        });
    }

    let lo = &rows[idx - 1];
    let hi = &rows[idx];
    let t = (x - lo.key) / (hi.key - lo.key);
    let lerp = |a: f64, b: f64| a + t * (b - a);
    Ok(Interpolation {
        lms: Lms::new(
            lerp(lo.lms.l, hi.lms.l),
            lerp(lo.lms.m, hi.lms.m),
            lerp(lo.lms.s, hi.lms.s),
        ),
        interpolated: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use growth_model::{Axis, Indicator, ReferenceRow, Sex};

    fn table(rows: &[(f64, f64, f64, f64)]) -> ReferenceTable {
        ReferenceTable::new(
            Indicator::WeightForHeight,
            Sex::Male,
            Axis::LengthCm,
            rows.iter()
                .map(|&(key, l, m, s)| ReferenceRow::new(key, Sex::Male, Lms::new(l, m, s)))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn exact_key_returns_row() {
        let table = table(&[(65.0, -0.3521, 7.4327, 0.08217), (65.5, -0.3521, 7.5504, 0.08214)]);
        let found = interpolate(&table, 65.5).unwrap();
        assert!(!found.interpolated);
        assert_eq!(found.lms, Lms::new(-0.3521, 7.5504, 0.08214));
    }

    #[test]
    fn midpoint_is_linear() {
        let table = table(&[(80.0, -0.5, 10.0, 0.08), (81.0, -0.3, 10.4, 0.09)]);
        let found = interpolate(&table, 80.5).unwrap();
        assert!(found.interpolated);
        assert!((found.lms.l - -0.4).abs() < 1e-12);
        assert!((found.lms.m - 10.2).abs() < 1e-12);
        assert!((found.lms.s - 0.085).abs() < 1e-12);
    }

    #[test]
    fn keys_outside_domain_are_out_of_range() {
        let table = table(&[(80.0, -0.5, 10.0, 0.08), (81.0, -0.3, 10.4, 0.09)]);
        let err = interpolate(&table, 79.9).unwrap_err();
        assert_eq!(
            err,
            GrowthError::OutOfRange {
                indicator: Indicator::WeightForHeight,
                value: 79.9,
                min: 80.0,
                max: 81.0,
            }
        );
        assert!(matches!(
            interpolate(&table, 81.01),
            Err(GrowthError::OutOfRange { .. })
        ));
    }

    #[test]
    fn single_row_answers_only_its_key() {
        let table = table(&[(80.0, -0.5, 10.0, 0.08)]);
        assert!(interpolate(&table, 80.0).is_ok());
        assert!(interpolate(&table, 80.5).is_err());
    }

    #[test]
    fn nan_key_is_invalid() {
        let table = table(&[(80.0, -0.5, 10.0, 0.08)]);
        assert!(matches!(
            interpolate(&table, f64::NAN),
            Err(GrowthError::InvalidMeasurement { .. })
        ));
    }
}
