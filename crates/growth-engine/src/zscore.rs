//! LMS z-score calculation.
//!
//! The raw LMS transform is
//!
//! ```text
//! z = ((Y / M)^L - 1) / (L * S)      L != 0
//! z = ln(Y / M) / S                  L == 0
//! ```
//!
//! For weight-based indicators WHO replaces the tails beyond ±3 SD with a
//! linear extension using the distance between the 2 SD and 3 SD curves,
//! because the Box-Cox transform over-compresses the right tail.
//!
//! Height-for-age keeps the raw transform and is clamped to its plausible
//! range (±6 SD); the result says when that happened.

use growth_model::{GrowthError, Indicator, Lms, Result};

/// Distance from zero beyond which the restricted formula applies.
const RESTRICTED_LIMIT: f64 = 3.0;

/// Outcome of [`zscore`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZScore {
    pub value: f64,
    /// True when `value` was clamped to the indicator's plausible range.
    pub capped: bool,
}

/// Raw LMS z-score of `y`.
pub fn lms_zscore(y: f64, lms: Lms) -> Result<f64> {
    check_inputs(y, lms)?;
    let ratio = y / lms.m;
    let z = if lms.l == 0.0 {
        ratio.ln() / lms.s
    } else {
        (ratio.powf(lms.l) - 1.0) / (lms.l * lms.s)
    };
    if !z.is_finite() {
        return Err(GrowthError::invalid(format!(
            "z-score is not finite for value {y}"
        )));
    }
    Ok(z)
}

/// Measurement value sitting at `z` standard deviations (the inverse transform).
pub fn value_at(lms: Lms, z: f64) -> Result<f64> {
    check_lms(lms)?;
    if !z.is_finite() {
        return Err(GrowthError::invalid(format!("z must be finite, got {z}")));
    }
    if lms.l == 0.0 {
        return Ok(lms.m * (lms.s * z).exp());
    }
    let base = 1.0 + lms.l * lms.s * z;
    if base <= 0.0 {
        return Err(GrowthError::invalid(format!(
            "the {z:+} SD curve is undefined for L={}, S={}",
            lms.l, lms.s
        )));
    }
    Ok(lms.m * base.powf(1.0 / lms.l))
}

/// Z-score of `y` for `indicator`: WHO's restricted formula beyond ±3 SD for
/// weight-based indicators, a clamp to the plausible range otherwise.
pub fn zscore(indicator: Indicator, y: f64, lms: Lms) -> Result<ZScore> {
    let z = lms_zscore(y, lms)?;
    if !indicator.uses_restricted_zscore() {
        let (low, high) = indicator.plausible_range();
        let value = z.clamp(low, high);
        return Ok(ZScore {
            value,
            capped: value != z,
        });
    }

    let value = if z > RESTRICTED_LIMIT {
        let sd3 = value_at(lms, 3.0)?;
        let sd2 = value_at(lms, 2.0)?;
        RESTRICTED_LIMIT + (y - sd3) / (sd3 - sd2)
    } else if z < -RESTRICTED_LIMIT {
        let sd3 = value_at(lms, -3.0)?;
        let sd2 = value_at(lms, -2.0)?;
        -RESTRICTED_LIMIT + (y - sd3) / (sd2 - sd3)
    } else {
        z
    };
    Ok(ZScore {
        value,
        capped: false,
    })
}

fn check_inputs(y: f64, lms: Lms) -> Result<()> {
    if !y.is_finite() || y <= 0.0 {
        return Err(GrowthError::invalid(format!(
            "measured value must be a positive number, got {y}"
        )));
    }
    check_lms(lms)
}

fn check_lms(lms: Lms) -> Result<()> {
    if !lms.is_finite() {
        return Err(GrowthError::invalid("L, M and S must be finite"));
    }
    if lms.m <= 0.0 || lms.s <= 0.0 {
        return Err(GrowthError::invalid(format!(
            "M and S must be positive, got M={}, S={}",
            lms.m, lms.s
        )));
    }
    Ok(())
}
