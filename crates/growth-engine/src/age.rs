//! Age derivation from calendar dates.

use chrono::{Datelike, Months, NaiveDate};
use growth_model::{DAYS_PER_MONTH, GrowthError, Result};

/// Date format accepted from screening records.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|e| GrowthError::invalid(format!("invalid date '{raw}': {e}")))
}

/// Whole days between birth and screening.
pub fn age_in_days(birth: NaiveDate, screening: NaiveDate) -> Result<i64> {
    if birth > screening {
        return Err(GrowthError::invalid(format!(
            "birth date {birth} is after screening date {screening}"
        )));
    }
    Ok((screening - birth).num_days())
}

pub fn age_in_months(days: f64) -> f64 {
    days / DAYS_PER_MONTH
}

/// Completed calendar months, plus one when at least 15 days into the next
/// month. Matches the `age_months` stored by screening records.
pub fn completed_months_rounded(birth: NaiveDate, screening: NaiveDate) -> Result<u32> {
    age_in_days(birth, screening)?;

    let year_diff = screening.year() - birth.year();
    let month_diff = screening.month() as i32 - birth.month() as i32;
    let mut months = u32::try_from(year_diff * 12 + month_diff).unwrap_or(0);
    let mut anchor = add_months(birth, months)?;
    if anchor > screening {
        months = months.saturating_sub(1);
        anchor = add_months(birth, months)?;
    }

    let remainder = (screening - anchor).num_days();
    Ok(if remainder >= 15 { months + 1 } else { months })
}

fn add_months(date: NaiveDate, months: u32) -> Result<NaiveDate> {
    date.checked_add_months(Months::new(months))
        .ok_or_else(|| GrowthError::invalid(format!("date {date} + {months} months overflows")))
}
