//! Batch screening: subject CSV in, per-indicator result CSV out.

use std::collections::BTreeSet;
use std::io::{Read, Write};

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use growth_engine::{Assessor, GrowthAssessment, age_in_days, parse_date};
use growth_model::{Indicator, Measurement, Sex};
use tracing::{info, info_span, warn};

use crate::logging::redact_value;

/// One parsed input row.
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectRecord {
    pub id: String,
    /// 1-based data row number in the input file.
    pub row: usize,
    pub measurement: Measurement,
}

/// An input row that could not be turned into a measurement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    pub row: usize,
    pub id: Option<String>,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct ParsedSubjects {
    pub subjects: Vec<SubjectRecord>,
    pub skipped: Vec<RowError>,
}

#[derive(Debug, Clone, Copy, Default)]
struct Columns {
    id: Option<usize>,
    sex: usize,
    age_days: Option<usize>,
    age_months: Option<usize>,
    birth_date: Option<usize>,
    screening_date: Option<usize>,
    weight: Option<usize>,
    height: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let find = |names: &[&str]| {
            headers.iter().position(|header| {
                let header = header.trim().trim_matches('\u{feff}').to_lowercase();
                names.contains(&header.as_str())
            })
        };
        let Some(sex) = find(&["sex", "gender"]) else {
            bail!("input has no sex column");
        };
        Ok(Self {
            id: find(&["id", "subject_id", "child_id"]),
            sex,
            age_days: find(&["age_days"]),
            age_months: find(&["age_months"]),
            birth_date: find(&["birth_date", "date_of_birth", "dob"]),
            screening_date: find(&["screening_date", "assessment_date"]),
            weight: find(&["weight", "weight_kg"]),
            height: find(&["height", "height_cm", "length", "length_cm"]),
        })
    }
}

/// Read subject rows. Unparseable rows are collected in `skipped`; only
/// structural problems (unreadable CSV, no sex column) fail the whole batch.
///
/// `today` is the screening date for rows with a birth date but no
/// screening date.
pub fn read_subjects<R: Read>(reader: R, today: NaiveDate) -> Result<ParsedSubjects> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = reader.headers().context("read input header")?.clone();
    let columns = Columns::from_headers(&headers)?;

    let mut parsed = ParsedSubjects::default();
    for (idx, record) in reader.records().enumerate() {
        let row = idx + 1;
        let record = record.with_context(|| format!("read input row {row}"))?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let id = cell(&record, columns.id).map(str::to_string);
        match parse_measurement(&record, &columns, today) {
            Ok(measurement) => parsed.subjects.push(SubjectRecord {
                id: id.unwrap_or_else(|| row.to_string()),
                row,
                measurement,
            }),
            Err(message) => {
                warn!(
                    row,
                    id = redact_value(id.as_deref().unwrap_or("")),
                    reason = %message,
                    "skipping input row"
                );
                parsed.skipped.push(RowError { row, id, message });
            }
        }
    }
    Ok(parsed)
}

fn cell(record: &csv::StringRecord, column: Option<usize>) -> Option<&str> {
    column
        .and_then(|idx| record.get(idx))
        .filter(|value| !value.is_empty())
}

fn number(
    record: &csv::StringRecord,
    column: Option<usize>,
    name: &str,
) -> Result<Option<f64>, String> {
    cell(record, column)
        .map(|raw| {
            raw.parse::<f64>()
                .map_err(|_| format!("{name} '{raw}' is not a number"))
        })
        .transpose()
}

fn parse_measurement(
    record: &csv::StringRecord,
    columns: &Columns,
    today: NaiveDate,
) -> Result<Measurement, String> {
    let sex: Sex = cell(record, Some(columns.sex))
        .ok_or_else(|| "sex is missing".to_string())?
        .parse()?;
    let mut measurement = Measurement::new(sex);

    if let Some(days) = number(record, columns.age_days, "age_days")? {
        measurement = measurement.with_age_days(days);
    } else if let Some(months) = number(record, columns.age_months, "age_months")? {
        measurement = measurement.with_age_months(months);
    } else if let Some(birth) = cell(record, columns.birth_date) {
        let birth = parse_date(birth).map_err(|e| e.to_string())?;
        let screening = match cell(record, columns.screening_date) {
            Some(raw) => parse_date(raw).map_err(|e| e.to_string())?,
            None => today,
        };
        let days = age_in_days(birth, screening).map_err(|e| e.to_string())?;
        measurement = measurement.with_age_days(days as f64);
    }

    if let Some(weight) = number(record, columns.weight, "weight")? {
        measurement = measurement.with_weight(weight);
    }
    if let Some(height) = number(record, columns.height, "height")? {
        measurement = measurement.with_height(height);
    }
    Ok(measurement)
}

/// Indicators to run for one subject: the age-appropriate set, limited to
/// the indicators that have loaded tables. Adults keep BMI, which needs no
/// table.
pub fn indicators_for(
    measurement: &Measurement,
    available: &BTreeSet<Indicator>,
) -> Vec<Indicator> {
    let adult = measurement.is_adult();
    Indicator::applicable_for_age(measurement.age_days)
        .into_iter()
        .filter(|indicator| {
            available.contains(indicator) || (adult && *indicator == Indicator::BmiForAge)
        })
        .collect()
}

pub fn screen_subjects(
    assessor: &Assessor<'_>,
    subjects: &[SubjectRecord],
) -> Vec<GrowthAssessment> {
    let span = info_span!("screen", subjects = subjects.len());
    let _guard = span.enter();

    let available = assessor.store().indicators();
    let assessments: Vec<GrowthAssessment> = subjects
        .iter()
        .map(|subject| {
            let indicators = indicators_for(&subject.measurement, &available);
            if indicators.is_empty() {
                warn!(
                    row = subject.row,
                    id = redact_value(&subject.id),
                    "no loaded indicator applies to subject"
                );
            }
            assessor.assess(&subject.measurement, &indicators)
        })
        .collect();

    let unassessed = assessments.iter().filter(|a| !a.is_assessed()).count();
    info!(screened = assessments.len(), unassessed, "screening complete");
    assessments
}

/// Risk level written for a subject with no assessed indicator.
pub const UNASSESSED: &str = "Unassessed";

/// Output header: id, sex, age, z/percentile/classification/error per
/// indicator, then the risk level.
pub fn output_headers() -> Vec<String> {
    let mut headers = vec![
        "id".to_string(),
        "sex".to_string(),
        "age_months".to_string(),
    ];
    for indicator in Indicator::ALL {
        let name = indicator.as_str();
        headers.push(format!("{name}_z_score"));
        headers.push(format!("{name}_percentile"));
        headers.push(format!("{name}_classification"));
        headers.push(format!("{name}_error"));
    }
    headers.push("risk_level".to_string());
    headers
}

fn output_row(subject: &SubjectRecord, assessment: &GrowthAssessment) -> Vec<String> {
    let age_months = subject
        .measurement
        .age_months()
        .map(|months| format!("{months:.2}"))
        .unwrap_or_default();
    let mut row = vec![
        subject.id.clone(),
        subject.measurement.sex.label().to_string(),
        age_months,
    ];
    for indicator in Indicator::ALL {
        let adult = assessment
            .adult_bmi()
            .filter(|_| indicator == Indicator::BmiForAge);
        match (assessment.get(indicator), adult) {
            (Some(Ok(result)), _) => row.extend([
                format!("{:.2}", result.score.reported_z_score()),
                format!("{:.1}", result.score.reported_percentile()),
                result.label().to_string(),
                String::new(),
            ]),
            (_, Some(Ok(result))) => row.extend([
                String::new(),
                String::new(),
                result.label().to_string(),
                String::new(),
            ]),
            (Some(Err(error)), _) | (_, Some(Err(error))) => row.extend([
                String::new(),
                String::new(),
                String::new(),
                format!("{}: {error}", error.kind()),
            ]),
            (None, None) => row.extend(std::iter::repeat_n(String::new(), 4)),
        }
    }
    let risk = if assessment.is_assessed() {
        assessment.risk_level().label()
    } else {
        UNASSESSED
    };
    row.push(risk.to_string());
    row
}

/// Write one output row per subject.
pub fn write_results<W: Write>(
    writer: W,
    subjects: &[SubjectRecord],
    assessments: &[GrowthAssessment],
) -> Result<usize> {
    if subjects.len() != assessments.len() {
        bail!(
            "{} subjects but {} assessments",
            subjects.len(),
            assessments.len()
        );
    }
    let mut writer = csv::Writer::from_writer(writer);
    writer
        .write_record(output_headers())
        .context("write output header")?;
    for (subject, assessment) in subjects.iter().zip(assessments) {
        writer
            .write_record(output_row(subject, assessment))
            .with_context(|| format!("write output row {}", subject.row))?;
    }
    writer.flush().context("flush output")?;
    Ok(subjects.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_follow_indicator_order() {
        let headers = output_headers();
        assert_eq!(headers[3], "weight_for_age_z_score");
        assert_eq!(headers[5], "weight_for_age_classification");
        assert_eq!(headers[6], "weight_for_age_error");
        assert_eq!(headers.last().map(String::as_str), Some("risk_level"));
        assert_eq!(headers.len(), 3 + 4 * Indicator::ALL.len() + 1);
    }

    #[test]
    fn sex_column_is_required() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let err = read_subjects("id,weight\n1,9.0\n".as_bytes(), today).unwrap_err();
        assert!(err.to_string().contains("no sex column"));
    }
}
