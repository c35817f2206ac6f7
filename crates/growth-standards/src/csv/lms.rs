#![deny(unsafe_code)]

//! Parser for WHO LMS reference tables.
//!
//! WHO distributes its tables as tab-separated text (`wfa-girls-zscore-expanded-table.txt`)
//! and as spreadsheets commonly exported to CSV. Both share the layout
//! `<key> L M S [SD/percentile columns...]`; only the key and the L/M/S
//! columns are read.

use std::io::Read;
use std::path::Path;

use growth_model::{Axis, Indicator, Lms, ReferenceRow, Sex};

use crate::error::StandardsError;
use crate::table::{ReferenceTable, validate_rows};

/// Read and parse one table file.
pub fn parse_table_file(
    path: &Path,
    indicator: Indicator,
    sex: Sex,
) -> Result<ReferenceTable, StandardsError> {
    let bytes = std::fs::read(path).map_err(|e| StandardsError::io(path, e))?;
    parse_table_bytes(&bytes, indicator, sex, &path.display().to_string())
}

/// Parse one table from any reader. `origin` names the source in errors.
pub fn parse_table<R: Read>(
    mut reader: R,
    indicator: Indicator,
    sex: Sex,
    origin: &str,
) -> Result<ReferenceTable, StandardsError> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes).map_err(|e| StandardsError::Csv {
        origin: origin.to_string(),
        message: e.to_string(),
    })?;
    parse_table_bytes(&bytes, indicator, sex, origin)
}

pub fn parse_table_bytes(
    bytes: &[u8],
    indicator: Indicator,
    sex: Sex,
    origin: &str,
) -> Result<ReferenceTable, StandardsError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(detect_delimiter(bytes))
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);
    let headers = reader
        .headers()
        .map_err(|e| StandardsError::Csv {
            origin: origin.to_string(),
            message: e.to_string(),
        })?
        .clone();

    let (key_idx, axis) = find_key_column(&headers).ok_or_else(|| {
        StandardsError::malformed(
            origin,
            "missing key column (expected Month, Age, Day, Length or Height)",
        )
    })?;
    let column = |name: &str| -> Result<usize, StandardsError> {
        headers
            .iter()
            .position(|h| normalize_header(h).eq_ignore_ascii_case(name))
            .ok_or_else(|| StandardsError::malformed(origin, format!("missing {name} column")))
    };
    let l_idx = column("L")?;
    let m_idx = column("M")?;
    let s_idx = column("S")?;

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let number = idx + 1;
        let record = record.map_err(|e| StandardsError::Csv {
            origin: origin.to_string(),
            message: e.to_string(),
        })?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let value = |col: usize, name: &str| -> Result<f64, StandardsError> {
            let raw = record.get(col).unwrap_or("");
            if raw.is_empty() {
                return Err(StandardsError::malformed(
                    origin,
                    format!("row {number}: missing {name}"),
                ));
            }
            raw.parse::<f64>().map_err(|_| {
                StandardsError::malformed(
                    origin,
                    format!("row {number}: {name} value '{raw}' is not a number"),
                )
            })
        };
        let key = value(key_idx, "key")?;
        let lms = Lms::new(value(l_idx, "L")?, value(m_idx, "M")?, value(s_idx, "S")?);
        rows.push(ReferenceRow::new(key, sex, lms));
    }

    validate_rows(indicator, sex, axis, &rows)
        .map_err(|message| StandardsError::malformed(origin, message))?;
    Ok(ReferenceTable::from_validated(indicator, sex, axis, rows))
}

/// Tab-separated when the header line contains a tab, comma-separated otherwise.
fn detect_delimiter(bytes: &[u8]) -> u8 {
    let header = bytes.split(|b| *b == b'\n').next().unwrap_or(&[]);
    if header.contains(&b'\t') {
        b'\t'
    } else {
        b','
    }
}

fn normalize_header(raw: &str) -> &str {
    raw.trim().trim_matches('\u{feff}').trim_matches('"')
}

fn find_key_column(headers: &csv::StringRecord) -> Option<(usize, Axis)> {
    headers.iter().enumerate().find_map(|(idx, raw)| {
        let axis = match normalize_header(raw).to_lowercase().as_str() {
            "month" | "months" | "age" | "age_months" | "agemos" => Axis::AgeMonths,
            "day" | "days" | "age_days" => Axis::AgeDays,
            "length" | "height" | "lorh" | "length_cm" | "height_cm" => Axis::LengthCm,
            _ => return None,
        };
        Some((idx, axis))
    })
}
