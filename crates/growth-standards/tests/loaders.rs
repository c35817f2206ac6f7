use std::fs;
use std::path::Path;

use growth_model::{Axis, GrowthError, Indicator, Sex};
use growth_standards::hash::sha256_hex;
use growth_standards::{ReferenceTableStore, StandardsError, parse_table};

const WFA_BOYS: &str = "Month,L,M,S\n0,0.3487,3.3464,0.14602\n1,0.2297,4.4709,0.13395\n2,0.197,5.5675,0.12385\n";
const WFA_GIRLS: &str = "Month,L,M,S\n0,0.3809,3.2322,0.14171\n1,0.1714,4.1873,0.13724\n2,0.0962,5.1282,0.13\n";

fn write(path: &Path, contents: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

fn table_entry(indicator: &str, sex: &str, path: &str, sha: Option<&str>) -> String {
    let mut entry = format!(
        "\n[[tables]]\nindicator = \"{indicator}\"\nsex = \"{sex}\"\npath = \"{path}\"\n"
    );
    if let Some(sha) = sha {
        entry.push_str(&format!("sha256 = \"{sha}\"\n"));
    }
    entry
}

fn header(required: &str) -> String {
    format!(
        "[manifest]\nschema = \"growth-standards.manifest\"\nschema_version = 1\nedition = \"WHO Child Growth Standards 2006\"\nrequired = [{required}]\n"
    )
}

/// Writes a standards dir holding weight-for-age tables for both sexes.
fn wfa_standards(dir: &Path, with_sha: bool) {
    write(&dir.join("wfa/boys.csv"), WFA_BOYS.as_bytes());
    write(&dir.join("wfa/girls.csv"), WFA_GIRLS.as_bytes());
    let boys_sha = sha256_hex(WFA_BOYS.as_bytes());
    let girls_sha = sha256_hex(WFA_GIRLS.as_bytes());
    let mut manifest = header("\"weight_for_age\"");
    manifest.push_str(&table_entry(
        "weight_for_age",
        "male",
        "wfa/boys.csv",
        with_sha.then_some(boys_sha.as_str()),
    ));
    manifest.push_str(&table_entry(
        "weight_for_age",
        "female",
        "wfa/girls.csv",
        with_sha.then_some(girls_sha.as_str()),
    ));
    write(&dir.join("manifest.toml"), manifest.as_bytes());
}

#[test]
fn loads_manifest_tables_and_verifies_checksums() {
    let dir = tempfile::tempdir().unwrap();
    wfa_standards(dir.path(), true);

    let (store, summary) = ReferenceTableStore::verify_and_load(dir.path()).expect("load");
    assert_eq!(store.len(), 2);
    assert_eq!(store.edition(), Some("WHO Child Growth Standards 2006"));
    assert_eq!(summary.table_count, 2);
    assert_eq!(summary.row_count, 6);
    assert_eq!(summary.checksums_verified, 2);

    let girls = store.lookup(Indicator::WeightForAge, Sex::Female).unwrap();
    assert_eq!(girls.axis(), Axis::AgeMonths);
    assert_eq!(girls.domain(), (0.0, 2.0));
    assert_eq!(girls.rows()[1].lms.m, 4.1873);
    assert!(store.indicators().contains(&Indicator::WeightForAge));
}

#[test]
fn checksums_are_optional() {
    let dir = tempfile::tempdir().unwrap();
    wfa_standards(dir.path(), false);

    let (_, summary) = ReferenceTableStore::verify_and_load(dir.path()).expect("load");
    assert_eq!(summary.checksums_verified, 0);
    assert_eq!(summary.tables.len(), 2);
}

#[test]
fn sha_mismatch_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    wfa_standards(dir.path(), true);
    write(
        &dir.path().join("wfa/boys.csv"),
        WFA_BOYS.replace("3.3464", "3.3465").as_bytes(),
    );

    let err = ReferenceTableStore::load(dir.path()).unwrap_err();
    assert!(matches!(err, StandardsError::Sha256Mismatch { .. }), "{err}");
}

#[test]
fn non_monotonic_rows_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    wfa_standards(dir.path(), false);
    write(
        &dir.path().join("wfa/boys.csv"),
        b"Month,L,M,S\n0,0.3487,3.3464,0.14602\n2,0.197,5.5675,0.12385\n1,0.2297,4.4709,0.13395\n",
    );

    let err = ReferenceTableStore::load(dir.path()).unwrap_err();
    match err {
        StandardsError::MalformedReferenceData { origin, message } => {
            assert_eq!(origin, "wfa/boys.csv");
            assert!(message.contains("row 3"), "{message}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn non_positive_median_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    wfa_standards(dir.path(), false);
    write(
        &dir.path().join("wfa/girls.csv"),
        b"Month,L,M,S\n0,0.3809,0,0.14171\n",
    );

    let err = ReferenceTableStore::load(dir.path()).unwrap_err();
    assert!(err.to_string().contains("M must be positive"), "{err}");
}

#[test]
fn missing_lms_column_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    wfa_standards(dir.path(), false);
    write(
        &dir.path().join("wfa/girls.csv"),
        b"Month,L,M\n0,0.3809,3.2322\n",
    );

    let err = ReferenceTableStore::load(dir.path()).unwrap_err();
    assert!(err.to_string().contains("missing S column"), "{err}");
}

#[test]
fn missing_sex_table_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir.path().join("wfa/boys.csv"), WFA_BOYS.as_bytes());
    let mut manifest = header("");
    manifest.push_str(&table_entry("weight_for_age", "male", "wfa/boys.csv", None));
    write(&dir.path().join("manifest.toml"), manifest.as_bytes());

    let err = ReferenceTableStore::load(dir.path()).unwrap_err();
    insta::assert_snapshot!(
        err.to_string(),
        @"malformed reference data in reference set: missing weight_for_age table for female"
    );
}

#[test]
fn required_indicator_without_tables_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    wfa_standards(dir.path(), false);
    let manifest = fs::read_to_string(dir.path().join("manifest.toml"))
        .unwrap()
        .replace(
            "required = [\"weight_for_age\"]",
            "required = [\"weight_for_age\", \"height_for_age\"]",
        );
    write(&dir.path().join("manifest.toml"), manifest.as_bytes());

    let err = ReferenceTableStore::load(dir.path()).unwrap_err();
    assert!(err.to_string().contains("missing height_for_age table"), "{err}");
}

#[test]
fn manifest_paths_cannot_escape_standards_dir() {
    let dir = tempfile::tempdir().unwrap();
    let mut manifest = header("");
    manifest.push_str(&table_entry("weight_for_age", "male", "../boys.csv", None));
    manifest.push_str(&table_entry("weight_for_age", "female", "girls.csv", None));
    write(&dir.path().join("manifest.toml"), manifest.as_bytes());

    let err = ReferenceTableStore::load(dir.path()).unwrap_err();
    assert!(matches!(err, StandardsError::InvalidPath { .. }), "{err}");
}

#[test]
fn missing_table_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    wfa_standards(dir.path(), false);
    fs::remove_file(dir.path().join("wfa/girls.csv")).unwrap();

    let err = ReferenceTableStore::load(dir.path()).unwrap_err();
    assert!(matches!(err, StandardsError::MissingFile { .. }), "{err}");
}

#[test]
fn unsupported_schema_version_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    wfa_standards(dir.path(), false);
    let manifest = fs::read_to_string(dir.path().join("manifest.toml"))
        .unwrap()
        .replace("schema_version = 1", "schema_version = 2");
    write(&dir.path().join("manifest.toml"), manifest.as_bytes());

    let err = ReferenceTableStore::load(dir.path()).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"invalid manifest: unsupported schema_version: 2");
}

#[test]
fn parses_who_tab_separated_day_table() {
    // WHO expanded tables carry SD columns after L, M and S.
    let text = "Day\tL\tM\tS\tSD3neg\tSD2neg\n\
                0\t0.3809\t3.2322\t0.14171\t2.0\t2.4\n\
                1\t0.3259\t3.1957\t0.14578\t2.0\t2.3\n";
    let table = parse_table(
        text.as_bytes(),
        Indicator::WeightForAge,
        Sex::Female,
        "wfa-girls-zscore-expanded-table.txt",
    )
    .expect("parse");
    assert_eq!(table.axis(), Axis::AgeDays);
    assert_eq!(table.len(), 2);
    assert_eq!(table.rows()[1].lms.l, 0.3259);
}

#[test]
fn length_keyed_table_is_rejected_for_age_indicator() {
    let text = "Length,L,M,S\n45,-0.3521,2.441,0.09182\n";
    let err = parse_table(text.as_bytes(), Indicator::WeightForAge, Sex::Male, "inline")
        .unwrap_err();
    assert!(err.to_string().contains("keyed by age"), "{err}");
}

#[test]
fn lookup_of_absent_indicator_fails() {
    let boys = parse_table(WFA_BOYS.as_bytes(), Indicator::WeightForAge, Sex::Male, "boys")
        .unwrap();
    let girls = parse_table(WFA_GIRLS.as_bytes(), Indicator::WeightForAge, Sex::Female, "girls")
        .unwrap();
    let store = ReferenceTableStore::from_tables([boys, girls], &[]).unwrap();

    let err = store
        .lookup(Indicator::HeightForAge, Sex::Male)
        .unwrap_err();
    assert_eq!(
        err,
        GrowthError::UnknownIndicatorOrSex {
            indicator: Indicator::HeightForAge,
            sex: Sex::Male,
        }
    );
    assert!(store.lookup(Indicator::WeightForAge, Sex::Male).is_ok());
}

#[test]
fn duplicate_tables_are_rejected() {
    let first = parse_table(WFA_BOYS.as_bytes(), Indicator::WeightForAge, Sex::Male, "a").unwrap();
    let second = first.clone();
    let err = ReferenceTableStore::from_tables([first, second], &[]).unwrap_err();
    assert!(matches!(err, StandardsError::DuplicateTable { .. }), "{err}");
}
