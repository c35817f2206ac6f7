use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use tracing::{info, info_span, trace};

use growth_cli::batch::{read_subjects, screen_subjects, write_results};
use growth_cli::logging::log_data_enabled;
use growth_engine::{Assessor, ScreeningSummary, age_in_days, parse_date};
use growth_model::{Indicator, Measurement};
use growth_standards::{ReferenceTableStore, VerifySummary, standards_root};

use crate::cli::{AssessArgs, ScreenArgs, VerifyArgs};
use crate::summary::{print_assessment, print_screening, print_tables, print_verify};
use crate::types::{AssessResult, ScreenResult};

fn resolve_standards_dir(dir: Option<&Path>) -> PathBuf {
    dir.map_or_else(standards_root, Path::to_path_buf)
}

fn load_store(dir: Option<&Path>) -> Result<ReferenceTableStore> {
    let dir = resolve_standards_dir(dir);
    ReferenceTableStore::load(&dir)
        .with_context(|| format!("load growth standards from {}", dir.display()))
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn date_or_today(raw: Option<&str>) -> Result<NaiveDate> {
    match raw {
        Some(raw) => Ok(parse_date(raw)?),
        None => Ok(today()),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let stdout = io::stdout();
    serde_json::to_writer_pretty(stdout.lock(), value).context("write JSON output")?;
    println!();
    Ok(())
}

pub fn run_tables(standards_dir: Option<&Path>) -> Result<()> {
    let store = load_store(standards_dir)?;
    print_tables(&store.summaries());
    Ok(())
}

pub fn run_verify(standards_dir: Option<&Path>, args: &VerifyArgs) -> Result<VerifySummary> {
    let dir = resolve_standards_dir(standards_dir);
    let (_, summary) = ReferenceTableStore::verify_and_load(&dir)
        .with_context(|| format!("verify growth standards in {}", dir.display()))?;
    if args.json {
        print_json(&summary)?;
    } else {
        print_verify(&summary);
    }
    Ok(summary)
}

fn measurement_from_args(args: &AssessArgs) -> Result<Measurement> {
    let mut measurement = Measurement::new(args.sex);
    if let Some(days) = args.age_days {
        measurement = measurement.with_age_days(days);
    } else if let Some(months) = args.age_months {
        measurement = measurement.with_age_months(months);
    } else if let Some(birth) = &args.birth_date {
        let birth = parse_date(birth)?;
        let screening = date_or_today(args.screening_date.as_deref())?;
        measurement = measurement.with_age_days(age_in_days(birth, screening)? as f64);
    }
    if let Some(weight) = args.weight {
        measurement = measurement.with_weight(weight);
    }
    if let Some(height) = args.height {
        measurement = measurement.with_height(height);
    }
    Ok(measurement)
}

pub fn run_assess(standards_dir: Option<&Path>, args: &AssessArgs) -> Result<AssessResult> {
    let store = load_store(standards_dir)?;
    let measurement = measurement_from_args(args)?;
    if log_data_enabled() {
        trace!(?measurement, "assessing subject");
    }

    let indicators: Vec<Indicator> = if args.indicators.is_empty() {
        Indicator::applicable_for_age(measurement.age_days)
    } else {
        args.indicators.clone()
    };
    let assessment = Assessor::new(&store).assess(&measurement, &indicators);

    let result = AssessResult {
        assessment,
        edition: store.edition().map(str::to_string),
    };
    if args.json {
        print_json(&result.assessment)?;
    } else {
        print_assessment(&result);
    }
    Ok(result)
}

pub fn run_screen(standards_dir: Option<&Path>, args: &ScreenArgs) -> Result<ScreenResult> {
    let span = info_span!("screen_file", input = %args.input.display());
    let _guard = span.enter();

    let store = load_store(standards_dir)?;
    let screening_date = date_or_today(args.screening_date.as_deref())?;
    let file = File::open(&args.input)
        .with_context(|| format!("open input {}", args.input.display()))?;
    let parsed = read_subjects(BufReader::new(file), screening_date)
        .with_context(|| format!("read subjects from {}", args.input.display()))?;
    if parsed.subjects.is_empty() {
        bail!("no subjects could be read from {}", args.input.display());
    }

    let assessor = Assessor::new(&store);
    let assessments = screen_subjects(&assessor, &parsed.subjects);

    if let Some(path) = &args.output {
        let file =
            File::create(path).with_context(|| format!("create output {}", path.display()))?;
        let rows = write_results(BufWriter::new(file), &parsed.subjects, &assessments)
            .with_context(|| format!("write results to {}", path.display()))?;
        info!(rows, output = %path.display(), "wrote screening results");
    }

    let result = ScreenResult {
        input: args.input.clone(),
        output: args.output.clone(),
        summary: ScreeningSummary::from_assessments(&assessments),
        skipped: parsed.skipped,
        unassessed: assessments.iter().filter(|a| !a.is_assessed()).count(),
    };
    if args.json {
        print_json(&result.summary)?;
    } else {
        print_screening(&result);
    }
    Ok(result)
}
