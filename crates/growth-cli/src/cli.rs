//! CLI argument definitions for the `growth` tool.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use growth_model::{Indicator, Sex};

#[derive(Parser)]
#[command(
    name = "growth",
    version,
    about = "Classify child anthropometry against the WHO Child Growth Standards",
    long_about = "Compute LMS z-scores and WHO nutritional-status categories\n\
                  (underweight, stunting, wasting, overweight) for single subjects\n\
                  or CSV screening batches."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow subject identifiers and measurements in log output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,

    /// Standards directory containing manifest.toml
    /// (default: $GROWTH_STANDARDS_DIR, then ./standards).
    #[arg(long = "standards-dir", value_name = "DIR", global = true)]
    pub standards_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the loaded reference tables.
    Tables,

    /// Load the standards directory and verify manifest checksums.
    Verify(VerifyArgs),

    /// Assess a single subject.
    Assess(AssessArgs),

    /// Screen every subject in a CSV file.
    Screen(ScreenArgs),
}

#[derive(Args)]
pub struct VerifyArgs {
    /// Print the verification summary as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct AssessArgs {
    /// Sex of the subject (male/female, m/f, boy/girl).
    #[arg(long, value_parser = parse_sex)]
    pub sex: Sex,

    /// Body weight in kilograms.
    #[arg(long, value_name = "KG")]
    pub weight: Option<f64>,

    /// Recumbent length or standing height in centimetres.
    #[arg(long, value_name = "CM")]
    pub height: Option<f64>,

    /// Age in days.
    #[arg(long = "age-days", value_name = "DAYS", group = "age")]
    pub age_days: Option<f64>,

    /// Age in months (converted with 30.4375 days per month).
    #[arg(long = "age-months", value_name = "MONTHS", group = "age")]
    pub age_months: Option<f64>,

    /// Date of birth (YYYY-MM-DD).
    #[arg(long = "birth-date", value_name = "DATE", group = "age")]
    pub birth_date: Option<String>,

    /// Screening date for --birth-date (YYYY-MM-DD, default: today).
    #[arg(long = "screening-date", value_name = "DATE", requires = "birth_date")]
    pub screening_date: Option<String>,

    /// Indicators to assess (repeatable; default: age-appropriate set).
    #[arg(long = "indicator", value_name = "INDICATOR", value_parser = parse_indicator)]
    pub indicators: Vec<Indicator>,

    /// Print the assessment as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct ScreenArgs {
    /// Subject CSV (columns: id, sex, age_days | age_months | birth_date, weight, height).
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Write per-subject results to this CSV file.
    #[arg(long, short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Screening date for rows without one (YYYY-MM-DD, default: today).
    #[arg(long = "screening-date", value_name = "DATE")]
    pub screening_date: Option<String>,

    /// Print the screening summary as JSON.
    #[arg(long)]
    pub json: bool,
}

fn parse_sex(raw: &str) -> Result<Sex, String> {
    raw.parse()
}

fn parse_indicator(raw: &str) -> Result<Indicator, String> {
    raw.parse()
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
