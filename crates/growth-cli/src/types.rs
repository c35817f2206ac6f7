use std::path::PathBuf;

use growth_cli::batch::RowError;
use growth_engine::{GrowthAssessment, ScreeningSummary};

#[derive(Debug)]
pub struct AssessResult {
    pub assessment: GrowthAssessment,
    pub edition: Option<String>,
}

#[derive(Debug)]
pub struct ScreenResult {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub summary: ScreeningSummary,
    pub skipped: Vec<RowError>,
    /// Subjects for which no indicator could be assessed.
    pub unassessed: usize,
}
