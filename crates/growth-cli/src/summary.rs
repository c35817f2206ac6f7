use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use growth_engine::{RiskLevel, ScreeningSummary, value_at};
use growth_model::{AdultBmiResult, Category, ClassificationResult, GrowthError, Indicator};
use growth_standards::{TableSummary, VerifySummary};

use crate::types::{AssessResult, ScreenResult};

pub fn print_tables(tables: &[TableSummary]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Indicator"),
        header_cell("Sex"),
        header_cell("Axis"),
        header_cell("Rows"),
        header_cell("Domain"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    for summary in tables {
        table.add_row(vec![
            Cell::new(summary.indicator.label())
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(summary.sex.label()),
            Cell::new(summary.axis.as_str()),
            Cell::new(summary.rows),
            Cell::new(format!(
                "{} - {} {}",
                summary.min_key,
                summary.max_key,
                summary.axis.unit()
            )),
        ]);
    }
    println!("{table}");
}

pub fn print_verify(summary: &VerifySummary) {
    println!("Standards: {}", summary.standards_dir.display());
    if let Some(edition) = &summary.edition {
        println!("Edition: {edition}");
    }
    println!(
        "Tables: {}  Rows: {}  Checksums verified: {}",
        summary.table_count, summary.row_count, summary.checksums_verified
    );
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Indicator"),
        header_cell("Sex"),
        header_cell("Rows"),
        header_cell("Path"),
        header_cell("SHA-256"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for entry in &summary.tables {
        table.add_row(vec![
            Cell::new(entry.indicator.label()),
            Cell::new(entry.sex.label()),
            Cell::new(entry.rows),
            Cell::new(entry.path.as_deref().unwrap_or("-")),
            entry
                .sha256
                .as_deref()
                .map_or_else(|| dim_cell("-"), |sha| dim_cell(sha.get(..12).unwrap_or(sha))),
        ]);
    }
    println!("{table}");
}

pub fn print_assessment(result: &AssessResult) {
    let assessment = &result.assessment;
    if let Some(edition) = &result.edition {
        println!("Reference: {edition}");
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Indicator"),
        header_cell("Z-score"),
        header_cell("Percentile"),
        header_cell("Category"),
        header_cell("Band"),
        header_cell("-2 / 0 / +2 SD"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for (indicator, outcome) in assessment.results() {
        table.add_row(match outcome {
            Ok(result) => result_row(result),
            Err(error) => error_row(*indicator, error),
        });
    }
    match assessment.adult_bmi() {
        Some(Ok(result)) => {
            table.add_row(adult_bmi_row(result));
        }
        Some(Err(error)) => {
            table.add_row(error_row(Indicator::BmiForAge, error));
        }
        None => {}
    }
    println!("{table}");
    println!("Risk level: {}", assessment.risk_level());
    for advice in assessment.recommendations() {
        println!("- {advice}");
    }
}

fn adult_bmi_row(result: &AdultBmiResult) -> Vec<Cell> {
    vec![
        Cell::new("BMI (adult)"),
        dim_cell("-"),
        dim_cell("-"),
        category_cell(result.category),
        dim_cell(format!("BMI {:.2}", result.reported_bmi())),
        dim_cell("-"),
    ]
}

fn result_row(result: &ClassificationResult) -> Vec<Cell> {
    let z_text = if result.score.capped {
        format!("{:+.2} (capped)", result.score.reported_z_score())
    } else {
        format!("{:+.2}", result.score.reported_z_score())
    };
    let mut z_cell = Cell::new(z_text);
    if result.score.implausible {
        z_cell = z_cell.fg(Color::Magenta).add_attribute(Attribute::Italic);
    }
    vec![
        Cell::new(result.indicator.label()),
        z_cell,
        Cell::new(format!("{:.1}", result.score.reported_percentile())),
        category_cell(result.category),
        dim_cell(result.boundary_used),
        dim_cell(reference_lines(result)),
    ]
}

/// Measurement values on the -2, 0 and +2 SD curves at the looked-up key.
fn reference_lines(result: &ClassificationResult) -> String {
    let lines: Vec<String> = [-2.0, 0.0, 2.0]
        .into_iter()
        .map(|z| {
            value_at(result.score.lms, z).map_or_else(|_| "-".to_string(), |v| format!("{v:.1}"))
        })
        .collect();
    lines.join(" / ")
}

fn error_row(indicator: Indicator, error: &GrowthError) -> Vec<Cell> {
    vec![
        Cell::new(indicator.label()),
        dim_cell("-"),
        dim_cell("-"),
        Cell::new(error.kind().as_str()).fg(Color::Red),
        Cell::new(error.to_string()).fg(Color::DarkGrey),
        dim_cell("-"),
    ]
}

pub fn print_screening(result: &ScreenResult) {
    let summary = &result.summary;
    println!("Input: {}", result.input.display());
    if let Some(path) = &result.output {
        println!("Output: {}", path.display());
    }
    println!(
        "Screened: {}  Unassessed: {}  High risk: {}  SAM: {}  Severely wasted: {}",
        summary.total_screened,
        result.unassessed,
        summary.high_risk_cases,
        summary.sam_cases,
        summary.severely_wasted
    );
    print_category_table(summary);
    print_risk_table(summary);
    if !result.skipped.is_empty() {
        eprintln!("Skipped rows:");
        for skipped in &result.skipped {
            eprintln!("- row {}: {}", skipped.row, skipped.message);
        }
    }
}

fn print_category_table(summary: &ScreeningSummary) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Indicator"),
        header_cell("Category"),
        header_cell("Count"),
        header_cell("%"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for (indicator, counts) in &summary.categories {
        for (category, count) in counts {
            let share = summary
                .category_percentages
                .get(indicator)
                .and_then(|shares| shares.get(category))
                .copied()
                .unwrap_or(0.0);
            table.add_row(vec![
                Cell::new(indicator.label()),
                category_cell(*category),
                count_cell(*count, category_color(*category)),
                Cell::new(format!("{share:.1}")),
            ]);
        }
    }
    for (indicator, kinds) in &summary.failures {
        for (kind, count) in kinds {
            table.add_row(vec![
                Cell::new(indicator.label()),
                dim_cell(kind),
                count_cell(*count, Color::Red),
                dim_cell("-"),
            ]);
        }
    }
    println!("{table}");
}

fn print_risk_table(summary: &ScreeningSummary) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Risk level"), header_cell("Subjects")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for level in RiskLevel::ALL {
        let count = summary.risk_levels.get(&level).copied().unwrap_or(0);
        table.add_row(vec![
            Cell::new(level.label()).fg(risk_color(level)),
            count_cell(count, risk_color(level)),
        ]);
    }
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn category_color(category: Category) -> Color {
    if category.is_severe() {
        Color::Red
    } else if category.is_moderate() {
        Color::Yellow
    } else {
        Color::Green
    }
}

fn category_cell(category: Category) -> Cell {
    let cell = Cell::new(category.label()).fg(category_color(category));
    if category.is_severe() {
        cell.add_attribute(Attribute::Bold)
    } else {
        cell
    }
}

fn risk_color(level: RiskLevel) -> Color {
    match level {
        RiskLevel::Severe => Color::Red,
        RiskLevel::Moderate => Color::Yellow,
        RiskLevel::Low => Color::Green,
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
