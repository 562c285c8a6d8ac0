use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use overlap_match::Evaluation;
use overlap_report::OverlapAnalysis;

use crate::commands::RunOutcome;

pub fn print_run_summary(outcome: &RunOutcome) {
    println!("Threshold: {}%", outcome.threshold);
    for path in &outcome.reports {
        println!("Report: {}", path.display());
    }
    if outcome.rows.is_empty() {
        println!("No overlapping drugs found!");
        return;
    }
    print_analysis(&outcome.analysis);
}

fn print_analysis(analysis: &OverlapAnalysis) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Confidence"), header_cell("Matches")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![
        Cell::new(format!("High (≥{}%)", analysis.high_floor)).fg(Color::Green),
        Cell::new(analysis.high_confidence),
    ]);
    table.add_row(vec![
        Cell::new(format!(
            "Medium ({}-{}%)",
            analysis.medium_floor,
            analysis.high_floor.saturating_sub(1).max(analysis.medium_floor)
        ))
        .fg(Color::Yellow),
        Cell::new(analysis.medium_confidence),
    ]);
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(analysis.total).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");

    let mut top = Table::new();
    top.set_header(vec![
        header_cell("Source drug"),
        header_cell("Matched drug"),
        header_cell("Score"),
    ]);
    apply_table_style(&mut top);
    align_column(&mut top, 2, CellAlignment::Right);
    for entry in &analysis.top_matches {
        top.add_row(vec![
            Cell::new(&entry.source_name),
            Cell::new(&entry.matched_name),
            Cell::new(format!("{:.1}%", entry.score)),
        ]);
    }
    println!("Top {} matches:", analysis.top_matches.len());
    println!("{top}");

    for hint in review_hints(analysis) {
        println!("  - {hint}");
    }
}

/// Review notes for analysts; empty when nothing looks suspicious.
pub fn review_hints(analysis: &OverlapAnalysis) -> Vec<String> {
    let mut hints = Vec::new();
    if analysis.indication_length_gaps > 0 {
        hints.push(format!(
            "{} matches have very different indication lengths (review for false positives)",
            analysis.indication_length_gaps
        ));
    }
    if analysis.missing_source_dates > 0 {
        hints.push(format!(
            "{} source drugs missing approval dates",
            analysis.missing_source_dates
        ));
    }
    if analysis.missing_target_dates > 0 {
        hints.push(format!(
            "{} target drugs missing approval dates",
            analysis.missing_target_dates
        ));
    }
    hints
}

pub fn print_sweep(evaluations: &[Evaluation]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Threshold"),
        header_cell("TP"),
        header_cell("FP"),
        header_cell("FN"),
        header_cell("Precision"),
        header_cell("Recall"),
        header_cell("F1"),
    ]);
    apply_table_style(&mut table);
    for index in 0..7 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for evaluation in evaluations {
        table.add_row(vec![
            Cell::new(format!("{}%", evaluation.threshold)),
            Cell::new(evaluation.true_positives),
            count_cell(evaluation.false_positives, Color::Red),
            count_cell(evaluation.false_negatives, Color::Yellow),
            Cell::new(format!("{:.3}", evaluation.precision)),
            Cell::new(format!("{:.3}", evaluation.recall)),
            Cell::new(format!("{:.3}", evaluation.f1)),
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

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count == 0 {
        Cell::new(count).add_attribute(Attribute::Dim)
    } else {
        Cell::new(count).fg(color)
    }
}
