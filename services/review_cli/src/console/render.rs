//! services/review_cli/src/console/render.rs
//!
//! A plain-text render surface: paints the session the way the review page
//! lays it out, top to bottom.

use app_review_core::{
    display::{answer_paragraphs, RenderPlan},
    domain::{FieldValue, Platform},
    prompts::EXAMPLE_QUESTIONS,
    session::{Phase, SessionState},
};
use std::fmt::Write;

const MAX_CELL_WIDTH: usize = 40;

/// Renders the whole page for the current state.
pub fn render_session(state: &SessionState) -> String {
    let mut out = String::new();

    out.push_str(&render_platforms(state.platform));
    out.push('\n');
    out.push_str(&render_plan(&state.table_plan()));

    if state.loading {
        out.push_str("Generating answer...\n");
    }
    if state.show_examples() {
        out.push_str(&render_examples());
    }
    if let Some(error) = &state.error {
        let _ = writeln!(out, "Error: {}", error);
        if state.phase == Phase::AnswerError {
            out.push_str("Type 'retry' to ask again.\n");
        }
    }
    if let Some(answer) = state.visible_answer() {
        out.push_str("Answer:\n");
        for line in answer_paragraphs(answer) {
            let _ = writeln!(out, "  {}", line);
        }
    }
    out.push_str(&render_plan(&state.answer_table_plan()));
    out
}

/// The selector, with the active platform bracketed.
pub fn render_platforms(active: Platform) -> String {
    Platform::ALL
        .iter()
        .map(|p| {
            if *p == active {
                format!("[{}]", p.label())
            } else {
                format!(" {} ", p.label())
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn render_examples() -> String {
    let mut out = String::from("Examples:\n");
    for (i, example) in EXAMPLE_QUESTIONS.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", i + 1, example.label);
    }
    out
}

pub fn render_plan(plan: &RenderPlan) -> String {
    match plan {
        RenderPlan::Empty => String::new(),
        RenderPlan::TableView { columns, rows } => {
            let cells: Vec<Vec<String>> = rows
                .iter()
                .map(|row| row.cells.iter().map(cell_text).collect())
                .collect();
            let widths: Vec<usize> = columns
                .iter()
                .enumerate()
                .map(|(i, column)| {
                    cells
                        .iter()
                        .map(|row| row[i].chars().count())
                        .chain(std::iter::once(column.chars().count()))
                        .max()
                        .unwrap_or(0)
                })
                .collect();

            let mut out = String::new();
            let header: Vec<String> = columns.iter().map(|c| c.to_string()).collect();
            push_row(&mut out, &header, &widths);
            let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
            push_row(&mut out, &rule, &widths);
            for row in &cells {
                push_row(&mut out, row, &widths);
            }
            out
        }
        RenderPlan::CardGrid(cards) => {
            let mut out = String::new();
            for card in cards {
                let _ = writeln!(out, "#{}", card.id);
                for (name, value) in &card.fields {
                    let _ = writeln!(out, "  {}: {}", name, value);
                }
            }
            out
        }
    }
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect::<Vec<_>>()
        .join(" | ");
    let _ = writeln!(out, "{}", line.trim_end());
}

fn cell_text(value: &FieldValue) -> String {
    let text = value.to_string().replace('\n', " ");
    if text.chars().count() <= MAX_CELL_WIDTH {
        return text;
    }
    let mut cut: String = text.chars().take(MAX_CELL_WIDTH - 3).collect();
    cut.push_str("...");
    cut
}
