//! crates/app_review_core/src/display.rs
//!
//! Maps a view mode and a table snapshot to the data-only plan the render
//! surface paints. Nothing here can fail; bad or empty data renders empty.

use crate::domain::{FieldValue, TableSnapshot, ViewMode};

/// One table row, with one cell per column in column order.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedRow {
    pub id: usize,
    pub cells: Vec<FieldValue>,
}

/// One card in the grid, carrying the row's fields unmodified.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub id: usize,
    pub fields: Vec<(String, FieldValue)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderPlan {
    Empty,
    TableView {
        columns: Vec<String>,
        rows: Vec<PlannedRow>,
    },
    CardGrid(Vec<Card>),
}

/// Chooses what to render for a snapshot.
///
/// Columns come from the first row only; a later row lacking one of them
/// gets a `Null` cell and any extra fields it has are not shown.
pub fn select(view_mode: ViewMode, snapshot: &TableSnapshot) -> RenderPlan {
    if snapshot.is_empty() {
        return RenderPlan::Empty;
    }
    match view_mode {
        ViewMode::Table => {
            let columns = snapshot.columns();
            let rows = snapshot
                .rows()
                .iter()
                .map(|row| PlannedRow {
                    id: row.id,
                    cells: columns
                        .iter()
                        .map(|c| row.record.get(c).cloned().unwrap_or(FieldValue::Null))
                        .collect(),
                })
                .collect();
            RenderPlan::TableView { columns, rows }
        }
        ViewMode::Cards => RenderPlan::CardGrid(
            snapshot
                .rows()
                .iter()
                .map(|row| Card {
                    id: row.id,
                    fields: row.record.fields().to_vec(),
                })
                .collect(),
        ),
    }
}

/// Splits an answer into the lines the render surface separates with breaks.
pub fn answer_paragraphs(answer: &str) -> Vec<&str> {
    answer.lines().collect()
}
