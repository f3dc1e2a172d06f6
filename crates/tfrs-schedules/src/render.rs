//! # Sheet View
//!
//! A serializable snapshot of the grid as a browser grid would draw it:
//! header cells with their spans, then one entry per data row with the
//! class string, display text and lock state of every cell.

use serde::Serialize;
use tfrs_core::format_quantity;

use crate::cell::{HeaderCell, RowStatus};
use crate::column::ScheduleCColumn;
use crate::grid::Grid;
use crate::row::Row;

/// Heading shown above the Schedule C grid.
pub const SCHEDULE_C_TITLE: &str = "Schedule C - Fuels used for other purposes";

/// Header cells render as they are stored.
pub type RenderedHeader = HeaderCell;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedSheet {
    pub title: &'static str,
    pub schedule_type: &'static str,
    pub headers: Vec<Vec<RenderedHeader>>,
    pub rows: Vec<RenderedRow>,
    pub totals: RenderedTotals,
    pub read_only: bool,
    pub add_row_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedRow {
    pub number: u64,
    pub status: RowStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<&'static str>,
    pub cells: Vec<RenderedCell>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedCell {
    pub column: ScheduleCColumn,
    /// Stored value.
    pub value: String,
    /// Text to draw: formatted quantity, status icon name, or the value.
    pub display: String,
    pub class_name: String,
    pub read_only: bool,
    pub error: bool,
}

/// The summary line under the grid, formatted like quantities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedTotals {
    pub diesel: String,
    pub gasoline: String,
}

impl RenderedSheet {
    pub fn row(&self, index: usize) -> Option<&RenderedRow> {
        self.rows.get(index)
    }
}

impl RenderedRow {
    pub fn cell(&self, column: ScheduleCColumn) -> &RenderedCell {
        &self.cells[column.index()]
    }
}

/// Render `grid`. `read_only` disables the add-row control.
pub fn render_sheet(grid: &Grid, read_only: bool) -> RenderedSheet {
    RenderedSheet {
        title: SCHEDULE_C_TITLE,
        schedule_type: "schedule-c",
        headers: grid.headers().iter().map(|row| row.to_vec()).collect(),
        rows: grid.rows().iter().map(render_row).collect(),
        totals: render_totals(grid),
        read_only,
        add_row_enabled: !read_only,
    }
}

/// Decimal places kept in a rendered total.
const TOTAL_PRECISION: usize = 6;

fn render_totals(grid: &Grid) -> RenderedTotals {
    let totals = grid.totals();
    RenderedTotals {
        diesel: display_total(totals.diesel),
        gasoline: display_total(totals.gasoline),
    }
}

/// Round away float noise from summing, then drop trailing zeros.
fn display_total(sum: f64) -> String {
    let fixed = format!("{:.*}", TOTAL_PRECISION, sum);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "-0" => format_quantity("0"),
        _ => format_quantity(trimmed),
    }
}

fn render_row(row: &Row) -> RenderedRow {
    let icon = row.status.icon();
    let cells = row
        .cells()
        .map(|(column, cell)| {
            let display = match column {
                ScheduleCColumn::RowNumber => icon.map_or_else(|| cell.value.clone(), str::to_string),
                ScheduleCColumn::Quantity => format_quantity(&cell.value),
                _ => cell.value.clone(),
            };
            RenderedCell {
                column,
                value: cell.value.clone(),
                display,
                class_name: cell.class_name(column),
                read_only: cell.read_only,
                error: cell.error,
            }
        })
        .collect();
    RenderedRow {
        number: row.number(),
        status: row.status,
        icon,
        cells,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantity_displays_with_separators() {
        let mut grid = Grid::new();
        grid.add_rows(1, false);
        grid.row_mut(0)
            .unwrap()
            .set_value(ScheduleCColumn::Quantity, "1234567");
        let sheet = render_sheet(&grid, false);
        let cell = sheet.rows[0].cell(ScheduleCColumn::Quantity);
        assert_eq!(cell.value, "1234567");
        assert_eq!(cell.display, "1,234,567");
        assert_eq!(cell.class_name, "number");
    }

    #[test]
    fn row_number_shows_icon_or_number() {
        let mut grid = Grid::new();
        grid.add_rows(2, false);
        let row = grid.row_mut(1).unwrap();
        row.status = RowStatus::Error;
        row[ScheduleCColumn::RowNumber].error = true;

        let sheet = render_sheet(&grid, false);
        assert_eq!(sheet.rows[0].cell(ScheduleCColumn::RowNumber).display, "1");
        let flagged = sheet.rows[1].cell(ScheduleCColumn::RowNumber);
        assert_eq!(flagged.display, "exclamation-triangle");
        assert_eq!(flagged.class_name, "row-number error");
        assert_eq!(sheet.rows[1].icon, Some("exclamation-triangle"));
    }

    #[test]
    fn sheet_metadata() {
        let grid = Grid::new();
        let sheet = render_sheet(&grid, true);
        assert_eq!(sheet.title, SCHEDULE_C_TITLE);
        assert!(!sheet.add_row_enabled);
        assert_eq!(sheet.headers.len(), 2);
        let json = serde_json::to_value(&sheet).unwrap();
        assert_eq!(json["headers"][0][1]["colSpan"], 4);
        assert_eq!(json["scheduleType"], "schedule-c");
        assert_eq!(json["totals"]["diesel"], "0");
    }

    #[test]
    fn totals_are_formatted() {
        let mut grid = Grid::new();
        grid.add_rows(2, false);
        for row in grid.rows_mut() {
            row.set_value(ScheduleCColumn::FuelClass, "Gasoline");
            row.set_value(ScheduleCColumn::Quantity, "600000");
        }
        let sheet = render_sheet(&grid, false);
        assert_eq!(sheet.totals.gasoline, "1,200,000");
        assert_eq!(sheet.totals.diesel, "0");
    }

    #[test]
    fn totals_hide_float_noise() {
        let mut grid = Grid::new();
        grid.add_rows(3, false);
        let entries = [("Diesel", "0.1"), ("Diesel", "0.2"), ("Gasoline", "1234.5")];
        for (row, (class, quantity)) in grid.rows_mut().iter_mut().zip(entries) {
            row.set_value(ScheduleCColumn::FuelClass, class);
            row.set_value(ScheduleCColumn::Quantity, quantity);
        }
        let sheet = render_sheet(&grid, false);
        assert_eq!(sheet.totals.diesel, "0.3");
        assert_eq!(sheet.totals.gasoline, "1,234.5");
        assert_eq!(display_total(-1e-9), "0");
    }
}
