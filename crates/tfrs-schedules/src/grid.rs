//! # Grid Model
//!
//! Two fixed header rows followed by an appendable list of data rows. The
//! row count only grows: [`Grid::add_rows`] appends, nothing removes. Rows
//! that fall out of use are zeroed in place by the sync engine.
//!
//! Below the rows sits a summary slot: [`Grid::totals`] sums the quantity
//! entered per fuel class.
//!
//! Hosts address cells by *grid* row (headers included, as a browser grid
//! sees them). Everything inside this crate works with *data* row indices,
//! starting at zero for the first row below the headers.

use serde::Serialize;

use tfrs_core::matches_ignore_case;

use crate::cell::HeaderCell;
use crate::column::ScheduleCColumn;
use crate::row::{Row, RowSequence};

/// Number of fixed header rows above the data rows.
pub const HEADER_ROWS: usize = 2;

static HEADER_TOP: [HeaderCell; 4] = [
    HeaderCell::new(None, "row-number"),
    HeaderCell::new(Some("FUEL IDENTIFICATION AND QUANTITY"), "").spanning(4, 1),
    HeaderCell::new(Some("Expected Use"), "expected-use").spanning(1, 2),
    HeaderCell::new(Some("If other, write in expected use:"), "other").spanning(1, 2),
];

static HEADER_COLUMNS: [HeaderCell; 5] = [
    HeaderCell::new(None, ""),
    HeaderCell::new(Some("Fuel Type"), "fuel-type"),
    HeaderCell::new(Some("Fuel Class"), "fuel-class"),
    HeaderCell::new(Some("Quantity of Fuel Supplied"), "quantity"),
    HeaderCell::new(Some("Units"), "units"),
];

/// Quantity totals per fuel class, shown under the grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FuelClassTotals {
    pub diesel: f64,
    pub gasoline: f64,
}

/// The Schedule C grid.
#[derive(Debug, Clone, Serialize)]
pub struct Grid {
    rows: Vec<Row>,
    sequence: RowSequence,
}

impl Grid {
    /// A grid with its header rows and no data rows.
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            sequence: RowSequence::new(),
        }
    }

    /// The two header rows, top first.
    pub fn headers(&self) -> [&'static [HeaderCell]; HEADER_ROWS] {
        [&HEADER_TOP, &HEADER_COLUMNS]
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut [Row] {
        &mut self.rows
    }

    /// Data row by data index.
    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub fn row_mut(&mut self, index: usize) -> Option<&mut Row> {
        self.rows.get_mut(index)
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rows including the headers.
    pub fn total_rows(&self) -> usize {
        HEADER_ROWS + self.rows.len()
    }

    /// Map a grid row (headers included) to a data index.
    pub fn data_index(grid_row: usize) -> Option<usize> {
        grid_row.checked_sub(HEADER_ROWS)
    }

    /// Number the next appended row will receive.
    pub fn next_row_number(&self) -> u64 {
        self.sequence.peek()
    }

    /// Append `count` blank rows.
    pub fn add_rows(&mut self, count: usize, read_only: bool) {
        self.rows.reserve(count);
        for _ in 0..count {
            let number = self.sequence.next_number();
            self.rows.push(Row::blank(number, read_only));
        }
        tracing::debug!(added = count, rows = self.rows.len(), "appended schedule rows");
    }

    /// Grow the grid to hold at least `count` data rows. Returns how many
    /// rows were appended.
    pub fn ensure_rows(&mut self, count: usize, read_only: bool) -> usize {
        let missing = count.saturating_sub(self.rows.len());
        if missing > 0 {
            self.add_rows(missing, read_only);
        }
        missing
    }

    /// Restart row numbering at 1 for rows appended from now on.
    pub fn reset_sequence(&mut self) {
        self.sequence.reset();
    }

    /// Sum of quantities per fuel class. Rows without a usable quantity or
    /// with another class count for nothing.
    pub fn totals(&self) -> FuelClassTotals {
        let mut totals = FuelClassTotals::default();
        for row in &self.rows {
            let Ok(quantity) = row.value(ScheduleCColumn::Quantity).parse::<f64>() else {
                continue;
            };
            let class = row.value(ScheduleCColumn::FuelClass);
            if matches_ignore_case(class, "Diesel") {
                totals.diesel += quantity;
            } else if matches_ignore_case(class, "Gasoline") {
                totals.gasoline += quantity;
            }
        }
        totals
    }

    /// Lock or unlock all editable cells.
    pub(crate) fn set_read_only(&mut self, read_only: bool) {
        for row in &mut self.rows {
            row.set_read_only(read_only);
        }
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_has_only_headers() {
        let grid = Grid::new();
        assert!(grid.is_empty());
        assert_eq!(grid.total_rows(), HEADER_ROWS);
        let [top, columns] = grid.headers();
        assert_eq!(top.len(), 4);
        assert_eq!(top[1].col_span, 4);
        assert_eq!(top[2].row_span, 2);
        assert_eq!(columns[3].label, Some("Quantity of Fuel Supplied"));
    }

    #[test]
    fn add_rows_numbers_sequentially() {
        let mut grid = Grid::new();
        grid.add_rows(3, false);
        grid.add_rows(2, false);
        let numbers: Vec<_> = grid.rows().iter().map(Row::number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
        assert_eq!(grid.total_rows(), 7);
    }

    #[test]
    fn ensure_rows_only_grows() {
        let mut grid = Grid::new();
        grid.add_rows(5, false);
        assert_eq!(grid.ensure_rows(3, false), 0);
        assert_eq!(grid.len(), 5);
        assert_eq!(grid.ensure_rows(8, false), 3);
        assert_eq!(grid.len(), 8);
    }

    #[test]
    fn reset_sequence_affects_later_rows_only() {
        let mut grid = Grid::new();
        grid.add_rows(2, false);
        grid.reset_sequence();
        grid.add_rows(1, false);
        assert_eq!(grid.row(1).map(Row::number), Some(2));
        assert_eq!(grid.row(2).map(Row::number), Some(1));
    }

    #[test]
    fn data_index_skips_headers() {
        assert_eq!(Grid::data_index(0), None);
        assert_eq!(Grid::data_index(1), None);
        assert_eq!(Grid::data_index(2), Some(0));
        assert_eq!(Grid::data_index(6), Some(4));
    }

    #[test]
    fn totals_sum_quantities_per_class() {
        let mut grid = Grid::new();
        grid.add_rows(4, false);
        let entries = [("Diesel", "1500"), ("gasoline", "20.5"), ("Diesel", ""), ("Jet", "7")];
        for (row, (class, quantity)) in grid.rows_mut().iter_mut().zip(entries) {
            row.set_value(ScheduleCColumn::FuelClass, class);
            row.set_value(ScheduleCColumn::Quantity, quantity);
        }
        let totals = grid.totals();
        assert_eq!(totals.diesel, 1500.0);
        assert_eq!(totals.gasoline, 20.5);
    }

    #[test]
    fn set_read_only_locks_every_row() {
        let mut grid = Grid::new();
        grid.add_rows(2, false);
        grid.set_read_only(true);
        assert!(grid
            .rows()
            .iter()
            .all(|row| row[ScheduleCColumn::FuelType].read_only));
    }
}
