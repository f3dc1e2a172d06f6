//! # Rows
//!
//! A [`Row`] holds one [`Cell`] per [`ScheduleCColumn`] and is indexed by
//! column. Row numbers are handed out by a [`RowSequence`] owned by the
//! grid; clearing a row's content never gives its number back.

use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::cell::{Cell, RowStatus};
use crate::column::{ScheduleCColumn, COLUMN_COUNT};

/// Monotonic source of row numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowSequence {
    next: u64,
}

impl RowSequence {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Take the next row number.
    pub fn next_number(&mut self) -> u64 {
        let number = self.next;
        self.next += 1;
        number
    }

    /// The number the next row will receive.
    pub fn peek(&self) -> u64 {
        self.next
    }

    /// Start numbering from 1 again.
    pub fn reset(&mut self) {
        self.next = 1;
    }
}

impl Default for RowSequence {
    fn default() -> Self {
        Self::new()
    }
}

/// One data row of the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    number: u64,
    cells: [Cell; COLUMN_COUNT],
    /// What the row-number cell shows.
    pub status: RowStatus,
}

impl Row {
    /// A blank row. Editable columns are read-only when `read_only` is set.
    pub fn blank(number: u64, read_only: bool) -> Self {
        let cells = ScheduleCColumn::ALL.map(|column| match column {
            ScheduleCColumn::RowNumber => Cell::with_value(number.to_string(), true),
            // Unlocked only once "Other" is chosen as the expected use.
            ScheduleCColumn::ExpectedUseOther => Cell::new(true),
            other if other.kind().is_editable() => Cell::new(read_only),
            _ => Cell::new(true),
        });
        Self {
            number,
            cells,
            status: RowStatus::Number,
        }
    }

    pub fn number(&self) -> u64 {
        self.number
    }

    pub fn value(&self, column: ScheduleCColumn) -> &str {
        &self[column].value
    }

    pub fn set_value(&mut self, column: ScheduleCColumn, value: impl Into<String>) {
        self[column].value = value.into();
    }

    /// Cells with their columns, in physical order.
    pub fn cells(&self) -> impl Iterator<Item = (ScheduleCColumn, &Cell)> {
        ScheduleCColumn::ALL.into_iter().zip(self.cells.iter())
    }

    /// Fuel type, fuel class, quantity and expected use are all filled in.
    pub fn has_required_fields(&self) -> bool {
        [
            ScheduleCColumn::FuelType,
            ScheduleCColumn::FuelClass,
            ScheduleCColumn::Quantity,
            ScheduleCColumn::ExpectedUse,
        ]
        .into_iter()
        .all(|column| !self[column].is_empty())
    }

    /// Expected use, fuel class, fuel type and quantity are all empty.
    ///
    /// Such rows are left out of the projected record list.
    pub fn is_blank(&self) -> bool {
        [
            ScheduleCColumn::ExpectedUse,
            ScheduleCColumn::FuelClass,
            ScheduleCColumn::FuelType,
            ScheduleCColumn::Quantity,
        ]
        .into_iter()
        .all(|column| self[column].is_empty())
    }

    pub fn has_errors(&self) -> bool {
        self.cells.iter().any(|cell| cell.error)
    }

    pub fn clear_errors(&mut self) {
        for cell in &mut self.cells {
            cell.error = false;
        }
    }

    /// Empty every content cell. The row number is kept.
    pub fn clear_content(&mut self) {
        for column in [
            ScheduleCColumn::FuelType,
            ScheduleCColumn::FuelClass,
            ScheduleCColumn::Quantity,
            ScheduleCColumn::Units,
            ScheduleCColumn::ExpectedUse,
            ScheduleCColumn::ExpectedUseOther,
        ] {
            self[column].value.clear();
        }
        self[ScheduleCColumn::ExpectedUseOther].read_only = true;
    }

    /// Lock or unlock every editable cell, keeping "Other"-gating intact.
    pub(crate) fn set_read_only(&mut self, read_only: bool) {
        let other_unlocked = !read_only && self.expected_use_is_other();
        for column in ScheduleCColumn::ALL {
            let cell = &mut self[column];
            cell.read_only = match column {
                ScheduleCColumn::ExpectedUseOther => !other_unlocked,
                c if c.kind().is_editable() => read_only,
                _ => true,
            };
        }
    }

    pub(crate) fn expected_use_is_other(&self) -> bool {
        self.value(ScheduleCColumn::ExpectedUse) == tfrs_core::OTHER_EXPECTED_USE
    }
}

impl Index<ScheduleCColumn> for Row {
    type Output = Cell;

    fn index(&self, column: ScheduleCColumn) -> &Cell {
        &self.cells[column.index()]
    }
}

impl IndexMut<ScheduleCColumn> for Row {
    fn index_mut(&mut self, column: ScheduleCColumn) -> &mut Cell {
        &mut self.cells[column.index()]
    }
}
