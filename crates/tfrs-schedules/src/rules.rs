//! # Field Derivation Rules
//!
//! Applied when a user edits a cell. These are not server validation: they
//! resolve what was typed against the lookups and keep dependent columns in
//! step.
//!
//! - **Fuel type**: resolved by case-insensitive name. No match clears it.
//!   A fuel with exactly one class pre-selects that class, otherwise the
//!   class is cleared. Units follow the fuel's unit of measure.
//! - **Fuel class**: resolved against the selected fuel's classes.
//! - **Quantity**: separators stripped; non-numeric input becomes empty.
//! - **Expected use**: resolved against the expected-use list. Typing
//!   anything but the literal `"Other"` clears the rationale column. The
//!   rationale is editable only while the resolved use is `"Other"`.
//! - **Rationale** (expected use other): stored verbatim.
//!
//! Edits that cannot land (header rows, display-only or locked cells, rows
//! that do not exist) are rejected with an [`EditError`]; the caller skips
//! them and carries on with the rest of the batch.

use serde::{de, Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tfrs_core::{clean_quantity, OTHER_EXPECTED_USE};

use crate::column::ScheduleCColumn;
use crate::grid::Grid;
use crate::options::EditContext;
use crate::row::Row;

/// One cell edit as reported by the host grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellChange {
    /// Grid row, counting the two header rows.
    pub row: usize,
    /// Column name, error key, or physical index.
    #[serde(deserialize_with = "column_ref")]
    pub col: ScheduleCColumn,
    #[serde(default)]
    pub value: String,
}

fn column_ref<'de, D>(deserializer: D) -> Result<ScheduleCColumn, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ColumnRef {
        Index(usize),
        Name(String),
    }

    match ColumnRef::deserialize(deserializer)? {
        ColumnRef::Index(index) => ScheduleCColumn::from_index(index)
            .ok_or_else(|| de::Error::custom(format!("no Schedule C column at index {index}"))),
        ColumnRef::Name(name) => name.parse().map_err(de::Error::custom),
    }
}

impl CellChange {
    pub fn new(row: usize, col: ScheduleCColumn, value: impl Into<String>) -> Self {
        Self {
            row,
            col,
            value: value.into(),
        }
    }
}

/// Why an edit was not applied.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("grid row {row} is a header row")]
    HeaderRow { row: usize },

    #[error("grid row {row} does not exist (grid has {total} rows)")]
    RowOutOfRange { row: usize, total: usize },

    #[error("column {column} is display-only")]
    DisplayOnly { column: ScheduleCColumn },

    #[error("cell {column} of grid row {row} is read-only")]
    ReadOnly { row: usize, column: ScheduleCColumn },
}

/// Apply one edit to the grid, including its derivation rule.
pub fn apply_change(
    grid: &mut Grid,
    change: &CellChange,
    ctx: &EditContext<'_>,
) -> Result<(), EditError> {
    let index = Grid::data_index(change.row).ok_or(EditError::HeaderRow { row: change.row })?;
    let total = grid.total_rows();
    let row = grid.row_mut(index).ok_or(EditError::RowOutOfRange {
        row: change.row,
        total,
    })?;

    if !change.col.kind().is_editable() {
        return Err(EditError::DisplayOnly { column: change.col });
    }
    if row[change.col].read_only {
        return Err(EditError::ReadOnly {
            row: change.row,
            column: change.col,
        });
    }

    match change.col {
        ScheduleCColumn::FuelType => apply_fuel_type(row, &change.value, ctx),
        ScheduleCColumn::FuelClass => apply_fuel_class(row, &change.value, ctx),
        ScheduleCColumn::Quantity => row.set_value(ScheduleCColumn::Quantity, clean_quantity(&change.value)),
        ScheduleCColumn::ExpectedUse => apply_expected_use(row, &change.value, ctx),
        column => row.set_value(column, change.value.as_str()),
    }
    tracing::debug!(row = change.row, column = %change.col, "applied cell edit");
    Ok(())
}

fn apply_fuel_type(row: &mut Row, typed: &str, ctx: &EditContext<'_>) {
    let fuel = ctx.reference.find_fuel(typed);

    row.set_value(
        ScheduleCColumn::FuelType,
        fuel.map(|f| f.name.clone()).unwrap_or_default(),
    );
    row.set_value(
        ScheduleCColumn::FuelClass,
        fuel.and_then(|f| f.sole_fuel_class())
            .map(|fc| fc.fuel_class.clone())
            .unwrap_or_default(),
    );
    row.set_value(
        ScheduleCColumn::Units,
        fuel.and_then(|f| f.unit_name()).unwrap_or_default(),
    );
}

fn apply_fuel_class(row: &mut Row, typed: &str, ctx: &EditContext<'_>) {
    let resolved = ctx
        .reference
        .find_fuel(row.value(ScheduleCColumn::FuelType))
        .and_then(|fuel| fuel.find_fuel_class(typed))
        .map(|fc| fc.fuel_class.clone())
        .unwrap_or_default();
    row.set_value(ScheduleCColumn::FuelClass, resolved);
}

fn apply_expected_use(row: &mut Row, typed: &str, ctx: &EditContext<'_>) {
    let resolved = ctx
        .expected_uses
        .find(typed)
        .map(|item| item.description.clone())
        .unwrap_or_default();
    let is_other = resolved == OTHER_EXPECTED_USE;
    row.set_value(ScheduleCColumn::ExpectedUse, resolved);

    if typed != OTHER_EXPECTED_USE {
        row.set_value(ScheduleCColumn::ExpectedUseOther, "");
    }
    row[ScheduleCColumn::ExpectedUseOther].read_only = !is_other || ctx.read_only;
}
