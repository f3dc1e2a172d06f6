//! # Upstream Sync
//!
//! Pushes records from the parent into the grid. Two paths exist:
//!
//! - [`sync_records`] for editable sections: values are normalized, units
//!   re-resolved from the fuel type, rows past the records zeroed, and every
//!   row reconciled against the latest validation (unless a validation
//!   round-trip is still in flight).
//! - [`sync_snapshot`] for read-only snapshots: values are copied verbatim
//!   and nothing is zeroed or reconciled.
//!
//! Both grow the grid to fit the records; neither removes rows.

use serde_json::Value;
use tfrs_core::{normalize_quantity, ReferenceData, OTHER_EXPECTED_USE};

use crate::column::ScheduleCColumn;
use crate::grid::Grid;
use crate::record::ScheduleCRecord;
use crate::row::Row;
use crate::validation::{reconcile_row, SheetValidation};

/// Sync editable rows from `records`.
///
/// `validation` is `None` while validation is in flight; rows then keep
/// their current markers.
pub fn sync_records(
    grid: &mut Grid,
    records: &[ScheduleCRecord],
    reference: &ReferenceData,
    read_only: bool,
    validation: Option<&SheetValidation>,
) {
    let grown = grid.ensure_rows(records.len(), read_only);

    for (index, (row, record)) in grid.rows_mut().iter_mut().zip(records).enumerate() {
        copy_record(row, record, reference, read_only);
        if let Some(validation) = validation {
            reconcile_row(row, index, validation);
        }
    }

    let rows = grid.rows_mut();
    for (index, row) in rows.iter_mut().enumerate().skip(records.len()) {
        row.clear_content();
        if let Some(validation) = validation {
            reconcile_row(row, index, validation);
        }
    }

    tracing::debug!(
        records = records.len(),
        grown,
        rows = grid.len(),
        "synced schedule records"
    );
}

fn copy_record(row: &mut Row, record: &ScheduleCRecord, reference: &ReferenceData, read_only: bool) {
    row.set_value(ScheduleCColumn::FuelType, record.fuel_type.as_str());
    row.set_value(ScheduleCColumn::FuelClass, record.fuel_class.as_str());
    row.set_value(ScheduleCColumn::ExpectedUse, record.expected_use.as_str());
    row.set_value(ScheduleCColumn::ExpectedUseOther, record.rationale.as_str());
    row[ScheduleCColumn::ExpectedUseOther].read_only =
        record.expected_use != OTHER_EXPECTED_USE || read_only;
    row.set_value(
        ScheduleCColumn::Quantity,
        normalize_quantity(&Value::from(record.quantity.as_str())),
    );
    row.set_value(
        ScheduleCColumn::Units,
        reference
            .fuel_named(&record.fuel_type)
            .and_then(|fuel| fuel.unit_name())
            .unwrap_or_default(),
    );
}

/// Copy snapshot records into the grid as they are.
pub fn sync_snapshot(grid: &mut Grid, records: &[ScheduleCRecord]) {
    grid.ensure_rows(records.len(), true);
    for (row, record) in grid.rows_mut().iter_mut().zip(records) {
        row.set_value(ScheduleCColumn::FuelType, record.fuel_type.as_str());
        row.set_value(ScheduleCColumn::FuelClass, record.fuel_class.as_str());
        row.set_value(ScheduleCColumn::ExpectedUse, record.expected_use.as_str());
        row.set_value(ScheduleCColumn::ExpectedUseOther, record.rationale.as_str());
        row.set_value(ScheduleCColumn::Quantity, record.quantity.as_str());
        row.set_value(
            ScheduleCColumn::Units,
            record.unit_of_measure.as_deref().unwrap_or_default(),
        );
    }
    tracing::debug!(records = records.len(), "synced snapshot records");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::RowStatus;
    use chrono::NaiveDate;
    use tfrs_core::{ApprovedFuel, FuelClass, FuelClassId, FuelTypeId, UnitOfMeasure};

    fn reference() -> ReferenceData {
        ReferenceData::new(vec![ApprovedFuel {
            id: FuelTypeId(1),
            name: "Propane".into(),
            effective_date: NaiveDate::from_ymd_opt(2017, 1, 1).unwrap(),
            fuel_classes: vec![FuelClass {
                id: FuelClassId(1),
                fuel_class: "Gasoline".into(),
            }],
            unit_of_measure: Some(UnitOfMeasure::new("L")),
        }])
    }

    fn record(fuel_type: &str, quantity: &str, expected_use: &str) -> ScheduleCRecord {
        ScheduleCRecord {
            fuel_type: fuel_type.into(),
            fuel_class: "Gasoline".into(),
            expected_use: expected_use.into(),
            rationale: "because".into(),
            quantity: quantity.into(),
            unit_of_measure: None,
        }
    }

    #[test]
    fn records_fill_rows_and_grow_grid() {
        let mut grid = Grid::new();
        grid.add_rows(1, false);
        let records = vec![record("Propane", "10", "Other"), record("Unknown", "1234.00", "Heating Oil")];
        sync_records(&mut grid, &records, &reference(), false, None);

        assert_eq!(grid.len(), 2);
        let first = grid.row(0).unwrap();
        assert_eq!(first.value(ScheduleCColumn::Units), "L");
        assert!(!first[ScheduleCColumn::ExpectedUseOther].read_only);

        let second = grid.row(1).unwrap();
        assert_eq!(second.number(), 2);
        assert_eq!(second.value(ScheduleCColumn::Quantity), "1234");
        assert_eq!(second.value(ScheduleCColumn::Units), "");
        assert!(second[ScheduleCColumn::ExpectedUseOther].read_only);
    }

    #[test]
    fn non_numeric_quantity_is_cleared() {
        let mut grid = Grid::new();
        sync_records(&mut grid, &[record("Propane", "lots", "Other")], &reference(), false, None);
        assert_eq!(grid.row(0).unwrap().value(ScheduleCColumn::Quantity), "");
    }

    #[test]
    fn read_only_locks_rationale_even_for_other() {
        let mut grid = Grid::new();
        sync_records(&mut grid, &[record("Propane", "1", "Other")], &reference(), true, None);
        assert!(grid.row(0).unwrap()[ScheduleCColumn::ExpectedUseOther].read_only);
    }

    #[test]
    fn rows_past_records_are_zeroed_and_reconciled() {
        let mut grid = Grid::new();
        grid.add_rows(3, false);
        let reference = reference();
        sync_records(
            &mut grid,
            &[record("Propane", "1", "Other"), record("Propane", "2", "Other"), record("Propane", "3", "Other")],
            &reference,
            false,
            None,
        );
        grid.row_mut(2).unwrap()[ScheduleCColumn::Quantity].error = true;

        sync_records(
            &mut grid,
            &[record("Propane", "1", "Other")],
            &reference,
            false,
            Some(&SheetValidation::Clean),
        );

        assert_eq!(grid.len(), 3);
        let zeroed = grid.row(2).unwrap();
        assert!(zeroed.is_blank());
        assert_eq!(zeroed.value(ScheduleCColumn::Units), "");
        assert!(!zeroed.has_errors());
        assert_eq!(zeroed.status, RowStatus::Number);
        assert_eq!(grid.row(0).unwrap().status, RowStatus::Complete);
    }

    #[test]
    fn short_row_list_leaves_zeroed_rows_flagged() {
        let mut grid = Grid::new();
        grid.add_rows(2, false);
        grid.row_mut(1).unwrap()[ScheduleCColumn::Quantity].error = true;

        let validation = SheetValidation::PerRowErrors(vec![crate::validation::RowErrors::default()]);
        sync_records(&mut grid, &[record("Propane", "1", "Other")], &reference(), false, Some(&validation));

        assert_eq!(grid.row(0).unwrap().status, RowStatus::Complete);
        let zeroed = grid.row(1).unwrap();
        assert!(zeroed.is_blank());
        assert!(zeroed[ScheduleCColumn::Quantity].error);
    }

    #[test]
    fn in_flight_validation_keeps_markers() {
        let mut grid = Grid::new();
        grid.add_rows(1, false);
        grid.row_mut(0).unwrap()[ScheduleCColumn::FuelType].error = true;
        sync_records(&mut grid, &[record("Propane", "1", "Other")], &reference(), false, None);
        assert!(grid.row(0).unwrap()[ScheduleCColumn::FuelType].error);
    }

    #[test]
    fn snapshot_copies_verbatim() {
        let mut grid = Grid::new();
        grid.add_rows(2, true);
        let mut snap = record("Retired fuel", "12.50", "Other");
        snap.unit_of_measure = Some("m³".into());
        sync_snapshot(&mut grid, &[snap]);

        let row = grid.row(0).unwrap();
        assert_eq!(row.value(ScheduleCColumn::FuelType), "Retired fuel");
        assert_eq!(row.value(ScheduleCColumn::Quantity), "12.50");
        assert_eq!(row.value(ScheduleCColumn::Units), "m³");
        assert_eq!(grid.len(), 2);
    }
}
