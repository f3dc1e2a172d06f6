//! # Schedule C Records
//!
//! Wire types exchanged with the host and the draft store, and the
//! projection of grid rows back into records.
//!
//! Persisted reports are not strict about field types: strings may be
//! `null`, quantities arrive as JSON numbers or decimal strings, and the
//! unit of measure is either a name or a `{ "name": ... }` object. The
//! deserializers here accept all of those. Quantity strings are kept as
//! sent; editable rows normalize them when the grid is filled.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tfrs_core::{normalize_quantity, CompliancePeriod, ComplianceReportId};

use crate::column::ScheduleCColumn;
use crate::grid::Grid;
use crate::row::Row;

/// One non-empty Schedule C row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleCRecord {
    #[serde(default, deserialize_with = "nullable_string")]
    pub fuel_type: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub fuel_class: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub expected_use: String,
    /// Free-text expected use, filled in when the expected use is "Other".
    #[serde(default, deserialize_with = "nullable_string")]
    pub rationale: String,
    #[serde(default, deserialize_with = "lenient_quantity")]
    pub quantity: String,
    #[serde(
        default,
        deserialize_with = "unit_of_measure",
        skip_serializing_if = "Option::is_none"
    )]
    pub unit_of_measure: Option<String>,
}

impl ScheduleCRecord {
    /// Whether the four key fields are all empty.
    pub fn is_empty(&self) -> bool {
        self.expected_use.is_empty()
            && self.fuel_class.is_empty()
            && self.fuel_type.is_empty()
            && self.quantity.is_empty()
    }
}

fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_quantity<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        number @ Value::Number(_) => normalize_quantity(&number),
        _ => String::new(),
    })
}

fn unit_of_measure<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let name = match Value::deserialize(deserializer)? {
        Value::String(name) => Some(name),
        Value::Object(mut map) => match map.remove("name") {
            Some(Value::String(name)) => Some(name),
            _ => None,
        },
        _ => None,
    };
    Ok(name.filter(|name| !name.is_empty()))
}

/// `{ "records": [...] }` as found under `scheduleC`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleCSource {
    #[serde(default)]
    pub records: Vec<ScheduleCRecord>,
}

impl ScheduleCSource {
    pub fn new(records: Vec<ScheduleCRecord>) -> Self {
        Self { records }
    }
}

/// The draft held by the host's store: `{ "scheduleC": { "records": [...] } }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleState {
    #[serde(rename = "scheduleC", default, skip_serializing_if = "Option::is_none")]
    pub schedule_c: Option<ScheduleCSource>,
}

impl ScheduleState {
    pub fn with_records(records: Vec<ScheduleCRecord>) -> Self {
        Self {
            schedule_c: Some(ScheduleCSource::new(records)),
        }
    }

    pub fn records(&self) -> Option<&[ScheduleCRecord]> {
        self.schedule_c.as_ref().map(|source| source.records.as_slice())
    }
}

/// The persisted compliance report, as far as Schedule C cares.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ComplianceReportId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compliance_period: Option<CompliancePeriod>,
    #[serde(rename = "scheduleC", default, skip_serializing_if = "Option::is_none")]
    pub schedule_c: Option<ScheduleCSource>,
}

/// A frozen copy of a submitted report, shown read-only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(rename = "scheduleC", default, skip_serializing_if = "Option::is_none")]
    pub schedule_c: Option<ScheduleCSource>,
}

/// Project every non-empty data row into a record, in row order.
pub fn project_records(grid: &Grid) -> Vec<ScheduleCRecord> {
    grid.rows()
        .iter()
        .filter(|row| !row.is_blank())
        .map(record_from_row)
        .collect()
}

fn record_from_row(row: &Row) -> ScheduleCRecord {
    let units = row.value(ScheduleCColumn::Units);
    ScheduleCRecord {
        fuel_type: row.value(ScheduleCColumn::FuelType).to_string(),
        fuel_class: row.value(ScheduleCColumn::FuelClass).to_string(),
        expected_use: row.value(ScheduleCColumn::ExpectedUse).to_string(),
        rationale: row.value(ScheduleCColumn::ExpectedUseOther).to_string(),
        quantity: row.value(ScheduleCColumn::Quantity).to_string(),
        unit_of_measure: (!units.is_empty()).then(|| units.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_tolerates_nulls_and_numeric_quantity() {
        let record: ScheduleCRecord = serde_json::from_value(json!({
            "fuelType": "Propane",
            "fuelClass": null,
            "expectedUse": "Other",
            "rationale": null,
            "quantity": 1234.0,
        }))
        .unwrap();
        assert_eq!(record.fuel_class, "");
        assert_eq!(record.rationale, "");
        assert_eq!(record.quantity, "1234");
        assert_eq!(record.unit_of_measure, None);
    }

    #[test]
    fn record_quantity_string_is_kept_as_sent() {
        let record: ScheduleCRecord =
            serde_json::from_value(json!({ "quantity": "1234.50" })).unwrap();
        assert_eq!(record.quantity, "1234.50");
        let bad: ScheduleCRecord = serde_json::from_value(json!({ "quantity": "n/a" })).unwrap();
        assert_eq!(bad.quantity, "n/a");
        let missing: ScheduleCRecord = serde_json::from_value(json!({ "quantity": true })).unwrap();
        assert_eq!(missing.quantity, "");
    }

    #[test]
    fn unit_of_measure_as_name_or_object() {
        let named: ScheduleCRecord =
            serde_json::from_value(json!({ "unitOfMeasure": "L" })).unwrap();
        assert_eq!(named.unit_of_measure.as_deref(), Some("L"));
        let object: ScheduleCRecord =
            serde_json::from_value(json!({ "unitOfMeasure": { "name": "kg" } })).unwrap();
        assert_eq!(object.unit_of_measure.as_deref(), Some("kg"));
    }

    #[test]
    fn record_serializes_camel_case_without_missing_units() {
        let record = ScheduleCRecord {
            fuel_type: "Propane".into(),
            quantity: "10".into(),
            ..Default::default()
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["fuelType"], "Propane");
        assert_eq!(value["quantity"], "10");
        assert!(value.get("unitOfMeasure").is_none());
    }

    #[test]
    fn schedule_state_wire_shape() {
        let state: ScheduleState =
            serde_json::from_value(json!({ "scheduleC": { "records": [{ "fuelType": "Propane" }] } }))
                .unwrap();
        assert_eq!(state.records().map(<[_]>::len), Some(1));
        assert_eq!(ScheduleState::default().records(), None);
        assert_eq!(serde_json::to_value(ScheduleState::default()).unwrap(), json!({}));
    }

    #[test]
    fn projection_skips_blank_rows() {
        let mut grid = Grid::new();
        grid.add_rows(3, false);
        grid.row_mut(1)
            .unwrap()
            .set_value(ScheduleCColumn::Quantity, "50");
        grid.row_mut(2)
            .unwrap()
            .set_value(ScheduleCColumn::ExpectedUseOther, "only a rationale");
        let records = project_records(&grid);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].quantity, "50");
    }

    #[test]
    fn projected_record_carries_units_when_known() {
        let mut grid = Grid::new();
        grid.add_rows(1, false);
        let row = grid.row_mut(0).unwrap();
        row.set_value(ScheduleCColumn::FuelType, "Propane");
        row.set_value(ScheduleCColumn::Units, "L");
        let records = project_records(&grid);
        assert_eq!(records[0].unit_of_measure.as_deref(), Some("L"));
        assert!(!records[0].is_empty());
    }
}
