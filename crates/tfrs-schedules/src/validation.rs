//! # Validation Reconciliation
//!
//! The server validates a schedule as a whole and answers with one of two
//! message shapes under `scheduleC`:
//!
//! - a structured object, `{ "records": [ { "<errorKey>": ... }, ... ] }`,
//!   one entry per data row naming the failing columns;
//! - a flat list of cross-row messages, e.g. `"Duplicate entry in row 3"`.
//!
//! [`SheetValidation::from_props`] folds the section's `valid` flag and the
//! raw messages into a single variant, and [`reconcile_row`] applies it to
//! one data row. Reconciliation only touches error flags and the row-number
//! status, never cell values.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cell::RowStatus;
use crate::column::ScheduleCColumn;
use crate::row::Row;

/// Prefix of the cross-row message reporting a duplicated row. The data row
/// index follows it.
pub const DUPLICATE_ROW_MESSAGE: &str = "Duplicate entry in row ";

/// Failing columns of one data row, keyed by error key.
///
/// Values are whatever the server sent (usually a list of messages) and are
/// not interpreted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowErrors(pub BTreeMap<String, Value>);

impl RowErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Columns named by a recognised key. Unrecognised keys are dropped.
    pub fn columns(&self) -> impl Iterator<Item = ScheduleCColumn> + '_ {
        self.0.keys().filter_map(|key| ScheduleCColumn::from_error_key(key))
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for RowErrors {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Raw `scheduleC` validation payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScheduleValidationMessages {
    /// Unstructured cross-row messages.
    Messages(Vec<String>),
    /// Per-row errors, optionally with cross-row messages alongside.
    Structured {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        records: Option<Vec<RowErrors>>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        messages: Vec<String>,
    },
}

/// Validation messages for the whole report. Only `scheduleC` is read; the
/// other schedules' entries are carried along untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationMessages {
    #[serde(rename = "scheduleC", default, skip_serializing_if = "Option::is_none")]
    pub schedule_c: Option<ScheduleValidationMessages>,
    #[serde(flatten)]
    pub other: BTreeMap<String, Value>,
}

impl ValidationMessages {
    pub fn schedule_c(messages: ScheduleValidationMessages) -> Self {
        Self {
            schedule_c: Some(messages),
            other: BTreeMap::new(),
        }
    }
}

/// What the latest validation round-trip says about the sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SheetValidation {
    /// No round-trip yet and not flagged valid: rows keep their markers.
    #[default]
    Unvalidated,
    /// Nothing flagged for Schedule C.
    Clean,
    /// Failing columns per data row.
    PerRowErrors(Vec<RowErrors>),
    /// Cross-row messages only.
    GlobalMessages(Vec<String>),
    /// Per-row errors plus cross-row messages.
    Combined {
        rows: Vec<RowErrors>,
        messages: Vec<String>,
    },
}

impl SheetValidation {
    /// Fold the section's `valid` flag and raw messages into a variant.
    ///
    /// `valid` wins over any messages. Messages that carry nothing for
    /// Schedule C count as clean. A structured payload with neither
    /// `records` nor `messages` leaves rows as they are.
    pub fn from_props(valid: bool, messages: Option<&ValidationMessages>) -> Self {
        if valid {
            return Self::Clean;
        }
        let Some(messages) = messages else {
            return Self::Unvalidated;
        };
        match &messages.schedule_c {
            None => Self::Clean,
            Some(ScheduleValidationMessages::Messages(list)) => Self::GlobalMessages(list.clone()),
            Some(ScheduleValidationMessages::Structured { records, messages }) => {
                match (records, messages.is_empty()) {
                    (Some(rows), true) => Self::PerRowErrors(rows.clone()),
                    (Some(rows), false) => Self::Combined {
                        rows: rows.clone(),
                        messages: messages.clone(),
                    },
                    (None, false) => Self::GlobalMessages(messages.clone()),
                    (None, true) => Self::Unvalidated,
                }
            }
        }
    }

    /// Reconcile every data row of `rows`, indexed from zero.
    pub fn apply_all(&self, rows: &mut [Row]) {
        for (index, row) in rows.iter_mut().enumerate() {
            reconcile_row(row, index, self);
        }
    }
}

/// Apply `validation` to the data row at zero-based `index`.
pub fn reconcile_row(row: &mut Row, index: usize, validation: &SheetValidation) {
    match validation {
        SheetValidation::Unvalidated => return,
        SheetValidation::Clean => mark_clean(row),
        SheetValidation::PerRowErrors(rows) => apply_row_errors(row, rows.get(index)),
        SheetValidation::GlobalMessages(messages) => {
            mark_clean(row);
            flag_duplicate(row, index, messages);
        }
        SheetValidation::Combined { rows, messages } => {
            apply_row_errors(row, rows.get(index));
            flag_duplicate(row, index, messages);
        }
    }
    tracing::debug!(index, status = ?row.status, "reconciled row");
}

fn mark_clean(row: &mut Row) {
    row.clear_errors();
    row.status = if row.has_required_fields() {
        RowStatus::Complete
    } else {
        RowStatus::Number
    };
}

/// Rows the structured list does not reach keep their markers.
fn apply_row_errors(row: &mut Row, errors: Option<&RowErrors>) {
    let Some(errors) = errors else {
        return;
    };
    for column in ScheduleCColumn::validated() {
        let flagged = column
            .error_key()
            .is_some_and(|key| errors.contains_key(key));
        row[column].error = flagged;
    }
    if errors.is_empty() {
        row[ScheduleCColumn::RowNumber].error = false;
        row.status = RowStatus::Complete;
    } else {
        row.status = RowStatus::Error;
    }
}

fn flag_duplicate(row: &mut Row, index: usize, messages: &[String]) {
    if messages.iter().any(|message| duplicate_row_index(message) == Some(index)) {
        row[ScheduleCColumn::RowNumber].error = true;
        row.status = RowStatus::Error;
    }
}

/// Data row index named by a duplicate-entry message.
pub fn duplicate_row_index(message: &str) -> Option<usize> {
    if !message.contains(DUPLICATE_ROW_MESSAGE) {
        return None;
    }
    message.replace(DUPLICATE_ROW_MESSAGE, "").trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn complete_row() -> Row {
        let mut row = Row::blank(1, false);
        row.set_value(ScheduleCColumn::FuelType, "Propane");
        row.set_value(ScheduleCColumn::FuelClass, "Gasoline");
        row.set_value(ScheduleCColumn::Quantity, "100");
        row.set_value(ScheduleCColumn::ExpectedUse, "Heating Oil");
        row
    }

    fn errors(keys: &[&str]) -> RowErrors {
        keys.iter().map(|k| (*k, json!(["invalid"]))).collect()
    }

    #[test]
    fn from_props_precedence() {
        let structured = ValidationMessages::schedule_c(ScheduleValidationMessages::Structured {
            records: Some(vec![errors(&["quantity"])]),
            messages: Vec::new(),
        });
        assert_eq!(
            SheetValidation::from_props(true, Some(&structured)),
            SheetValidation::Clean
        );
        assert_eq!(SheetValidation::from_props(false, None), SheetValidation::Unvalidated);
        assert_eq!(
            SheetValidation::from_props(false, Some(&ValidationMessages::default())),
            SheetValidation::Clean
        );
        assert!(matches!(
            SheetValidation::from_props(false, Some(&structured)),
            SheetValidation::PerRowErrors(rows) if rows.len() == 1
        ));
    }

    #[test]
    fn payload_shapes_deserialize() {
        let flat: ValidationMessages =
            serde_json::from_value(json!({ "scheduleC": ["Duplicate entry in row 3"] })).unwrap();
        assert_eq!(
            SheetValidation::from_props(false, Some(&flat)),
            SheetValidation::GlobalMessages(vec!["Duplicate entry in row 3".into()])
        );

        let combined: ValidationMessages = serde_json::from_value(json!({
            "scheduleC": { "records": [{}, { "fuelType": ["required"] }], "messages": ["Duplicate entry in row 0"] },
            "scheduleB": ["unrelated"],
        }))
        .unwrap();
        assert!(combined.other.contains_key("scheduleB"));
        assert!(matches!(
            SheetValidation::from_props(false, Some(&combined)),
            SheetValidation::Combined { rows, messages } if rows.len() == 2 && messages.len() == 1
        ));
    }

    #[test]
    fn clean_sets_check_only_when_complete() {
        let mut row = complete_row();
        row[ScheduleCColumn::Quantity].error = true;
        reconcile_row(&mut row, 0, &SheetValidation::Clean);
        assert!(!row.has_errors());
        assert_eq!(row.status, RowStatus::Complete);

        let mut partial = Row::blank(2, false);
        reconcile_row(&mut partial, 1, &SheetValidation::Clean);
        assert_eq!(partial.status, RowStatus::Number);
    }

    #[test]
    fn per_row_errors_flag_listed_columns_only() {
        let mut row = complete_row();
        row[ScheduleCColumn::FuelType].error = true;
        let validation = SheetValidation::PerRowErrors(vec![
            RowErrors::default(),
            RowErrors::default(),
            errors(&["expectedUse"]),
        ]);
        reconcile_row(&mut row, 2, &validation);
        assert!(row[ScheduleCColumn::ExpectedUse].error);
        assert!(!row[ScheduleCColumn::FuelType].error);
        assert_eq!(row.status, RowStatus::Error);
    }

    #[test]
    fn rationale_key_flags_expected_use_other() {
        let mut row = complete_row();
        reconcile_row(&mut row, 0, &SheetValidation::PerRowErrors(vec![errors(&["rationale"])]));
        assert!(row[ScheduleCColumn::ExpectedUseOther].error);
    }

    #[test]
    fn unrecognised_key_sets_status_but_no_cell() {
        let mut row = complete_row();
        reconcile_row(&mut row, 0, &SheetValidation::PerRowErrors(vec![errors(&["units"])]));
        assert_eq!(row.status, RowStatus::Error);
        assert!(!row.has_errors());
    }

    #[test]
    fn empty_row_entry_is_complete() {
        let mut row = Row::blank(1, false);
        reconcile_row(&mut row, 0, &SheetValidation::PerRowErrors(vec![RowErrors::default()]));
        assert_eq!(row.status, RowStatus::Complete);
    }

    #[test]
    fn rows_beyond_structured_list_keep_markers() {
        let mut row = Row::blank(4, false);
        row[ScheduleCColumn::FuelType].error = true;
        row.status = RowStatus::Error;
        reconcile_row(&mut row, 3, &SheetValidation::PerRowErrors(vec![RowErrors::default()]));
        assert!(row[ScheduleCColumn::FuelType].error);
        assert_eq!(row.status, RowStatus::Error);
    }

    #[test]
    fn combined_still_flags_duplicates_beyond_list() {
        let validation = SheetValidation::Combined {
            rows: vec![RowErrors::default()],
            messages: vec!["Duplicate entry in row 2".into()],
        };
        let mut row = complete_row();
        reconcile_row(&mut row, 2, &validation);
        assert!(row[ScheduleCColumn::RowNumber].error);
        assert_eq!(row.status, RowStatus::Error);
    }

    #[test]
    fn row_errors_keep_an_earlier_duplicate_flag() {
        let mut row = complete_row();
        row[ScheduleCColumn::RowNumber].error = true;
        reconcile_row(&mut row, 0, &SheetValidation::PerRowErrors(vec![errors(&["quantity"])]));
        assert!(row[ScheduleCColumn::RowNumber].error);
        assert!(row[ScheduleCColumn::Quantity].error);

        reconcile_row(&mut row, 0, &SheetValidation::PerRowErrors(vec![RowErrors::default()]));
        assert!(!row.has_errors());
        assert_eq!(row.status, RowStatus::Complete);
    }

    #[test]
    fn empty_structured_payload_leaves_rows_alone() {
        let messages: ValidationMessages =
            serde_json::from_value(json!({ "scheduleC": {} })).unwrap();
        assert_eq!(
            SheetValidation::from_props(false, Some(&messages)),
            SheetValidation::Unvalidated
        );
    }

    #[test]
    fn duplicate_message_flags_matching_index() {
        let validation = SheetValidation::GlobalMessages(vec!["Duplicate entry in row 3".into()]);
        let mut hit = complete_row();
        let mut miss = complete_row();
        reconcile_row(&mut hit, 3, &validation);
        reconcile_row(&mut miss, 2, &validation);
        assert!(hit[ScheduleCColumn::RowNumber].error);
        assert_eq!(hit.status, RowStatus::Error);
        assert!(!miss.has_errors());
        assert_eq!(miss.status, RowStatus::Complete);
    }

    #[test]
    fn combined_layers_duplicates_over_row_errors() {
        let validation = SheetValidation::Combined {
            rows: vec![errors(&["quantity"])],
            messages: vec!["Duplicate entry in row 0".into()],
        };
        let mut row = complete_row();
        reconcile_row(&mut row, 0, &validation);
        assert!(row[ScheduleCColumn::Quantity].error);
        assert!(row[ScheduleCColumn::RowNumber].error);
        assert_eq!(row.status, RowStatus::Error);
    }

    #[test]
    fn unvalidated_leaves_row_alone() {
        let mut row = complete_row();
        row[ScheduleCColumn::Quantity].error = true;
        reconcile_row(&mut row, 0, &SheetValidation::Unvalidated);
        assert!(row[ScheduleCColumn::Quantity].error);
        assert_eq!(row.status, RowStatus::Number);
    }

    #[test]
    fn duplicate_row_index_parsing() {
        assert_eq!(duplicate_row_index("Duplicate entry in row 3"), Some(3));
        assert_eq!(duplicate_row_index("Duplicate entry in row  12 "), Some(12));
        assert_eq!(duplicate_row_index("Quantity must be positive"), None);
        assert_eq!(duplicate_row_index("Duplicate entry in row x"), None);
    }
}
