//! # Cells
//!
//! A [`Cell`] is owned by exactly one row. Its style is not a free-form
//! class string: the base classes follow from the column
//! ([`ScheduleCColumn::base_class`]) and the only mutable style state is the
//! error flag. The class string a browser grid expects is rebuilt at render
//! time by [`Cell::class_name`].

use serde::{Deserialize, Serialize};

use crate::column::ScheduleCColumn;

/// One editable (or display-only) cell of a data row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// Stored value. Empty means "no value".
    pub value: String,
    pub read_only: bool,
    /// Set by validation reconciliation.
    pub error: bool,
}

impl Cell {
    pub fn new(read_only: bool) -> Self {
        Self {
            value: String::new(),
            read_only,
            error: false,
        }
    }

    pub fn with_value(value: impl Into<String>, read_only: bool) -> Self {
        Self {
            value: value.into(),
            read_only,
            error: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Class string for a cell in `column`, e.g. `"number error"`.
    pub fn class_name(&self, column: ScheduleCColumn) -> String {
        let base = column.base_class();
        match (base.is_empty(), self.error) {
            (_, false) => base.to_string(),
            (true, true) => "error".to_string(),
            (false, true) => format!("{base} error"),
        }
    }
}

/// What the row-number cell shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowStatus {
    /// The row number itself; the row is incomplete or unvalidated.
    #[default]
    Number,
    /// Check mark: the row passed validation.
    Complete,
    /// Warning triangle: validation flagged the row.
    Error,
}

impl RowStatus {
    /// Icon name rendered in place of the row number, if any.
    pub fn icon(self) -> Option<&'static str> {
        match self {
            Self::Number => None,
            Self::Complete => Some("check"),
            Self::Error => Some("exclamation-triangle"),
        }
    }
}

/// A cell of one of the two fixed header rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderCell {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<&'static str>,
    pub class_name: &'static str,
    pub col_span: u8,
    pub row_span: u8,
}

impl HeaderCell {
    pub(crate) const fn new(label: Option<&'static str>, class_name: &'static str) -> Self {
        Self {
            label,
            class_name,
            col_span: 1,
            row_span: 1,
        }
    }

    pub(crate) const fn spanning(mut self, col_span: u8, row_span: u8) -> Self {
        self.col_span = col_span;
        self.row_span = row_span;
        self
    }
}
