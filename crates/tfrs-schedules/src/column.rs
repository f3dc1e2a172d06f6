//! # Schedule C Columns
//!
//! The seven columns of a Schedule C row, as a closed enum. Rows are indexed
//! by [`ScheduleCColumn`], never by bare integers; the physical position is
//! available through [`ScheduleCColumn::index`] for hosts that address cells
//! by coordinate.
//!
//! Each column has a [`ColumnKind`] that decides how it is edited and how
//! it renders:
//!
//! | Column | Kind | Error key |
//! |--------|------|-----------|
//! | RowNumber | display-only | — |
//! | FuelType | single-select (approved fuels) | `fuelType` |
//! | FuelClass | single-select (fuel's classes) | `fuelClass` |
//! | Quantity | numeric | `quantity` |
//! | Units | display-only | — |
//! | ExpectedUse | single-select (expected uses) | `expectedUse` |
//! | ExpectedUseOther | free text | `rationale` |

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Where a single-select column draws its options from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionSource {
    /// Approved fuels effective for the report's compliance period.
    FuelTypes,
    /// Fuel classes allowed for the row's selected fuel type.
    FuelClasses,
    /// Expected-use descriptions.
    ExpectedUses,
}

/// How a column is edited and rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ColumnKind {
    /// Derived by the engine; never edited directly.
    DisplayOnly,
    /// Constrained picker; typed values are resolved against the source.
    SingleSelect { source: OptionSource },
    /// Free numeric entry, displayed with thousands separators.
    Numeric { max_length: usize },
    /// Free text, stored verbatim.
    FreeText,
}

impl ColumnKind {
    /// Whether users may edit cells of this kind at all.
    pub fn is_editable(&self) -> bool {
        !matches!(self, Self::DisplayOnly)
    }
}

/// Maximum characters accepted by the quantity editor.
pub const QUANTITY_MAX_LENGTH: usize = 12;

/// A Schedule C column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleCColumn {
    RowNumber,
    FuelType,
    FuelClass,
    Quantity,
    Units,
    ExpectedUse,
    ExpectedUseOther,
}

/// Number of columns in a Schedule C row.
pub const COLUMN_COUNT: usize = 7;

impl ScheduleCColumn {
    /// All columns in physical order.
    pub const ALL: [ScheduleCColumn; COLUMN_COUNT] = [
        Self::RowNumber,
        Self::FuelType,
        Self::FuelClass,
        Self::Quantity,
        Self::Units,
        Self::ExpectedUse,
        Self::ExpectedUseOther,
    ];

    /// Physical position of the column in a grid row.
    pub fn index(self) -> usize {
        match self {
            Self::RowNumber => 0,
            Self::FuelType => 1,
            Self::FuelClass => 2,
            Self::Quantity => 3,
            Self::Units => 4,
            Self::ExpectedUse => 5,
            Self::ExpectedUseOther => 6,
        }
    }

    /// Column at a physical position.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// The snake_case identifier, matching serde.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RowNumber => "row_number",
            Self::FuelType => "fuel_type",
            Self::FuelClass => "fuel_class",
            Self::Quantity => "quantity",
            Self::Units => "units",
            Self::ExpectedUse => "expected_use",
            Self::ExpectedUseOther => "expected_use_other",
        }
    }

    pub fn kind(self) -> ColumnKind {
        match self {
            Self::RowNumber | Self::Units => ColumnKind::DisplayOnly,
            Self::FuelType => ColumnKind::SingleSelect {
                source: OptionSource::FuelTypes,
            },
            Self::FuelClass => ColumnKind::SingleSelect {
                source: OptionSource::FuelClasses,
            },
            Self::ExpectedUse => ColumnKind::SingleSelect {
                source: OptionSource::ExpectedUses,
            },
            Self::Quantity => ColumnKind::Numeric {
                max_length: QUANTITY_MAX_LENGTH,
            },
            Self::ExpectedUseOther => ColumnKind::FreeText,
        }
    }

    /// Key the server-side validation uses for errors on this column.
    pub fn error_key(self) -> Option<&'static str> {
        match self {
            Self::FuelType => Some("fuelType"),
            Self::FuelClass => Some("fuelClass"),
            Self::Quantity => Some("quantity"),
            Self::ExpectedUse => Some("expectedUse"),
            Self::ExpectedUseOther => Some("rationale"),
            Self::RowNumber | Self::Units => None,
        }
    }

    /// Column a validation error key refers to.
    pub fn from_error_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|col| col.error_key() == Some(key))
    }

    /// Columns that can carry a server-side validation error.
    pub fn validated() -> impl Iterator<Item = ScheduleCColumn> {
        Self::ALL.into_iter().filter(|col| col.error_key().is_some())
    }

    /// Style classes the cell carries before any error flag is added.
    pub fn base_class(self) -> &'static str {
        match self {
            Self::RowNumber => "row-number",
            Self::FuelType | Self::FuelClass | Self::ExpectedUse => "text dropdown-indicator",
            Self::Quantity => "number",
            Self::ExpectedUseOther => "text",
            Self::Units => "",
        }
    }
}

impl std::fmt::Display for ScheduleCColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing a column reference.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown Schedule C column {0:?}")]
pub struct UnknownColumn(pub String);

impl FromStr for ScheduleCColumn {
    type Err = UnknownColumn;

    /// Accepts the snake_case name, the validation error key, or the
    /// physical index.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(index) = s.parse::<usize>() {
            return Self::from_index(index).ok_or_else(|| UnknownColumn(s.to_string()));
        }
        Self::ALL
            .into_iter()
            .find(|col| col.as_str() == s)
            .or_else(|| Self::from_error_key(s))
            .ok_or_else(|| UnknownColumn(s.to_string()))
    }
}
