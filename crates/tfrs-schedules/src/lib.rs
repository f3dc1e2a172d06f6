//! # tfrs-schedules — Schedule C Grid & Sync Engine
//!
//! Schedule C ("Fuels used for other purposes") is an editable spreadsheet
//! inside a compliance report. This crate owns the grid behind it and the
//! engine that keeps it consistent with three sources of truth:
//!
//! 1. upstream records pushed by the parent (persisted report, draft store,
//!    or a read-only snapshot),
//! 2. validation messages from the server-side validation pass,
//! 3. cell edits made by the user.
//!
//! ## Layout
//!
//! - `column.rs`: the seven named columns and their [`ColumnKind`].
//! - `cell.rs`, `row.rs`, `grid.rs`: the grid model. Rows are only ever
//!   appended; clearing a row zeroes its content. Row numbers come from an
//!   explicit [`RowSequence`]. Per-class quantity totals fill the summary
//!   slot under the rows.
//! - `options.rs`: picker options per cell.
//! - `rules.rs`: field derivation applied on edit (fuel type → class and
//!   units, quantity cleaning, expected use → rationale).
//! - `validation.rs`: [`SheetValidation`] and per-row reconciliation.
//! - `record.rs`: wire records and projection of the grid back into them.
//! - `sync.rs`: upstream records → grid.
//! - `section.rs`: [`ScheduleCSection`], the component a host page embeds.
//! - `render.rs`: a serializable view of the grid.
//!
//! ## Concurrency
//!
//! Everything here is synchronous with a single writer. Hosts that share a
//! section between threads wrap it in their own lock.

pub mod cell;
pub mod column;
pub mod grid;
pub mod options;
pub mod record;
pub mod render;
pub mod row;
pub mod rules;
pub mod section;
pub mod sync;
pub mod validation;

pub use cell::{Cell, HeaderCell, RowStatus};
pub use column::{ColumnKind, OptionSource, ScheduleCColumn, UnknownColumn};
pub use grid::{FuelClassTotals, Grid, HEADER_ROWS};
pub use options::{options_for, EditContext, SelectOption};
pub use record::{
    project_records, ComplianceReport, ScheduleCRecord, ScheduleCSource, ScheduleState, Snapshot,
};
pub use render::{
    render_sheet, RenderedCell, RenderedHeader, RenderedRow, RenderedSheet, RenderedTotals,
    SCHEDULE_C_TITLE,
};
pub use row::{Row, RowSequence};
pub use rules::{apply_change, CellChange, EditError};
pub use section::{
    EditOutcome, ExpectedUsesLoader, InMemoryScheduleStore, MountKind, ScheduleCSection,
    ScheduleStateStore, SectionProps, SkippedEdit, StaticExpectedUses, INITIAL_BLANK_ROWS,
};
pub use sync::{sync_records, sync_snapshot};
pub use validation::{
    duplicate_row_index, reconcile_row, RowErrors, ScheduleValidationMessages, SheetValidation,
    ValidationMessages, DUPLICATE_ROW_MESSAGE,
};
