//! # Schedule C Section
//!
//! [`ScheduleCSection`] is what a host page embeds: the grid plus the props
//! the page hands down. The host owns the draft store and the expected-use
//! loader; the section reaches them through [`ScheduleStateStore`] and
//! [`ExpectedUsesLoader`] and never holds on to either.
//!
//! ## Lifecycle
//!
//! 1. [`ScheduleCSection::mount`] requests the expected uses, then either
//!    keeps the existing draft, adds five blank rows, or seeds the store
//!    from the persisted report. In every case it finishes with the same
//!    upstream sync a later prop change would run, so the grid reflects the
//!    chosen source straight away.
//! 2. [`ScheduleCSection::receive_props`] runs whenever the host's props
//!    change (new draft records, a validation round-trip, a snapshot).
//! 3. [`ScheduleCSection::handle_cells_changed`] applies a batch of edits
//!    and publishes the projected records to the store.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tfrs_core::{CompliancePeriod, ExpectedUse, ExpectedUses, ReferenceData};

use crate::column::ScheduleCColumn;
use crate::grid::Grid;
use crate::options::{options_for, EditContext, SelectOption};
use crate::record::{project_records, ComplianceReport, ScheduleCRecord, ScheduleState, Snapshot};
use crate::render::{render_sheet, RenderedSheet};
use crate::rules::{apply_change, CellChange};
use crate::sync::{sync_records, sync_snapshot};
use crate::validation::{SheetValidation, ValidationMessages};

/// Blank rows added when a report has no Schedule C yet.
pub const INITIAL_BLANK_ROWS: usize = 5;

// ─── Collaborators ──────────────────────────────────────────────────

/// The host's draft store.
pub trait ScheduleStateStore {
    fn schedule_state(&self) -> &ScheduleState;
    fn update_schedule_state(&mut self, state: ScheduleState);
}

/// The host's expected-use lookup.
pub trait ExpectedUsesLoader {
    /// Start (or restart) loading the lookup.
    fn load_expected_uses(&mut self);
    fn expected_uses(&self) -> &ExpectedUses;
}

/// A store that keeps the latest draft in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryScheduleStore {
    state: ScheduleState,
    updates: usize,
}

impl InMemoryScheduleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: ScheduleState) -> Self {
        Self { state, updates: 0 }
    }

    /// How many times the draft has been replaced.
    pub fn updates(&self) -> usize {
        self.updates
    }
}

impl ScheduleStateStore for InMemoryScheduleStore {
    fn schedule_state(&self) -> &ScheduleState {
        &self.state
    }

    fn update_schedule_state(&mut self, state: ScheduleState) {
        self.state = state;
        self.updates += 1;
    }
}

/// A loader backed by a fixed list. Nothing is offered until
/// [`ExpectedUsesLoader::load_expected_uses`] has run.
#[derive(Debug, Clone, Default)]
pub struct StaticExpectedUses {
    items: Vec<ExpectedUse>,
    current: ExpectedUses,
}

impl StaticExpectedUses {
    pub fn new(items: Vec<ExpectedUse>) -> Self {
        Self {
            items,
            current: ExpectedUses::default(),
        }
    }
}

impl ExpectedUsesLoader for StaticExpectedUses {
    fn load_expected_uses(&mut self) {
        self.current = ExpectedUses::loaded(self.items.clone());
    }

    fn expected_uses(&self) -> &ExpectedUses {
        &self.current
    }
}

// ─── Props ──────────────────────────────────────────────────────────

/// Everything the host page passes down.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionProps {
    #[serde(default)]
    pub compliance_report: ComplianceReport,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<Snapshot>,
    /// The server accepted the schedule as submitted.
    #[serde(default)]
    pub valid: bool,
    /// A validation round-trip is in flight.
    #[serde(default)]
    pub validating: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_messages: Option<ValidationMessages>,
    /// Overrides the report's own compliance period.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<CompliancePeriod>,
}

impl SectionProps {
    /// The period fuel types are filtered by.
    pub fn period(&self) -> Option<&CompliancePeriod> {
        self.period
            .as_ref()
            .or(self.compliance_report.compliance_period.as_ref())
    }

    /// Validation to reconcile against, or `None` while one is in flight.
    pub fn sheet_validation(&self) -> Option<SheetValidation> {
        (!self.validating)
            .then(|| SheetValidation::from_props(self.valid, self.validation_messages.as_ref()))
    }
}

// ─── Outcomes ───────────────────────────────────────────────────────

/// Which branch [`ScheduleCSection::mount`] took.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MountKind {
    /// A draft or a read-only snapshot was already available.
    Existing,
    /// The report has no Schedule C; blank rows were added.
    BlankRows,
    /// The store was seeded from the persisted report.
    InitialState,
}

/// An edit that was not applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedEdit {
    pub row: usize,
    pub column: ScheduleCColumn,
    pub reason: String,
}

/// Result of one edit batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditOutcome {
    pub applied: usize,
    pub skipped: Vec<SkippedEdit>,
    /// Records published to the store after the batch.
    pub records: Vec<ScheduleCRecord>,
}

// ─── Section ────────────────────────────────────────────────────────

/// One mounted Schedule C grid plus its props.
#[derive(Debug, Clone)]
pub struct ScheduleCSection {
    grid: Grid,
    props: SectionProps,
    reference: Arc<ReferenceData>,
}

impl ScheduleCSection {
    /// An unmounted section: header rows only.
    pub fn new(reference: Arc<ReferenceData>, props: SectionProps) -> Self {
        Self {
            grid: Grid::new(),
            props,
            reference,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn props(&self) -> &SectionProps {
        &self.props
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    pub fn mount(
        &mut self,
        store: &mut dyn ScheduleStateStore,
        loader: &mut dyn ExpectedUsesLoader,
    ) -> MountKind {
        loader.load_expected_uses();

        let kind = if store.schedule_state().schedule_c.is_some()
            || (self.props.snapshot.is_some() && self.props.read_only)
        {
            MountKind::Existing
        } else if self.props.compliance_report.schedule_c.is_none() {
            self.add_rows(INITIAL_BLANK_ROWS);
            MountKind::BlankRows
        } else {
            self.load_initial_state(store);
            MountKind::InitialState
        };

        let props = self.props.clone();
        self.sync_from(&props, store);
        tracing::info!(
            report = ?self.props.compliance_report.id,
            ?kind,
            rows = self.grid.len(),
            "mounted schedule C section"
        );
        kind
    }

    /// Restart row numbering and seed the store with a copy of the
    /// persisted records.
    pub fn load_initial_state(&mut self, store: &mut dyn ScheduleStateStore) {
        self.grid.reset_sequence();
        let records = self
            .props
            .compliance_report
            .schedule_c
            .as_ref()
            .map(|source| source.records.clone())
            .unwrap_or_default();
        store.update_schedule_state(ScheduleState::with_records(records));
    }

    /// Sync the grid from `next` and adopt it as the current props.
    pub fn receive_props(&mut self, next: SectionProps, store: &dyn ScheduleStateStore) {
        self.sync_from(&next, store);
        if next.read_only != self.props.read_only {
            self.grid.set_read_only(next.read_only);
        }
        self.props = next;
    }

    fn sync_from(&mut self, next: &SectionProps, store: &dyn ScheduleStateStore) {
        if self.props.read_only {
            if let Some(snapshot) = &next.snapshot {
                let source = snapshot
                    .schedule_c
                    .as_ref()
                    .or(next.compliance_report.schedule_c.as_ref());
                if let Some(source) = source {
                    sync_snapshot(&mut self.grid, &source.records);
                }
                return;
            }
        }

        let records = store
            .schedule_state()
            .records()
            .or_else(|| {
                next.compliance_report
                    .schedule_c
                    .as_ref()
                    .map(|source| source.records.as_slice())
            });
        let Some(records) = records else {
            return;
        };
        let validation = next.sheet_validation();
        sync_records(
            &mut self.grid,
            records,
            &self.reference,
            next.read_only,
            validation.as_ref(),
        );
    }

    /// Apply a batch of edits, then project and publish the records.
    pub fn handle_cells_changed(
        &mut self,
        changes: &[CellChange],
        store: &mut dyn ScheduleStateStore,
        expected_uses: &ExpectedUses,
    ) -> EditOutcome {
        let ctx = EditContext {
            reference: &self.reference,
            expected_uses,
            period: self.props.period(),
            read_only: self.props.read_only,
        };

        let mut outcome = EditOutcome::default();
        for change in changes {
            match apply_change(&mut self.grid, change, &ctx) {
                Ok(()) => outcome.applied += 1,
                Err(err) => {
                    tracing::warn!(row = change.row, column = %change.col, error = %err, "skipped cell edit");
                    outcome.skipped.push(SkippedEdit {
                        row: change.row,
                        column: change.col,
                        reason: err.to_string(),
                    });
                }
            }
        }

        outcome.records = project_records(&self.grid);
        store.update_schedule_state(ScheduleState::with_records(outcome.records.clone()));
        outcome
    }

    /// Append blank rows, editable unless the section is read-only.
    pub fn add_rows(&mut self, count: usize) {
        self.grid.add_rows(count, self.props.read_only);
    }

    /// Whether the host should offer its "add row" control.
    pub fn add_row_enabled(&self) -> bool {
        !self.props.read_only
    }

    /// The records the grid currently projects to.
    pub fn records(&self) -> Vec<ScheduleCRecord> {
        project_records(&self.grid)
    }

    pub fn edit_context<'a>(&'a self, expected_uses: &'a ExpectedUses) -> EditContext<'a> {
        EditContext {
            reference: &self.reference,
            expected_uses,
            period: self.props.period(),
            read_only: self.props.read_only,
        }
    }

    /// Picker options for one cell, addressed by data index.
    pub fn options(
        &self,
        index: usize,
        column: ScheduleCColumn,
        expected_uses: &ExpectedUses,
    ) -> Vec<SelectOption> {
        self.grid
            .row(index)
            .map(|row| options_for(row, column, &self.edit_context(expected_uses)))
            .unwrap_or_default()
    }

    pub fn render(&self) -> RenderedSheet {
        render_sheet(&self.grid, self.props.read_only)
    }
}
