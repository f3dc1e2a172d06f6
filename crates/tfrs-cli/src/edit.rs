//! # Edit Subcommand
//!
//! Mounts a section, applies the fixture's edits followed by any `--set`
//! edits as one batch, and prints the outcome.
//!
//! ```bash
//! tfrs edit fixture.yaml --set 2:fuel_type=Propane --set 2:quantity=1,500
//! ```
//!
//! Rows are grid rows: the first data row is row 2.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use tfrs_schedules::{CellChange, EditOutcome, RenderedSheet, ScheduleCColumn};

use crate::fixture::{Fixture, Session};
use crate::render::{table, OutputFormat};

/// Arguments for `tfrs edit`.
#[derive(Args, Debug)]
pub struct EditArgs {
    /// Fixture file (YAML, or JSON when it ends in `.json`).
    pub fixture: PathBuf,

    /// Extra edit applied after the fixture's edits. Repeatable.
    #[arg(long = "set", value_name = "ROW:COLUMN=VALUE", value_parser = parse_set)]
    pub set: Vec<CellChange>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

/// Parse `ROW:COLUMN=VALUE`. The value may be empty or contain `=`.
pub fn parse_set(s: &str) -> Result<CellChange, String> {
    let (target, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected ROW:COLUMN=VALUE, got {s:?}"))?;
    let (row, column) = target
        .split_once(':')
        .ok_or_else(|| format!("expected ROW:COLUMN before '=', got {target:?}"))?;
    let row = row
        .trim()
        .parse::<usize>()
        .map_err(|e| format!("invalid row {row:?}: {e}"))?;
    let column = column
        .parse::<ScheduleCColumn>()
        .map_err(|e| e.to_string())?;
    Ok(CellChange::new(row, column, value))
}

#[derive(Debug, Serialize)]
struct EditReport<'a> {
    outcome: &'a EditOutcome,
    sheet: &'a RenderedSheet,
}

/// Execute `tfrs edit`.
pub fn run_edit(args: &EditArgs, catalog: Option<&Path>) -> Result<u8> {
    let fixture = Fixture::load_with_catalog(&args.fixture, catalog)?;
    let (outcome, sheet) = apply_edits(&fixture, &args.set);
    tracing::info!(
        applied = outcome.applied,
        skipped = outcome.skipped.len(),
        records = outcome.records.len(),
        "applied schedule C edits"
    );
    println!("{}", format_outcome(&outcome, &sheet, args.format)?);
    Ok(0)
}

/// Mount `fixture` and apply its edits followed by `extra`.
pub fn apply_edits(fixture: &Fixture, extra: &[CellChange]) -> (EditOutcome, RenderedSheet) {
    let mut session = Session::mount(fixture);
    let changes: Vec<CellChange> = fixture.edits.iter().chain(extra).cloned().collect();
    let outcome = session.edit(&changes);
    (outcome, session.section.render())
}

pub fn format_outcome(
    outcome: &EditOutcome,
    sheet: &RenderedSheet,
    format: OutputFormat,
) -> Result<String> {
    if format == OutputFormat::Json {
        return serde_json::to_string_pretty(&EditReport { outcome, sheet })
            .context("serializing edit outcome");
    }

    let mut out = table(sheet);
    out.push_str(&format!(
        "\napplied {} edit(s), skipped {}\n",
        outcome.applied,
        outcome.skipped.len()
    ));
    for skipped in &outcome.skipped {
        out.push_str(&format!(
            "  skipped row {} {}: {}\n",
            skipped.row, skipped.column, skipped.reason
        ));
    }
    out.push_str("\nrecords:\n");
    out.push_str(&serde_json::to_string_pretty(&outcome.records).context("serializing records")?);
    Ok(out)
}
