//! # Validate Subcommand
//!
//! Replays a server validation pass: mounts the fixture's section, applies
//! its edits, then pushes the fixture's `valid` / `validationMessages`
//! through a prop change and reports which rows came back flagged.
//!
//! Exits with code 1 when any row carries an error.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use tfrs_schedules::{RenderedSheet, RowStatus, ScheduleCColumn};

use crate::fixture::{Fixture, Session};
use crate::render::{table, OutputFormat};

/// Arguments for `tfrs validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Fixture file (YAML, or JSON when it ends in `.json`).
    pub fixture: PathBuf,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

/// A row that carries at least one error flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlaggedRow {
    /// Display row number.
    pub number: u64,
    /// Flagged columns. `row_number` marks a duplicate.
    pub columns: Vec<ScheduleCColumn>,
}

/// Execute `tfrs validate`.
pub fn run_validate(args: &ValidateArgs, catalog: Option<&Path>) -> Result<u8> {
    let fixture = Fixture::load_with_catalog(&args.fixture, catalog)?;
    let sheet = replay_validation(&fixture);
    let flagged = flagged_rows(&sheet);
    tracing::info!(
        fixture = %args.fixture.display(),
        flagged = flagged.len(),
        "replayed schedule C validation"
    );

    match args.format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&flagged).context("serializing flagged rows")?
        ),
        OutputFormat::Table => {
            print!("{}", table(&sheet));
            println!();
            if flagged.is_empty() {
                println!("no rows flagged");
            }
            for row in &flagged {
                let columns: Vec<String> = row.columns.iter().map(ToString::to_string).collect();
                println!("row {}: {}", row.number, columns.join(", "));
            }
        }
    }

    Ok(u8::from(!flagged.is_empty()))
}

/// Mount, edit, then sync the validation result into the sheet.
pub fn replay_validation(fixture: &Fixture) -> RenderedSheet {
    let mut session = Session::mount(fixture);
    if !fixture.edits.is_empty() {
        session.edit(&fixture.edits);
    }
    session
        .section
        .receive_props(fixture.validated_props(), &session.store);
    session.section.render()
}

pub fn flagged_rows(sheet: &RenderedSheet) -> Vec<FlaggedRow> {
    sheet
        .rows
        .iter()
        .filter_map(|row| {
            let columns: Vec<ScheduleCColumn> = row
                .cells
                .iter()
                .filter(|cell| cell.error)
                .map(|cell| cell.column)
                .collect();
            (row.status == RowStatus::Error || !columns.is_empty()).then(|| FlaggedRow {
                number: row.number,
                columns,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "
catalog:
  approvedFuels:
    - { id: 1, name: Propane, effectiveDate: 2017-01-01,
        fuelClasses: [{ id: 2, fuelClass: Gasoline }], unitOfMeasure: { name: L } }
  expectedUses:
    - { id: 1, description: Heating Oil }
props:
  complianceReport:
    scheduleC:
      records:
        - { fuelType: Propane, fuelClass: Gasoline, quantity: '100', expectedUse: Heating Oil }
        - { fuelType: Propane, fuelClass: Gasoline, quantity: '', expectedUse: Heating Oil }
";

    fn with_messages(messages: &str) -> Fixture {
        Fixture::parse(&format!("{BASE}{messages}"), false).unwrap()
    }

    #[test]
    fn structured_errors_flag_columns() {
        let fixture = with_messages(
            "validationMessages:\n  scheduleC:\n    records:\n      - {}\n      - { quantity: ['required'] }\n",
        );
        let flagged = flagged_rows(&replay_validation(&fixture));
        assert_eq!(
            flagged,
            vec![FlaggedRow {
                number: 2,
                columns: vec![ScheduleCColumn::Quantity],
            }]
        );
    }

    #[test]
    fn duplicate_message_flags_row_number() {
        let fixture = with_messages("validationMessages:\n  scheduleC: ['Duplicate entry in row 0']\n");
        let flagged = flagged_rows(&replay_validation(&fixture));
        assert_eq!(flagged.len(), 1);
        assert_eq!(flagged[0].number, 1);
        assert_eq!(flagged[0].columns, vec![ScheduleCColumn::RowNumber]);
    }

    #[test]
    fn valid_result_clears_flags() {
        let fixture = with_messages("valid: true\n");
        let sheet = replay_validation(&fixture);
        assert!(flagged_rows(&sheet).is_empty());
        assert_eq!(sheet.rows[0].status, RowStatus::Complete);
    }
}
