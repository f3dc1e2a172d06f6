//! # Render Subcommand
//!
//! Mounts a section from a fixture and prints the sheet.
//!
//! ```bash
//! tfrs render fixtures/schedule-c.yaml
//! tfrs render fixtures/schedule-c.yaml --format json
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use tfrs_schedules::{RenderedSheet, RowStatus, ScheduleCColumn};

use crate::fixture::{Fixture, Session};

/// How sheets are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned text table. Flagged cells end in `*`.
    #[default]
    Table,
    /// The rendered sheet as JSON.
    Json,
}

/// Arguments for `tfrs render`.
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Fixture file (YAML, or JSON when it ends in `.json`).
    pub fixture: PathBuf,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

/// Execute `tfrs render`.
pub fn run_render(args: &RenderArgs, catalog: Option<&Path>) -> Result<u8> {
    let fixture = Fixture::load_with_catalog(&args.fixture, catalog)?;
    let session = Session::mount(&fixture);
    tracing::info!(
        fixture = %args.fixture.display(),
        mounted = ?session.mounted,
        rows = session.section.grid().len(),
        "rendering schedule C"
    );
    println!("{}", format_sheet(&session.section.render(), args.format)?);
    Ok(0)
}

/// Print `sheet` in `format`.
pub fn format_sheet(sheet: &RenderedSheet, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(table(sheet)),
        OutputFormat::Json => serde_json::to_string_pretty(sheet).context("serializing sheet"),
    }
}

fn column_label(column: ScheduleCColumn) -> &'static str {
    match column {
        ScheduleCColumn::RowNumber => "#",
        ScheduleCColumn::FuelType => "Fuel Type",
        ScheduleCColumn::FuelClass => "Fuel Class",
        ScheduleCColumn::Quantity => "Quantity",
        ScheduleCColumn::Units => "Units",
        ScheduleCColumn::ExpectedUse => "Expected Use",
        ScheduleCColumn::ExpectedUseOther => "Rationale",
    }
}

fn status_marker(status: RowStatus) -> &'static str {
    match status {
        RowStatus::Number => "",
        RowStatus::Complete => " ok",
        RowStatus::Error => " !",
    }
}

/// Render the sheet as an aligned text table: title, header, rows, totals.
pub fn table(sheet: &RenderedSheet) -> String {
    let header: Vec<String> = ScheduleCColumn::ALL
        .iter()
        .map(|col| column_label(*col).to_string())
        .collect();

    let body: Vec<Vec<String>> = sheet
        .rows
        .iter()
        .map(|row| {
            row.cells
                .iter()
                .map(|cell| {
                    let mut text = match cell.column {
                        ScheduleCColumn::RowNumber => {
                            format!("{}{}", row.number, status_marker(row.status))
                        }
                        _ => cell.display.clone(),
                    };
                    if cell.error {
                        text.push('*');
                    }
                    text
                })
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for line in &body {
        for (width, text) in widths.iter_mut().zip(line) {
            *width = (*width).max(text.chars().count());
        }
    }

    let mut out = String::new();
    out.push_str(sheet.title);
    if sheet.read_only {
        out.push_str(" (read-only)");
    }
    out.push('\n');
    for line in std::iter::once(&header).chain(&body) {
        let padded: Vec<String> = line
            .iter()
            .zip(&widths)
            .map(|(text, width)| format!("{text:<width$}"))
            .collect();
        out.push_str(padded.join(" | ").trim_end());
        out.push('\n');
    }
    out.push_str(&format!(
        "totals: diesel class {}, gasoline class {}\n",
        sheet.totals.diesel, sheet.totals.gasoline
    ));
    out
}
