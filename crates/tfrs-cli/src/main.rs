//! # tfrs CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tfrs_cli::edit::{run_edit, EditArgs};
use tfrs_cli::render::{run_render, RenderArgs};
use tfrs_cli::validate::{run_validate, ValidateArgs};

/// Schedule C (fuels used for other purposes) toolchain.
///
/// Mounts a Schedule C section from a fixture file, applies cell edits and
/// validation results to it, and prints the sheet and draft records.
#[derive(Parser, Debug)]
#[command(name = "tfrs", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Reference catalog replacing the fixture's `catalog` section.
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Mount a section from a fixture and print the sheet.
    Render(RenderArgs),

    /// Apply cell edits and print the outcome and draft records.
    Edit(EditArgs),

    /// Replay a validation result and list flagged rows.
    Validate(ValidateArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    // stdout carries the sheet; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let catalog = cli.catalog.as_deref();
    let result = match &cli.command {
        Commands::Render(args) => run_render(args, catalog),
        Commands::Edit(args) => run_edit(args, catalog),
        Commands::Validate(args) => run_validate(args, catalog),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tfrs_cli::OutputFormat;

    #[test]
    fn cli_parse_render_defaults_to_table() {
        let cli = Cli::try_parse_from(["tfrs", "render", "report.yaml"]).unwrap();
        match cli.command {
            Commands::Render(args) => {
                assert_eq!(args.fixture, PathBuf::from("report.yaml"));
                assert_eq!(args.format, OutputFormat::Table);
            }
            other => panic!("expected render, got {other:?}"),
        }
        assert_eq!(cli.verbose, 0);
        assert!(cli.catalog.is_none());
    }

    #[test]
    fn cli_parse_edit_with_sets() {
        let cli = Cli::try_parse_from([
            "tfrs",
            "edit",
            "report.yaml",
            "--set",
            "2:fuel_type=Propane",
            "--set",
            "2:quantity=1,500",
            "--format",
            "json",
        ])
        .unwrap();
        match cli.command {
            Commands::Edit(args) => {
                assert_eq!(args.set.len(), 2);
                assert_eq!(args.set[1].value, "1,500");
                assert_eq!(args.format, OutputFormat::Json);
            }
            other => panic!("expected edit, got {other:?}"),
        }
    }

    #[test]
    fn cli_parse_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["tfrs", "validate", "report.yaml", "-vv", "--catalog", "ref.json"])
                .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.catalog, Some(PathBuf::from("ref.json")));
    }

    #[test]
    fn cli_rejects_malformed_set() {
        assert!(Cli::try_parse_from(["tfrs", "edit", "report.yaml", "--set", "fuel_type"]).is_err());
    }
}
