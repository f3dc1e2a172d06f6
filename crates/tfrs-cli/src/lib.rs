//! # tfrs-cli — Schedule C from the Command Line
//!
//! Drives a Schedule C section from fixture files, without a report page
//! or an API server in the loop.
//!
//! ## Subcommands
//!
//! - `tfrs render` — mount a section and print the sheet.
//! - `tfrs edit` — apply cell edits and print the outcome and records.
//! - `tfrs validate` — replay a validation pass and list flagged rows.
//!
//! ```bash
//! tfrs render report.yaml --format json
//! tfrs edit report.yaml --set 2:fuel_type=Propane --set 2:quantity=1,500
//! tfrs --catalog reference.json validate report.yaml
//! ```

pub mod edit;
pub mod fixture;
pub mod render;
pub mod validate;

pub use fixture::{Fixture, Session};
pub use render::OutputFormat;
