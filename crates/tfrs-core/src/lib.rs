//! # tfrs-core — Foundational Types for TFRS Compliance Reporting
//!
//! Domain primitives shared by every other crate in the workspace. This
//! crate depends on nothing internal.
//!
//! ## Contents
//!
//! - **Identifiers** (`identity.rs`): newtypes for approved fuel, fuel class,
//!   expected use, and compliance report ids. No bare integers cross crate
//!   boundaries.
//!
//! - **Compliance periods** (`period.rs`): the reporting period a report
//!   belongs to, with the effective date used to filter approved fuels.
//!
//! - **Reference data** (`reference.rs`): approved fuels with their fuel
//!   classes and unit of measure, the expected-use lookup, and
//!   case-insensitive resolution against both.
//!
//! - **Quantities** (`quantity.rs`): cleaning typed quantities (thousands
//!   separators stripped, non-numeric input coerced to empty) and
//!   render-time formatting.
//!
//! ## Crate Policy
//!
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - Wire types serialize in camelCase to match the reporting API payloads.

pub mod error;
pub mod identity;
pub mod period;
pub mod quantity;
pub mod reference;

pub use error::TfrsError;
pub use identity::{ComplianceReportId, ExpectedUseId, FuelClassId, FuelTypeId};
pub use period::CompliancePeriod;
pub use quantity::{clean_quantity, format_quantity, normalize_quantity};
pub use reference::{
    matches_ignore_case, ApprovedFuel, ExpectedUse, ExpectedUses, FuelClass, ReferenceCatalog,
    ReferenceData, UnitOfMeasure, OTHER_EXPECTED_USE,
};
