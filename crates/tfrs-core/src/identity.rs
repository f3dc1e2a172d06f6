//! # Domain Identity Newtypes
//!
//! Newtype wrappers for the integer identifiers the reporting backend
//! assigns. These prevent accidental identifier confusion: you cannot pass
//! a `FuelClassId` where a `FuelTypeId` is expected.

use serde::{Deserialize, Serialize};

/// Identifier of an approved fuel type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FuelTypeId(pub u64);

/// Identifier of a fuel class (diesel class, gasoline class, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FuelClassId(pub u64);

/// Identifier of an expected-use description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpectedUseId(pub u64);

/// Identifier of a compliance report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComplianceReportId(pub u64);

impl std::fmt::Display for FuelTypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "fuel-type:{}", self.0)
    }
}

impl std::fmt::Display for FuelClassId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "fuel-class:{}", self.0)
    }
}

impl std::fmt::Display for ExpectedUseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "expected-use:{}", self.0)
    }
}

impl std::fmt::Display for ComplianceReportId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "compliance-report:{}", self.0)
    }
}
