//! # Reference Data
//!
//! Read-only lookup tables loaded once per session: the approved fuels
//! (each with its fuel classes and unit of measure) and the expected-use
//! descriptions a Schedule C quantity can be exempted under.
//!
//! ## Matching
//!
//! Typed values are resolved against the lookups by case-insensitive exact
//! match. Resolution returns the canonical spelling from the table, so a
//! user typing `"propane"` ends up with `"Propane"` in the cell. Anything
//! that does not match resolves to `None`; callers clear the cell.

use std::collections::HashSet;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::TfrsError;
use crate::identity::{ExpectedUseId, FuelClassId, FuelTypeId};
use crate::period::CompliancePeriod;

/// Expected-use description that unlocks the free-text rationale column.
pub const OTHER_EXPECTED_USE: &str = "Other";

/// Case-insensitive equality.
pub fn matches_ignore_case(a: &str, b: &str) -> bool {
    a == b || a.to_uppercase() == b.to_uppercase()
}

/// Unit a fuel quantity is reported in (e.g. `"L"`, `"kg"`, `"m³"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitOfMeasure {
    pub name: String,
}

impl UnitOfMeasure {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A fuel class an approved fuel may be reported under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelClass {
    pub id: FuelClassId,
    pub fuel_class: String,
}

/// An approved fuel type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovedFuel {
    pub id: FuelTypeId,
    pub name: String,
    /// The fuel cannot be reported in periods that start before this date.
    pub effective_date: NaiveDate,
    #[serde(default)]
    pub fuel_classes: Vec<FuelClass>,
    #[serde(default)]
    pub unit_of_measure: Option<UnitOfMeasure>,
}

impl ApprovedFuel {
    /// Name of the unit this fuel is reported in, if it has one.
    pub fn unit_name(&self) -> Option<&str> {
        self.unit_of_measure.as_ref().map(|u| u.name.as_str())
    }

    /// The fuel class to pre-select, when the fuel allows exactly one.
    pub fn sole_fuel_class(&self) -> Option<&FuelClass> {
        match self.fuel_classes.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    /// Resolve a typed fuel class against this fuel's allowed classes.
    pub fn find_fuel_class(&self, typed: &str) -> Option<&FuelClass> {
        self.fuel_classes
            .iter()
            .find(|fc| matches_ignore_case(&fc.fuel_class, typed))
    }
}

/// The approved-fuel lookup table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceData {
    #[serde(default)]
    pub approved_fuels: Vec<ApprovedFuel>,
}

impl ReferenceData {
    pub fn new(approved_fuels: Vec<ApprovedFuel>) -> Self {
        Self { approved_fuels }
    }

    pub fn approved_fuels(&self) -> &[ApprovedFuel] {
        &self.approved_fuels
    }

    /// Resolve a typed fuel name, ignoring case.
    pub fn find_fuel(&self, typed: &str) -> Option<&ApprovedFuel> {
        self.approved_fuels
            .iter()
            .find(|fuel| matches_ignore_case(&fuel.name, typed))
    }

    /// Look up a fuel by its exact stored name.
    ///
    /// Used when re-deriving units and fuel-class options from values that
    /// were already resolved and therefore carry the canonical spelling.
    pub fn fuel_named(&self, name: &str) -> Option<&ApprovedFuel> {
        self.approved_fuels.iter().find(|fuel| fuel.name == name)
    }

    /// Fuels selectable in `period`, in table order.
    pub fn fuels_for_period<'a>(
        &'a self,
        period: &'a CompliancePeriod,
    ) -> impl Iterator<Item = &'a ApprovedFuel> + 'a {
        self.approved_fuels.iter().filter(move |fuel| period.admits(fuel))
    }

    /// Reject tables that would make name resolution ambiguous.
    ///
    /// # Errors
    ///
    /// Returns [`TfrsError::ReferenceData`] if two fuels share a name
    /// (ignoring case), or if a fuel lists the same class twice.
    pub fn validate(&self) -> Result<(), TfrsError> {
        let mut names = HashSet::new();
        for fuel in &self.approved_fuels {
            if !names.insert(fuel.name.to_uppercase()) {
                return Err(TfrsError::ReferenceData(format!(
                    "duplicate approved fuel name {:?}",
                    fuel.name
                )));
            }
            let mut classes = HashSet::new();
            for fc in &fuel.fuel_classes {
                if !classes.insert(fc.fuel_class.to_uppercase()) {
                    return Err(TfrsError::ReferenceData(format!(
                        "fuel {:?} lists fuel class {:?} twice",
                        fuel.name, fc.fuel_class
                    )));
                }
            }
        }
        Ok(())
    }
}

/// One expected-use description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectedUse {
    pub id: ExpectedUseId,
    pub description: String,
}

/// The expected-use lookup as exposed by its loader.
///
/// While a fetch is in flight the lookup offers no options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpectedUses {
    #[serde(default)]
    pub is_fetching: bool,
    #[serde(default)]
    pub items: Vec<ExpectedUse>,
}

impl ExpectedUses {
    /// A lookup whose fetch has not completed yet.
    pub fn fetching() -> Self {
        Self {
            is_fetching: true,
            items: Vec::new(),
        }
    }

    /// A lookup holding `items`.
    pub fn loaded(items: Vec<ExpectedUse>) -> Self {
        Self {
            is_fetching: false,
            items,
        }
    }

    /// The descriptions a picker may offer right now.
    pub fn options(&self) -> &[ExpectedUse] {
        if self.is_fetching {
            &[]
        } else {
            &self.items
        }
    }

    /// Resolve a typed description, ignoring case.
    pub fn find(&self, typed: &str) -> Option<&ExpectedUse> {
        self.options()
            .iter()
            .find(|item| matches_ignore_case(&item.description, typed))
    }
}

/// Reference data and expected uses bundled in one document.
///
/// This is the on-disk format read by the API at startup and by CLI
/// fixtures: `{ "approvedFuels": [...], "expectedUses": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceCatalog {
    #[serde(flatten)]
    pub reference: ReferenceData,
    #[serde(default)]
    pub expected_uses: Vec<ExpectedUse>,
}

impl ReferenceCatalog {
    /// Parse a catalog from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, TfrsError> {
        let catalog: Self = serde_json::from_str(text)?;
        catalog.reference.validate()?;
        Ok(catalog)
    }

    /// Parse a catalog from YAML text.
    pub fn from_yaml_str(text: &str) -> Result<Self, TfrsError> {
        let catalog: Self = serde_yaml::from_str(text)?;
        catalog.reference.validate()?;
        Ok(catalog)
    }

    /// Load a catalog from disk. Files ending in `.json` are read as JSON,
    /// anything else as YAML.
    pub fn load(path: &Path) -> Result<Self, TfrsError> {
        let text = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let catalog = if is_json {
            Self::from_json_str(&text)?
        } else {
            Self::from_yaml_str(&text)?
        };
        tracing::debug!(
            path = %path.display(),
            fuels = catalog.reference.approved_fuels.len(),
            expected_uses = catalog.expected_uses.len(),
            "loaded reference catalog"
        );
        Ok(catalog)
    }

    /// The expected uses as a loaded lookup.
    pub fn expected_uses(&self) -> ExpectedUses {
        ExpectedUses::loaded(self.expected_uses.clone())
    }
}
