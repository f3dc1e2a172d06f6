//! # Fixture Files
//!
//! A fixture describes one Schedule C section as a report page would host
//! it: the reference catalog, the props handed to the section, a list of
//! cell edits, and optionally the result of a server validation pass.
//!
//! ```yaml
//! catalog:
//!   approvedFuels:
//!     - { id: 1, name: Propane, effectiveDate: 2017-01-01,
//!         fuelClasses: [{ id: 2, fuelClass: Gasoline }],
//!         unitOfMeasure: { name: L } }
//!   expectedUses:
//!     - { id: 1, description: Heating Oil }
//!     - { id: 2, description: Other }
//! props:
//!   complianceReport:
//!     scheduleC:
//!       records:
//!         - { fuelType: Propane, fuelClass: Gasoline, quantity: "1500",
//!             expectedUse: Heating Oil }
//! edits:
//!   - { row: 3, col: fuel_type, value: propane }
//! validationMessages:
//!   scheduleC: ["Duplicate entry in row 0"]
//! ```
//!
//! Files ending in `.json` are read as JSON, anything else as YAML.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Deserialize;

use tfrs_core::ReferenceCatalog;
use tfrs_schedules::{
    CellChange, ExpectedUsesLoader, InMemoryScheduleStore, MountKind, ScheduleCSection,
    SectionProps, StaticExpectedUses, ValidationMessages,
};

/// One section scenario.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Fixture {
    #[serde(default)]
    pub catalog: ReferenceCatalog,
    #[serde(default)]
    pub props: SectionProps,
    /// Cell edits in grid coordinates (the two header rows count).
    #[serde(default)]
    pub edits: Vec<CellChange>,
    /// Whether the validation pass came back clean.
    #[serde(default)]
    pub valid: bool,
    #[serde(default)]
    pub validation_messages: Option<ValidationMessages>,
}

impl Fixture {
    /// Parse fixture text. `json` selects the JSON reader.
    pub fn parse(text: &str, json: bool) -> Result<Self> {
        let fixture: Self = if json {
            serde_json::from_str(text).context("parsing JSON fixture")?
        } else {
            serde_yaml::from_str(text).context("parsing YAML fixture")?
        };
        fixture
            .catalog
            .reference
            .validate()
            .context("fixture catalog is inconsistent")?;
        Ok(fixture)
    }

    /// Read and parse a fixture file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading fixture {}", path.display()))?;
        let json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        Self::parse(&text, json).with_context(|| format!("loading fixture {}", path.display()))
    }

    /// Load a fixture, replacing its catalog with the one at `catalog` when
    /// given.
    pub fn load_with_catalog(path: &Path, catalog: Option<&Path>) -> Result<Self> {
        let mut fixture = Self::load(path)?;
        if let Some(catalog) = catalog {
            fixture.catalog = ReferenceCatalog::load(catalog)
                .with_context(|| format!("loading catalog {}", catalog.display()))?;
        }
        Ok(fixture)
    }

    /// Props for the validation round-trip: the fixture's props carrying
    /// its validation result.
    pub fn validated_props(&self) -> SectionProps {
        SectionProps {
            valid: self.valid,
            validating: false,
            validation_messages: self.validation_messages.clone(),
            ..self.props.clone()
        }
    }
}

/// A mounted section with its stores, as the CLI drives it.
#[derive(Debug)]
pub struct Session {
    pub section: ScheduleCSection,
    pub store: InMemoryScheduleStore,
    pub expected_uses: StaticExpectedUses,
    pub mounted: MountKind,
}

impl Session {
    /// Mount a section for `fixture`.
    pub fn mount(fixture: &Fixture) -> Self {
        let reference = Arc::new(fixture.catalog.reference.clone());
        let mut section = ScheduleCSection::new(reference, fixture.props.clone());
        let mut store = InMemoryScheduleStore::new();
        let mut expected_uses = StaticExpectedUses::new(fixture.catalog.expected_uses.clone());
        let mounted = section.mount(&mut store, &mut expected_uses);
        Self {
            section,
            store,
            expected_uses,
            mounted,
        }
    }

    /// Apply `changes` as one edit batch.
    pub fn edit(&mut self, changes: &[CellChange]) -> tfrs_schedules::EditOutcome {
        self.section.handle_cells_changed(
            changes,
            &mut self.store,
            self.expected_uses.expected_uses(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML: &str = "
catalog:
  approvedFuels:
    - { id: 1, name: Propane, effectiveDate: 2017-01-01,
        fuelClasses: [{ id: 2, fuelClass: Gasoline }], unitOfMeasure: { name: L } }
  expectedUses:
    - { id: 1, description: Heating Oil }
edits:
  - { row: 2, col: fuel_type, value: propane }
validationMessages:
  scheduleC: ['Duplicate entry in row 0']
";

    #[test]
    fn parse_yaml_fixture() {
        let fixture = Fixture::parse(YAML, false).unwrap();
        assert_eq!(fixture.catalog.reference.approved_fuels.len(), 1);
        assert_eq!(fixture.edits.len(), 1);
        assert!(fixture.validation_messages.is_some());
        assert!(!fixture.props.read_only);
    }

    #[test]
    fn empty_fixture_mounts_blank_rows() {
        let fixture = Fixture::parse("{}", true).unwrap();
        let session = Session::mount(&fixture);
        assert_eq!(session.mounted, MountKind::BlankRows);
        assert_eq!(session.section.grid().len(), 5);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Fixture::parse("{\"edit\": []}", true).is_err());
    }

    #[test]
    fn duplicate_fuels_are_rejected() {
        let text = "catalog:\n  approvedFuels:\n    - {id: 1, name: Propane, effectiveDate: 2017-01-01}\n    - {id: 2, name: PROPANE, effectiveDate: 2017-01-01}\n";
        let err = Fixture::parse(text, false).unwrap_err();
        assert!(format!("{err:#}").contains("inconsistent"));
    }

    #[test]
    fn session_edit_publishes_records() {
        let fixture = Fixture::parse(YAML, false).unwrap();
        let mut session = Session::mount(&fixture);
        let outcome = session.edit(&fixture.edits);
        assert_eq!(outcome.applied, 1);
        assert_eq!(outcome.records[0].fuel_type, "Propane");
        assert_eq!(outcome.records[0].fuel_class, "Gasoline");
    }

    #[test]
    fn validated_props_carry_messages() {
        let fixture = Fixture::parse(YAML, false).unwrap();
        let props = fixture.validated_props();
        assert!(!props.validating);
        assert!(props.validation_messages.is_some());
    }
}
