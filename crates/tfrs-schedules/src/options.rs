//! # Picker Options
//!
//! Options a single-select cell offers, as `{key, value}` pairs:
//!
//! - fuel type: approved fuels effective for the compliance period
//!   (`id → name`);
//! - fuel class: classes of the row's selected fuel (`id → fuelClass`);
//! - expected use: the loaded expected-use list (`id → description`),
//!   empty while the list is still being fetched.

use serde::Serialize;
use tfrs_core::{CompliancePeriod, ExpectedUses, ReferenceData};

use crate::column::{ColumnKind, OptionSource, ScheduleCColumn};
use crate::row::Row;

/// Lookups and flags an edit or option query is evaluated against.
#[derive(Debug, Clone, Copy)]
pub struct EditContext<'a> {
    pub reference: &'a ReferenceData,
    pub expected_uses: &'a ExpectedUses,
    /// Period of the report being edited; `None` offers every fuel.
    pub period: Option<&'a CompliancePeriod>,
    pub read_only: bool,
}

/// One picker option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub key: u64,
    pub value: String,
}

/// Options for `column` of `row`. Columns that are not single-select have
/// none.
pub fn options_for(row: &Row, column: ScheduleCColumn, ctx: &EditContext<'_>) -> Vec<SelectOption> {
    let ColumnKind::SingleSelect { source } = column.kind() else {
        return Vec::new();
    };
    match source {
        OptionSource::FuelTypes => ctx
            .reference
            .approved_fuels()
            .iter()
            .filter(|fuel| ctx.period.map_or(true, |period| period.admits(fuel)))
            .map(|fuel| SelectOption {
                key: fuel.id.0,
                value: fuel.name.clone(),
            })
            .collect(),
        OptionSource::FuelClasses => ctx
            .reference
            .fuel_named(row.value(ScheduleCColumn::FuelType))
            .map(|fuel| {
                fuel.fuel_classes
                    .iter()
                    .map(|fc| SelectOption {
                        key: fc.id.0,
                        value: fc.fuel_class.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default(),
        OptionSource::ExpectedUses => ctx
            .expected_uses
            .options()
            .iter()
            .map(|item| SelectOption {
                key: item.id.0,
                value: item.description.clone(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tfrs_core::{
        ApprovedFuel, ExpectedUse, ExpectedUseId, FuelClass, FuelClassId, FuelTypeId,
        UnitOfMeasure,
    };

    fn date(y: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, 1, 1).unwrap()
    }

    fn reference() -> ReferenceData {
        ReferenceData::new(vec![
            ApprovedFuel {
                id: FuelTypeId(1),
                name: "Propane".into(),
                effective_date: date(2017),
                fuel_classes: vec![FuelClass {
                    id: FuelClassId(2),
                    fuel_class: "Gasoline".into(),
                }],
                unit_of_measure: Some(UnitOfMeasure::new("L")),
            },
            ApprovedFuel {
                id: FuelTypeId(2),
                name: "Hydrogen".into(),
                effective_date: date(2021),
                fuel_classes: Vec::new(),
                unit_of_measure: Some(UnitOfMeasure::new("kg")),
            },
        ])
    }

    #[test]
    fn fuel_types_filtered_by_period() {
        let reference = reference();
        let uses = ExpectedUses::default();
        let period = CompliancePeriod::new("2019", date(2019));
        let ctx = EditContext {
            reference: &reference,
            expected_uses: &uses,
            period: Some(&period),
            read_only: false,
        };
        let row = Row::blank(1, false);
        let options = options_for(&row, ScheduleCColumn::FuelType, &ctx);
        assert_eq!(
            options,
            vec![SelectOption {
                key: 1,
                value: "Propane".into()
            }]
        );

        let unbounded = EditContext { period: None, ..ctx };
        assert_eq!(options_for(&row, ScheduleCColumn::FuelType, &unbounded).len(), 2);
    }

    #[test]
    fn fuel_classes_follow_selected_fuel() {
        let reference = reference();
        let uses = ExpectedUses::default();
        let ctx = EditContext {
            reference: &reference,
            expected_uses: &uses,
            period: None,
            read_only: false,
        };
        let mut row = Row::blank(1, false);
        assert!(options_for(&row, ScheduleCColumn::FuelClass, &ctx).is_empty());
        row.set_value(ScheduleCColumn::FuelType, "Propane");
        let options = options_for(&row, ScheduleCColumn::FuelClass, &ctx);
        assert_eq!(options[0].value, "Gasoline");
        assert_eq!(options[0].key, 2);
    }

    #[test]
    fn expected_uses_and_non_select_columns() {
        let reference = reference();
        let uses = ExpectedUses::loaded(vec![ExpectedUse {
            id: ExpectedUseId(5),
            description: "Other".into(),
        }]);
        let ctx = EditContext {
            reference: &reference,
            expected_uses: &uses,
            period: None,
            read_only: false,
        };
        let row = Row::blank(1, false);
        assert_eq!(options_for(&row, ScheduleCColumn::ExpectedUse, &ctx).len(), 1);
        assert!(options_for(&row, ScheduleCColumn::Quantity, &ctx).is_empty());
        assert!(options_for(&row, ScheduleCColumn::Units, &ctx).is_empty());
    }
}
