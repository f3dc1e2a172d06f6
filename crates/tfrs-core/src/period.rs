//! # Compliance Periods
//!
//! A compliance report covers one compliance period. The period's effective
//! date decides which approved fuels may be reported: a fuel becomes
//! selectable once its own effective date is on or before the period's.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::reference::ApprovedFuel;

/// The reporting period a compliance report belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompliancePeriod {
    /// Display name, usually the calendar year (e.g. `"2019"`).
    pub description: String,
    /// First day the period is in force.
    pub effective_date: NaiveDate,
    /// Last day the period is in force, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<NaiveDate>,
}

impl CompliancePeriod {
    /// Create a period with no expiration date.
    pub fn new(description: impl Into<String>, effective_date: NaiveDate) -> Self {
        Self {
            description: description.into(),
            effective_date,
            expiration_date: None,
        }
    }

    /// Whether `fuel` may be reported in this period.
    pub fn admits(&self, fuel: &ApprovedFuel) -> bool {
        fuel.effective_date <= self.effective_date
    }
}

impl std::fmt::Display for CompliancePeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::FuelTypeId;
    use crate::reference::UnitOfMeasure;

    fn fuel_effective(date: NaiveDate) -> ApprovedFuel {
        ApprovedFuel {
            id: FuelTypeId(1),
            name: "Propane".to_string(),
            effective_date: date,
            fuel_classes: Vec::new(),
            unit_of_measure: Some(UnitOfMeasure::new("L")),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn admits_fuels_effective_on_or_before_period() {
        let period = CompliancePeriod::new("2019", date(2019, 1, 1));
        assert!(period.admits(&fuel_effective(date(2017, 1, 1))));
        assert!(period.admits(&fuel_effective(date(2019, 1, 1))));
        assert!(!period.admits(&fuel_effective(date(2019, 1, 2))));
    }

    #[test]
    fn deserializes_camel_case_dates() {
        let period: CompliancePeriod = serde_json::from_str(
            r#"{"description":"2019","effectiveDate":"2019-01-01","expirationDate":"2019-12-31"}"#,
        )
        .unwrap();
        assert_eq!(period.effective_date, date(2019, 1, 1));
        assert_eq!(period.expiration_date, Some(date(2019, 12, 31)));
        assert_eq!(period.to_string(), "2019");
    }
}
