use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A medication in the patient's list.
///
/// Continuous-use medications have no end date. [`Medication::set_continuous_use`] clears any
/// end date already entered, and the record store applies the same rule when appending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub active_ingredient: String,
    #[serde(default)]
    pub strength: Option<String>,
    #[serde(default)]
    pub dosage_form: String,
    #[serde(default)]
    pub route: String,
    #[serde(default)]
    pub dosing_instructions: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default, alias = "dataFim")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, alias = "continuo")]
    pub continuous_use: bool,
    #[serde(default)]
    pub prescriber: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Medication {
    pub fn set_continuous_use(&mut self, continuous_use: bool) {
        self.continuous_use = continuous_use;
        if continuous_use {
            self.end_date = None;
        }
    }

    pub fn set_end_date(&mut self, end_date: Option<NaiveDate>) {
        self.end_date = if self.continuous_use { None } else { end_date };
    }

    pub(crate) fn finalize(mut self) -> Self {
        let continuous_use = self.continuous_use;
        self.set_continuous_use(continuous_use);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn continuous_use_clears_end_date() {
        let mut medication = Medication {
            end_date: Some(date(2024, 12, 31)),
            ..Default::default()
        };
        medication.set_continuous_use(true);
        assert_eq!(medication.end_date, None);

        medication.set_end_date(Some(date(2025, 1, 31)));
        assert_eq!(medication.end_date, None);

        medication.set_continuous_use(false);
        medication.set_end_date(Some(date(2025, 1, 31)));
        assert_eq!(medication.end_date, Some(date(2025, 1, 31)));
    }

    #[test]
    fn finalize_applies_continuous_use_rule() {
        let medication = Medication {
            continuous_use: true,
            end_date: Some(date(2024, 12, 31)),
            ..Default::default()
        }
        .finalize();
        assert_eq!(medication.end_date, None);
    }

    #[test]
    fn portuguese_keys_are_accepted() {
        let medication: Medication =
            serde_json::from_str(r#"{"continuo": false, "dataFim": "2024-06-30"}"#).unwrap();
        assert!(!medication.continuous_use);
        assert_eq!(medication.end_date, Some(date(2024, 6, 30)));

        let json = serde_json::to_value(&medication).unwrap();
        assert_eq!(json["endDate"], "2024-06-30");
        assert_eq!(json["continuousUse"], false);
    }
}
