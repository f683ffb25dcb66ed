//! Leaf entries. None of these is ever edited in place; a correction is a new entry.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exam {
    #[serde(default)]
    pub name: String,
    /// Laboratory, imaging, cardiology, ...
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub requested_on: Option<NaiveDate>,
    #[serde(default)]
    pub result_on: Option<NaiveDate>,
    #[serde(default)]
    pub laboratory: Option<String>,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllergyType {
    Medication,
    Food,
    Environmental,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllergySeverity {
    Mild,
    Moderate,
    Severe,
    LifeThreatening,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Allergy {
    #[serde(rename = "type", default)]
    pub allergy_type: Option<AllergyType>,
    #[serde(default)]
    pub agent: String,
    #[serde(default)]
    pub reaction: String,
    #[serde(default)]
    pub severity: Option<AllergySeverity>,
    #[serde(default)]
    pub identified_on: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Surgery {
    #[serde(rename = "type", default)]
    pub surgery_type: String,
    #[serde(default)]
    pub hospital: String,
    #[serde(default)]
    pub responsible_physician: String,
    #[serde(default)]
    pub performed_on: Option<NaiveDate>,
    #[serde(default)]
    pub outcome: String,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyHistoryEntry {
    #[serde(default)]
    pub disease: String,
    /// Mother, father, sibling, ...
    #[serde(default)]
    pub relationship: String,
    #[serde(default)]
    pub age_at_diagnosis: Option<u8>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Metadata for an uploaded file. The bytes themselves live wherever the host stores uploads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub size_bytes: Option<u64>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    #[serde(default)]
    pub text: String,
}
