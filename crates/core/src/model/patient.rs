use chrono::NaiveDate;
use prontuario_types::NonEmptyText;
use prontuario_uuid::EntryId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Female,
    Male,
    Other,
    #[default]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactKind {
    Phone,
    Mobile,
    Email,
    Emergency,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub kind: ContactKind,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub label: Option<String>,
}

/// Free-form personal details shown on the record header. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    #[serde(default)]
    pub marital_status: Option<String>,
    #[serde(default)]
    pub occupation: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub blood_type: Option<String>,
    #[serde(default)]
    pub health_insurance: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// What a caller supplies to open a new record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientBasics {
    /// Existing patient identifier; a new one is generated when absent.
    #[serde(default)]
    pub patient_id: Option<EntryId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub sex: Sex,
    /// National identifier (CPF).
    #[serde(default)]
    pub national_id: Option<String>,
    #[serde(default)]
    pub contacts: Vec<Contact>,
    #[serde(default)]
    pub personal_info: PersonalInfo,
}

/// Identity block of an open record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientIdentity {
    pub name: NonEmptyText,
    pub birth_date: Option<NaiveDate>,
    pub sex: Sex,
    pub national_id: Option<String>,
}
