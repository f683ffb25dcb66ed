//! The prontuário record model.
//!
//! A [`Record`] is the root aggregate for one patient. It exclusively owns its nested
//! collections; every clinical fact lives in exactly one of them, wrapped in an [`Entry`] that
//! stamps the identifier and the time it was recorded.
//!
//! Payload types (`Consultation`, `Medication`, ...) are what forms submit. They double as the
//! stored entry data once they have been validated and finalized by the record store.

mod consultation;
mod entries;
mod medication;
mod patient;
mod record;

pub use consultation::{
    BloodPressure, Consultation, DiagnosticCodes, ExamRequest, Physician, Prescription, Referral,
    VitalSigns,
};
pub use entries::{
    Allergy, AllergySeverity, AllergyType, Attachment, Exam, FamilyHistoryEntry, Observation,
    Surgery,
};
pub use medication::Medication;
pub use patient::{Contact, ContactKind, PatientBasics, PatientIdentity, PersonalInfo, Sex};
pub use record::Record;

use crate::error::UnknownKind;
use chrono::{DateTime, Utc};
use prontuario_uuid::EntryId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kinds of clinical fact a record collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Consultation,
    Medication,
    Exam,
    Allergy,
    Surgery,
    FamilyHistory,
    Attachment,
    Observation,
}

impl RecordKind {
    pub const ALL: [RecordKind; 8] = [
        RecordKind::Consultation,
        RecordKind::Medication,
        RecordKind::Exam,
        RecordKind::Allergy,
        RecordKind::Surgery,
        RecordKind::FamilyHistory,
        RecordKind::Attachment,
        RecordKind::Observation,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RecordKind::Consultation => "consultation",
            RecordKind::Medication => "medication",
            RecordKind::Exam => "exam",
            RecordKind::Allergy => "allergy",
            RecordKind::Surgery => "surgery",
            RecordKind::FamilyHistory => "family_history",
            RecordKind::Attachment => "attachment",
            RecordKind::Observation => "observation",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = UnknownKind;

    /// Accepts the snake_case name; hyphens are treated as underscores (`family-history`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        RecordKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

/// One appended fact: the payload data plus its identity and recording time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry<T> {
    pub id: EntryId,
    pub recorded_at: DateTime<Utc>,
    #[serde(flatten)]
    pub data: T,
}

impl<T> Entry<T> {
    pub(crate) fn new(data: T, recorded_at: DateTime<Utc>) -> Self {
        Self {
            id: EntryId::new(),
            recorded_at,
            data,
        }
    }
}

/// A candidate sub-record of any kind, as submitted by a form.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Consultation(Consultation),
    Medication(Medication),
    Exam(Exam),
    Allergy(Allergy),
    Surgery(Surgery),
    FamilyHistory(FamilyHistoryEntry),
    Attachment(Attachment),
    Observation(Observation),
}

impl Payload {
    pub fn kind(&self) -> RecordKind {
        match self {
            Payload::Consultation(_) => RecordKind::Consultation,
            Payload::Medication(_) => RecordKind::Medication,
            Payload::Exam(_) => RecordKind::Exam,
            Payload::Allergy(_) => RecordKind::Allergy,
            Payload::Surgery(_) => RecordKind::Surgery,
            Payload::FamilyHistory(_) => RecordKind::FamilyHistory,
            Payload::Attachment(_) => RecordKind::Attachment,
            Payload::Observation(_) => RecordKind::Observation,
        }
    }
}
