use super::{
    Allergy, Attachment, Consultation, Contact, Entry, Exam, FamilyHistoryEntry, Medication,
    Observation, PatientIdentity, PersonalInfo, Surgery,
};
use chrono::{DateTime, Utc};
use prontuario_uuid::EntryId;
use serde::{Deserialize, Serialize};

/// The prontuário: root EHR aggregate for one patient.
///
/// Records are values. The only way to change one is through the record store, which returns a
/// new `Record` and leaves the input untouched; there are no public setters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub(crate) id: EntryId,
    pub(crate) patient_id: EntryId,
    pub(crate) patient: PatientIdentity,
    #[serde(default)]
    pub(crate) contacts: Vec<Contact>,
    #[serde(default)]
    pub(crate) personal_info: PersonalInfo,
    #[serde(default)]
    pub(crate) consultations: Vec<Entry<Consultation>>,
    #[serde(default)]
    pub(crate) medications: Vec<Entry<Medication>>,
    #[serde(default)]
    pub(crate) exams: Vec<Entry<Exam>>,
    #[serde(default)]
    pub(crate) allergies: Vec<Entry<Allergy>>,
    #[serde(default)]
    pub(crate) surgeries: Vec<Entry<Surgery>>,
    #[serde(default)]
    pub(crate) family_history: Vec<Entry<FamilyHistoryEntry>>,
    #[serde(default)]
    pub(crate) attachments: Vec<Entry<Attachment>>,
    #[serde(default)]
    pub(crate) observations: Vec<Entry<Observation>>,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) last_updated: DateTime<Utc>,
}

impl Record {
    pub fn id(&self) -> EntryId {
        self.id
    }

    pub fn patient_id(&self) -> EntryId {
        self.patient_id
    }

    pub fn patient(&self) -> &PatientIdentity {
        &self.patient
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn personal_info(&self) -> &PersonalInfo {
        &self.personal_info
    }

    pub fn consultations(&self) -> &[Entry<Consultation>] {
        &self.consultations
    }

    pub fn medications(&self) -> &[Entry<Medication>] {
        &self.medications
    }

    pub fn exams(&self) -> &[Entry<Exam>] {
        &self.exams
    }

    pub fn allergies(&self) -> &[Entry<Allergy>] {
        &self.allergies
    }

    pub fn surgeries(&self) -> &[Entry<Surgery>] {
        &self.surgeries
    }

    pub fn family_history(&self) -> &[Entry<FamilyHistoryEntry>] {
        &self.family_history
    }

    pub fn attachments(&self) -> &[Entry<Attachment>] {
        &self.attachments
    }

    pub fn observations(&self) -> &[Entry<Observation>] {
        &self.observations
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_updated(&self) -> DateTime<Utc> {
        self.last_updated
    }

    /// Copy of this record with `change` applied and `last_updated` moved to `stamp`.
    pub(crate) fn updated(&self, stamp: DateTime<Utc>, change: impl FnOnce(&mut Record)) -> Record {
        let mut next = self.clone();
        change(&mut next);
        next.last_updated = stamp;
        next
    }
}
