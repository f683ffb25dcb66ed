//! Record store: the immutable-update API over [`Record`].
//!
//! Every operation takes a record by reference and returns a new one. The input is never
//! modified, so a failed append leaves nothing half-written.
//!
//! The store is not a concurrency primitive. Two callers appending to copies of the same record
//! produce two diverging records; hosts that accept concurrent edits must serialize appends per
//! record themselves.

use crate::clock::{Clock, SystemClock};
use crate::error::{RecordError, ShapeError};
use crate::model::{
    Allergy, Attachment, Consultation, Contact, Entry, Exam, FamilyHistoryEntry, Medication,
    Observation, PatientBasics, PatientIdentity, Payload, PersonalInfo, Record, RecordKind,
    Surgery,
};
use crate::validation::{validate, ValidationResult};
use chrono::{DateTime, Utc};
use prontuario_types::{is_blank, NonEmptyText};
use prontuario_uuid::EntryId;
use std::sync::Arc;

#[derive(Clone)]
pub struct RecordStore {
    clock: Arc<dyn Clock>,
}

impl RecordStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// A store reading the system clock.
    pub fn system() -> Self {
        Self::new(Arc::new(SystemClock))
    }

    /// Timestamps never go backwards, even if the clock does.
    fn stamp(&self, previous: DateTime<Utc>) -> DateTime<Utc> {
        self.clock.now().max(previous)
    }

    /// Opens a new record with empty clinical collections.
    ///
    /// # Errors
    ///
    /// Returns a [`ShapeError`] if the patient name is blank.
    pub fn create(&self, basics: PatientBasics) -> Result<Record, ShapeError> {
        let name =
            NonEmptyText::new(&basics.name).map_err(|_| ShapeError::new("patient", "name"))?;
        if let Some(contact) = basics.contacts.iter().find(|c| is_blank(&c.value)) {
            tracing::debug!(kind = ?contact.kind, "contact without value in patient basics");
            return Err(ShapeError::new("contact", "value"));
        }

        let now = self.clock.now();
        let record = Record {
            id: EntryId::new(),
            patient_id: basics.patient_id.unwrap_or_default(),
            patient: PatientIdentity {
                name,
                birth_date: basics.birth_date,
                sex: basics.sex,
                national_id: basics.national_id,
            },
            contacts: basics.contacts,
            personal_info: basics.personal_info,
            consultations: Vec::new(),
            medications: Vec::new(),
            exams: Vec::new(),
            allergies: Vec::new(),
            surgeries: Vec::new(),
            family_history: Vec::new(),
            attachments: Vec::new(),
            observations: Vec::new(),
            created_at: now,
            last_updated: now,
        };

        tracing::info!(record_id = %record.id, patient_id = %record.patient_id, "record created");
        Ok(record)
    }

    pub fn append_consultation(
        &self,
        record: &Record,
        consultation: Consultation,
    ) -> Result<Record, ShapeError> {
        require_identifier(RecordKind::Consultation, "chiefComplaint", &consultation.chief_complaint)?;
        let stamp = self.stamp(record.last_updated);
        let entry = Entry::new(consultation.finalize(stamp), stamp);
        Ok(self.commit(record, RecordKind::Consultation, stamp, |r| {
            r.consultations.push(entry)
        }))
    }

    pub fn append_medication(
        &self,
        record: &Record,
        medication: Medication,
    ) -> Result<Record, ShapeError> {
        require_identifier(RecordKind::Medication, "name", &medication.name)?;
        let stamp = self.stamp(record.last_updated);
        let entry = Entry::new(medication.finalize(), stamp);
        Ok(self.commit(record, RecordKind::Medication, stamp, |r| {
            r.medications.push(entry)
        }))
    }

    pub fn append_exam(&self, record: &Record, exam: Exam) -> Result<Record, ShapeError> {
        require_identifier(RecordKind::Exam, "name", &exam.name)?;
        require_identifier(RecordKind::Exam, "category", &exam.category)?;
        let stamp = self.stamp(record.last_updated);
        let entry = Entry::new(exam, stamp);
        Ok(self.commit(record, RecordKind::Exam, stamp, |r| r.exams.push(entry)))
    }

    pub fn append_allergy(&self, record: &Record, allergy: Allergy) -> Result<Record, ShapeError> {
        require_identifier(RecordKind::Allergy, "agent", &allergy.agent)?;
        if allergy.severity.is_none() {
            return Err(ShapeError::new(RecordKind::Allergy.as_str(), "severity"));
        }
        let stamp = self.stamp(record.last_updated);
        let entry = Entry::new(allergy, stamp);
        Ok(self.commit(record, RecordKind::Allergy, stamp, |r| {
            r.allergies.push(entry)
        }))
    }

    pub fn append_surgery(&self, record: &Record, surgery: Surgery) -> Result<Record, ShapeError> {
        require_identifier(RecordKind::Surgery, "type", &surgery.surgery_type)?;
        require_identifier(RecordKind::Surgery, "hospital", &surgery.hospital)?;
        let stamp = self.stamp(record.last_updated);
        let entry = Entry::new(surgery, stamp);
        Ok(self.commit(record, RecordKind::Surgery, stamp, |r| {
            r.surgeries.push(entry)
        }))
    }

    pub fn append_family_history(
        &self,
        record: &Record,
        family: FamilyHistoryEntry,
    ) -> Result<Record, ShapeError> {
        require_identifier(RecordKind::FamilyHistory, "disease", &family.disease)?;
        require_identifier(RecordKind::FamilyHistory, "relationship", &family.relationship)?;
        let stamp = self.stamp(record.last_updated);
        let entry = Entry::new(family, stamp);
        Ok(self.commit(record, RecordKind::FamilyHistory, stamp, |r| {
            r.family_history.push(entry)
        }))
    }

    pub fn append_attachment(
        &self,
        record: &Record,
        attachment: Attachment,
    ) -> Result<Record, ShapeError> {
        require_identifier(RecordKind::Attachment, "fileName", &attachment.file_name)?;
        require_identifier(RecordKind::Attachment, "category", &attachment.category)?;
        let stamp = self.stamp(record.last_updated);
        let entry = Entry::new(attachment, stamp);
        Ok(self.commit(record, RecordKind::Attachment, stamp, |r| {
            r.attachments.push(entry)
        }))
    }

    pub fn append_observation(
        &self,
        record: &Record,
        observation: Observation,
    ) -> Result<Record, ShapeError> {
        require_identifier(RecordKind::Observation, "text", &observation.text)?;
        let stamp = self.stamp(record.last_updated);
        let entry = Entry::new(observation, stamp);
        Ok(self.commit(record, RecordKind::Observation, stamp, |r| {
            r.observations.push(entry)
        }))
    }

    /// Appends a payload of any kind to its collection.
    ///
    /// # Errors
    ///
    /// Returns a [`ShapeError`] if the payload lacks one of its kind-defining identifiers.
    pub fn append(&self, record: &Record, payload: Payload) -> Result<Record, ShapeError> {
        match payload {
            Payload::Consultation(p) => self.append_consultation(record, p),
            Payload::Medication(p) => self.append_medication(record, p),
            Payload::Exam(p) => self.append_exam(record, p),
            Payload::Allergy(p) => self.append_allergy(record, p),
            Payload::Surgery(p) => self.append_surgery(record, p),
            Payload::FamilyHistory(p) => self.append_family_history(record, p),
            Payload::Attachment(p) => self.append_attachment(record, p),
            Payload::Observation(p) => self.append_observation(record, p),
        }
    }

    /// Validates `payload` and, if it passes, appends it.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::Invalid`] with every field error when validation fails, or
    /// [`RecordError::Shape`] if the append itself is rejected.
    pub fn submit(&self, record: &Record, payload: Payload) -> Result<Record, RecordError> {
        let kind = payload.kind();
        match validate(&payload) {
            ValidationResult::Valid => Ok(self.append(record, payload)?),
            ValidationResult::Invalid(errors) => {
                tracing::debug!(
                    record_id = %record.id,
                    %kind,
                    fields = errors.len(),
                    "payload rejected by validation"
                );
                Err(RecordError::Invalid { kind, errors })
            }
        }
    }

    pub fn append_contact(&self, record: &Record, contact: Contact) -> Result<Record, ShapeError> {
        if is_blank(&contact.value) {
            return Err(ShapeError::new("contact", "value"));
        }
        let stamp = self.stamp(record.last_updated);
        tracing::debug!(record_id = %record.id, "contact appended");
        Ok(record.updated(stamp, |r| r.contacts.push(contact)))
    }

    /// Replaces the personal-info block as a whole.
    pub fn update_personal_info(&self, record: &Record, info: PersonalInfo) -> Record {
        let stamp = self.stamp(record.last_updated);
        tracing::debug!(record_id = %record.id, "personal info updated");
        record.updated(stamp, |r| r.personal_info = info)
    }

    fn commit(
        &self,
        record: &Record,
        kind: RecordKind,
        stamp: DateTime<Utc>,
        change: impl FnOnce(&mut Record),
    ) -> Record {
        let next = record.updated(stamp, change);
        tracing::debug!(record_id = %next.id, %kind, "entry appended");
        next
    }
}

fn require_identifier(kind: RecordKind, field: &'static str, value: &str) -> Result<(), ShapeError> {
    if is_blank(value) {
        tracing::debug!(%kind, field, "append rejected: missing identifier");
        return Err(ShapeError::new(kind.as_str(), field));
    }
    Ok(())
}
