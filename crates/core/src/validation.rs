//! Form validation.
//!
//! Each payload kind has a rule set that checks required fields and cross-field dependencies.
//! Rules never stop at the first failure: every violation is collected into [`FieldErrors`],
//! keyed by the camelCase wire name of the field, so a form can show all messages at once.
//!
//! Validation is pure. Running it twice on the same payload gives the same result.

use crate::model::{
    Allergy, Attachment, Consultation, Exam, FamilyHistoryEntry, Medication, Observation, Payload,
    RecordKind, Surgery, VitalSigns,
};
use prontuario_types::is_blank;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Field name → human-readable reason.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a violation. The first reason recorded for a field is kept.
    pub fn add(&mut self, field: impl Into<String>, reason: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| reason.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, reason) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {reason}")?;
            first = false;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "errors", rename_all = "snake_case")]
pub enum ValidationResult {
    Valid,
    Invalid(FieldErrors),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    pub fn errors(&self) -> Option<&FieldErrors> {
        match self {
            ValidationResult::Valid => None,
            ValidationResult::Invalid(errors) => Some(errors),
        }
    }

    fn from_errors(errors: FieldErrors) -> Self {
        if errors.is_empty() {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid(errors)
        }
    }
}

/// A rule set for one payload kind.
pub trait FormRules {
    const KIND: RecordKind;

    /// Adds every violation found in `self` to `errors`.
    fn check(&self, errors: &mut FieldErrors);
}

/// Validates a typed payload against its rule set.
pub fn validate_form<P: FormRules>(payload: &P) -> ValidationResult {
    let mut errors = FieldErrors::new();
    payload.check(&mut errors);
    if !errors.is_empty() {
        tracing::debug!(kind = %P::KIND, fields = errors.len(), "form failed validation");
    }
    ValidationResult::from_errors(errors)
}

/// Validates a payload of any kind.
pub fn validate(payload: &Payload) -> ValidationResult {
    match payload {
        Payload::Consultation(p) => validate_form(p),
        Payload::Medication(p) => validate_form(p),
        Payload::Exam(p) => validate_form(p),
        Payload::Allergy(p) => validate_form(p),
        Payload::Surgery(p) => validate_form(p),
        Payload::FamilyHistory(p) => validate_form(p),
        Payload::Attachment(p) => validate_form(p),
        Payload::Observation(p) => validate_form(p),
    }
}

/// Decodes a raw JSON form payload of the given kind.
///
/// Decoding failures (wrong types, malformed dates, unknown enum values) are reported as a field
/// error keyed by the path of the offending field.
///
/// # Errors
///
/// Returns the [`FieldErrors`] describing why the payload could not be decoded.
pub fn decode_payload(kind: RecordKind, value: serde_json::Value) -> Result<Payload, FieldErrors> {
    let payload = match kind {
        RecordKind::Consultation => Payload::Consultation(decode(value)?),
        RecordKind::Medication => Payload::Medication(decode(value)?),
        RecordKind::Exam => Payload::Exam(decode(value)?),
        RecordKind::Allergy => Payload::Allergy(decode(value)?),
        RecordKind::Surgery => Payload::Surgery(decode(value)?),
        RecordKind::FamilyHistory => Payload::FamilyHistory(decode(value)?),
        RecordKind::Attachment => Payload::Attachment(decode(value)?),
        RecordKind::Observation => Payload::Observation(decode(value)?),
    };
    Ok(payload)
}

fn decode<T: DeserializeOwned>(value: serde_json::Value) -> Result<T, FieldErrors> {
    serde_path_to_error::deserialize(value).map_err(|err| {
        let path = err.path().to_string();
        let field = if path.is_empty() || path == "." {
            "payload".to_string()
        } else {
            path
        };
        let mut errors = FieldErrors::new();
        errors.add(field, err.into_inner().to_string());
        errors
    })
}

/// Decodes and validates a raw JSON form payload in one step.
pub fn validate_json(kind: RecordKind, value: serde_json::Value) -> ValidationResult {
    match decode_payload(kind, value) {
        Ok(payload) => validate(&payload),
        Err(errors) => ValidationResult::Invalid(errors),
    }
}

fn require_text(errors: &mut FieldErrors, field: &str, value: &str, label: &str) {
    if is_blank(value) {
        errors.add(field, format!("{label} is required"));
    }
}

fn require<T>(errors: &mut FieldErrors, field: &str, value: &Option<T>, label: &str) {
    if value.is_none() {
        errors.add(field, format!("{label} is required"));
    }
}

fn check_vitals(vitals: &VitalSigns, errors: &mut FieldErrors) {
    if vitals.weight_kg().is_some_and(|w| !(w.is_finite() && w > 0.0)) {
        errors.add("vitals.weightKg", "Weight must be greater than zero");
    }
    if vitals.height_cm().is_some_and(|h| !(h.is_finite() && h > 0.0)) {
        errors.add("vitals.heightCm", "Height must be greater than zero");
    }
    if vitals.oxygen_saturation.is_some_and(|spo2| spo2 > 100) {
        errors.add(
            "vitals.oxygenSaturation",
            "Oxygen saturation cannot exceed 100%",
        );
    }
    if let Some(pressure) = vitals.blood_pressure {
        if pressure.diastolic >= pressure.systolic {
            errors.add(
                "vitals.bloodPressure",
                "Diastolic pressure must be lower than systolic pressure",
            );
        }
    }
}

impl FormRules for Consultation {
    const KIND: RecordKind = RecordKind::Consultation;

    fn check(&self, errors: &mut FieldErrors) {
        require_text(errors, "physician.name", &self.physician.name, "Physician name");
        require_text(errors, "physician.crm", &self.physician.crm, "CRM");
        require_text(errors, "physician.specialty", &self.physician.specialty, "Specialty");
        require_text(errors, "chiefComplaint", &self.chief_complaint, "Chief complaint");
        require_text(errors, "conduct", &self.conduct, "Conduct");
        check_vitals(&self.vitals, errors);
    }
}

impl FormRules for Medication {
    const KIND: RecordKind = RecordKind::Medication;

    fn check(&self, errors: &mut FieldErrors) {
        require_text(errors, "name", &self.name, "Medication name");
        require_text(errors, "activeIngredient", &self.active_ingredient, "Active ingredient");
        require_text(
            errors,
            "dosingInstructions",
            &self.dosing_instructions,
            "Dosing instructions",
        );
        require_text(errors, "dosageForm", &self.dosage_form, "Dosage form");
        require_text(errors, "route", &self.route, "Route of administration");
        require(errors, "startDate", &self.start_date, "Start date");

        if self.continuous_use {
            return;
        }
        match (self.start_date, self.end_date) {
            (_, None) => errors.add(
                "endDate",
                "End date is required unless the medication is in continuous use",
            ),
            (Some(start), Some(end)) if end < start => {
                errors.add("endDate", "End date cannot be before the start date")
            }
            _ => {}
        }
    }
}

impl FormRules for Exam {
    const KIND: RecordKind = RecordKind::Exam;

    fn check(&self, errors: &mut FieldErrors) {
        require_text(errors, "name", &self.name, "Exam name");
        require_text(errors, "category", &self.category, "Category");
        if let (Some(requested), Some(result)) = (self.requested_on, self.result_on) {
            if result < requested {
                errors.add("resultOn", "Result date cannot be before the request date");
            }
        }
    }
}

impl FormRules for Allergy {
    const KIND: RecordKind = RecordKind::Allergy;

    fn check(&self, errors: &mut FieldErrors) {
        require(errors, "type", &self.allergy_type, "Allergy type");
        require_text(errors, "agent", &self.agent, "Agent");
        require_text(errors, "reaction", &self.reaction, "Reaction");
        require(errors, "severity", &self.severity, "Severity");
        require(errors, "identifiedOn", &self.identified_on, "Identification date");
    }
}

impl FormRules for Surgery {
    const KIND: RecordKind = RecordKind::Surgery;

    fn check(&self, errors: &mut FieldErrors) {
        require_text(errors, "type", &self.surgery_type, "Surgery type");
        require_text(errors, "hospital", &self.hospital, "Hospital");
        require_text(
            errors,
            "responsiblePhysician",
            &self.responsible_physician,
            "Responsible physician",
        );
        require_text(errors, "outcome", &self.outcome, "Outcome");
    }
}

impl FormRules for FamilyHistoryEntry {
    const KIND: RecordKind = RecordKind::FamilyHistory;

    fn check(&self, errors: &mut FieldErrors) {
        require_text(errors, "disease", &self.disease, "Disease");
        require_text(errors, "relationship", &self.relationship, "Relationship");
    }
}

impl FormRules for Attachment {
    const KIND: RecordKind = RecordKind::Attachment;

    fn check(&self, errors: &mut FieldErrors) {
        require_text(errors, "fileName", &self.file_name, "File name");
        require_text(errors, "category", &self.category, "Category");
    }
}

impl FormRules for Observation {
    const KIND: RecordKind = RecordKind::Observation;

    fn check(&self, errors: &mut FieldErrors) {
        require_text(errors, "text", &self.text, "Observation");
    }
}
