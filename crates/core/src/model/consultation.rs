//! Consultation payload, vital signs and the diagnostic-code set.

use crate::metrics::compute_bmi;
use chrono::{DateTime, Utc};
use prontuario_types::{DiagnosticCode, TextError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Physician {
    #[serde(default)]
    pub name: String,
    /// Regional medical council registration.
    #[serde(default)]
    pub crm: String,
    #[serde(default)]
    pub specialty: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BloodPressure {
    pub systolic: u16,
    pub diastolic: u16,
}

/// Vital signs taken during a consultation.
///
/// `bmi` is derived from weight and height and cannot be set directly. Weight and height are
/// only reachable through setters that re-derive it, and deserialization ignores any incoming
/// `bmi` value and derives it again.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "VitalSignsInput")]
pub struct VitalSigns {
    pub blood_pressure: Option<BloodPressure>,
    pub heart_rate: Option<u16>,
    pub respiratory_rate: Option<u16>,
    pub temperature: Option<f64>,
    pub oxygen_saturation: Option<u8>,
    weight_kg: Option<f64>,
    height_cm: Option<f64>,
    pub glucose: Option<f64>,
    bmi: Option<f64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VitalSignsInput {
    #[serde(default)]
    blood_pressure: Option<BloodPressure>,
    #[serde(default)]
    heart_rate: Option<u16>,
    #[serde(default)]
    respiratory_rate: Option<u16>,
    #[serde(default)]
    temperature: Option<f64>,
    #[serde(default)]
    oxygen_saturation: Option<u8>,
    #[serde(default)]
    weight_kg: Option<f64>,
    #[serde(default)]
    height_cm: Option<f64>,
    #[serde(default)]
    glucose: Option<f64>,
}

impl From<VitalSignsInput> for VitalSigns {
    fn from(input: VitalSignsInput) -> Self {
        let mut vitals = VitalSigns {
            blood_pressure: input.blood_pressure,
            heart_rate: input.heart_rate,
            respiratory_rate: input.respiratory_rate,
            temperature: input.temperature,
            oxygen_saturation: input.oxygen_saturation,
            weight_kg: input.weight_kg,
            height_cm: input.height_cm,
            glucose: input.glucose,
            bmi: None,
        };
        vitals.rederive();
        vitals
    }
}

impl VitalSigns {
    pub fn weight_kg(&self) -> Option<f64> {
        self.weight_kg
    }

    pub fn height_cm(&self) -> Option<f64> {
        self.height_cm
    }

    pub fn bmi(&self) -> Option<f64> {
        self.bmi
    }

    pub fn set_weight_kg(&mut self, weight_kg: Option<f64>) {
        self.weight_kg = weight_kg;
        self.rederive();
    }

    pub fn set_height_cm(&mut self, height_cm: Option<f64>) {
        self.height_cm = height_cm;
        self.rederive();
    }

    pub fn with_weight_kg(mut self, weight_kg: f64) -> Self {
        self.set_weight_kg(Some(weight_kg));
        self
    }

    pub fn with_height_cm(mut self, height_cm: f64) -> Self {
        self.set_height_cm(Some(height_cm));
        self
    }

    pub(crate) fn rederive(&mut self) {
        self.bmi = compute_bmi(self.weight_kg, self.height_cm);
    }
}

/// Diagnostic codes attached to a consultation.
///
/// A set under case-normalized comparison: inserting `i49.9` next to `I49.9` is a no-op.
/// Insertion order is kept for display, but equality ignores it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<DiagnosticCode>", into = "Vec<DiagnosticCode>")]
pub struct DiagnosticCodes(Vec<DiagnosticCode>);

impl DiagnosticCodes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `code`, returning `false` if an equal code was already present.
    pub fn insert(&mut self, code: DiagnosticCode) -> bool {
        if self.0.contains(&code) {
            return false;
        }
        self.0.push(code);
        true
    }

    /// Normalizes and adds a raw code string.
    ///
    /// # Errors
    ///
    /// Returns `TextError::Empty` for a blank code.
    pub fn insert_str(&mut self, raw: &str) -> Result<bool, TextError> {
        Ok(self.insert(DiagnosticCode::new(raw)?))
    }

    pub fn contains(&self, raw: &str) -> bool {
        DiagnosticCode::new(raw)
            .map(|code| self.0.contains(&code))
            .unwrap_or(false)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DiagnosticCode> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl PartialEq for DiagnosticCodes {
    fn eq(&self, other: &Self) -> bool {
        self.0.len() == other.0.len() && self.0.iter().all(|code| other.0.contains(code))
    }
}

impl From<Vec<DiagnosticCode>> for DiagnosticCodes {
    fn from(codes: Vec<DiagnosticCode>) -> Self {
        let mut set = DiagnosticCodes::new();
        for code in codes {
            set.insert(code);
        }
        set
    }
}

impl From<DiagnosticCodes> for Vec<DiagnosticCode> {
    fn from(codes: DiagnosticCodes) -> Self {
        codes.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prescription {
    pub medication: String,
    #[serde(default)]
    pub dosage: String,
    #[serde(default)]
    pub instructions: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamRequest {
    pub exam_name: String,
    #[serde(default)]
    pub justification: Option<String>,
    #[serde(default)]
    pub urgent: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Referral {
    pub specialty: String,
    #[serde(default)]
    pub reason: Option<String>,
}

/// A consultation as filled in by the physician.
///
/// Prescriptions, exam requests and referrals are append-only while the consultation is
/// pending; once the record store appends it, the whole consultation is an immutable snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consultation {
    /// When the consultation happened; the append time is used when absent.
    #[serde(default)]
    pub date_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub physician: Physician,
    #[serde(default)]
    pub chief_complaint: String,
    #[serde(default)]
    pub history_of_present_illness: Option<String>,
    #[serde(default)]
    pub physical_exam: Option<String>,
    #[serde(default)]
    pub vitals: VitalSigns,
    #[serde(default)]
    pub diagnostic_hypothesis: Option<String>,
    #[serde(default)]
    pub definitive_diagnosis: Option<String>,
    #[serde(default)]
    pub diagnostic_codes: DiagnosticCodes,
    #[serde(default)]
    pub conduct: String,
    #[serde(default)]
    pub(crate) prescriptions: Vec<Prescription>,
    #[serde(default)]
    pub(crate) exam_requests: Vec<ExamRequest>,
    #[serde(default)]
    pub(crate) referrals: Vec<Referral>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Consultation {
    pub fn add_prescription(&mut self, prescription: Prescription) {
        self.prescriptions.push(prescription);
    }

    pub fn add_exam_request(&mut self, request: ExamRequest) {
        self.exam_requests.push(request);
    }

    pub fn add_referral(&mut self, referral: Referral) {
        self.referrals.push(referral);
    }

    pub fn prescriptions(&self) -> &[Prescription] {
        &self.prescriptions
    }

    pub fn exam_requests(&self) -> &[ExamRequest] {
        &self.exam_requests
    }

    pub fn referrals(&self) -> &[Referral] {
        &self.referrals
    }

    /// Fills the defaults and derived fields at the moment the consultation is appended.
    pub(crate) fn finalize(mut self, appended_at: DateTime<Utc>) -> Self {
        self.date_time.get_or_insert(appended_at);
        self.vitals.rederive();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bmi_follows_weight_and_height_changes() {
        let mut vitals = VitalSigns::default();
        assert_eq!(vitals.bmi(), None);

        vitals.set_weight_kg(Some(70.0));
        assert_eq!(vitals.bmi(), None);

        vitals.set_height_cm(Some(175.0));
        assert_eq!(vitals.bmi(), Some(22.9));

        vitals.set_weight_kg(Some(80.0));
        assert_eq!(vitals.bmi(), Some(26.1));

        vitals.set_height_cm(None);
        assert_eq!(vitals.bmi(), None);
    }

    #[test]
    fn deserialization_ignores_caller_supplied_bmi() {
        let json = r#"{"weightKg": 70, "heightCm": 175, "bmi": 99.9}"#;
        let vitals: VitalSigns = serde_json::from_str(json).unwrap();
        assert_eq!(vitals.bmi(), Some(22.9));

        let json = r#"{"weightKg": 70, "bmi": 25.0}"#;
        let vitals: VitalSigns = serde_json::from_str(json).unwrap();
        assert_eq!(vitals.bmi(), None);
    }

    #[test]
    fn serialization_includes_derived_bmi() {
        let vitals = VitalSigns::default()
            .with_weight_kg(70.0)
            .with_height_cm(175.0);
        let json = serde_json::to_value(&vitals).unwrap();
        assert_eq!(json["bmi"], 22.9);
        assert_eq!(json["weightKg"], 70.0);
    }

    #[test]
    fn diagnostic_codes_are_unique_case_insensitively() {
        let mut codes = DiagnosticCodes::new();
        assert!(codes.insert_str("I49.9").unwrap());
        assert!(!codes.insert_str("i49.9").unwrap());
        assert!(!codes.insert_str("  I49.9 ").unwrap());
        assert_eq!(codes.len(), 1);
        assert!(codes.contains("i49.9"));
        assert!(codes.insert_str("").is_err());
    }

    #[test]
    fn diagnostic_codes_deserialize_without_duplicates() {
        let codes: DiagnosticCodes = serde_json::from_str(r#"["I10", "i10", "E11.9"]"#).unwrap();
        assert_eq!(codes.len(), 2);

        let json = serde_json::to_string(&codes).unwrap();
        assert_eq!(json, r#"["I10","E11.9"]"#);
    }

    #[test]
    fn diagnostic_code_equality_ignores_order() {
        let a: DiagnosticCodes = serde_json::from_str(r#"["I10", "E11.9"]"#).unwrap();
        let b: DiagnosticCodes = serde_json::from_str(r#"["e11.9", "i10"]"#).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn sub_lists_only_grow() {
        let mut consultation = Consultation::default();
        consultation.add_prescription(Prescription {
            medication: "Losartana 50mg".into(),
            dosage: "1 comprimido".into(),
            instructions: Some("pela manhã".into()),
        });
        consultation.add_exam_request(ExamRequest {
            exam_name: "Hemograma".into(),
            ..Default::default()
        });
        consultation.add_referral(Referral {
            specialty: "Cardiologia".into(),
            reason: None,
        });

        assert_eq!(consultation.prescriptions().len(), 1);
        assert_eq!(consultation.exam_requests().len(), 1);
        assert_eq!(consultation.referrals().len(), 1);
    }
}
