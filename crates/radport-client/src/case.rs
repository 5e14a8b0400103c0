//! Case records and their normalization from backend payloads.
//!
//! The backend has spoken several dialects over time (Spanish GraphQL field
//! names, an English REST listing, flattened dashboard records). [`RawCase`]
//! reads all of them by trying each field's known names in order;
//! [`RawCase::normalize`] turns the result into the one [`CaseRecord`] shape
//! the UI works with.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::types::id_to_string;

/// Probability above which a case is flagged urgent.
pub const URGENT_PROBABILITY: f64 = 0.7;

/// Lifecycle state of a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CaseStatus {
    #[serde(rename = "subido")]
    Uploaded,
    #[serde(rename = "procesado")]
    Processed,
    #[serde(rename = "validado")]
    Validated,
}

impl CaseStatus {
    /// Derive the status from the backend's free-text field.
    ///
    /// Case-insensitive substring match: `valid…` wins over `proces…`,
    /// anything else counts as merely uploaded.
    pub fn normalize(raw: &str) -> Self {
        let lowered = raw.to_lowercase();
        if lowered.contains("valid") {
            Self::Validated
        } else if lowered.contains("proces") {
            Self::Processed
        } else {
            Self::Uploaded
        }
    }

    /// Display label used across the portal.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Uploaded => "subido",
            Self::Processed => "procesado",
            Self::Validated => "validado",
        }
    }
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Triage level, as reported by the backend or derived from the model output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Routine,
    Urgent,
}

impl Urgency {
    /// Parse a backend label; unknown labels yield `None`.
    pub fn from_label(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "urgent" | "urgente" => Some(Self::Urgent),
            "routine" | "rutina" | "rutinario" => Some(Self::Routine),
            _ => None,
        }
    }

    /// The reported level when there is one, else the probability threshold.
    pub fn resolve(reported: Option<Self>, probability: Option<f64>) -> Self {
        match (reported, probability) {
            (Some(level), _) => level,
            (None, Some(p)) if p > URGENT_PROBABILITY => Self::Urgent,
            _ => Self::Routine,
        }
    }
}

/// What the model label says, independent of spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finding {
    Pneumonia,
    Normal,
    Indeterminate,
}

/// Automated model output attached to a case (the prediagnostic).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelResult {
    /// Pneumonia probability in `[0, 1]`.
    pub pneumonia_probability: Option<f64>,
    pub label: Option<String>,
    pub processed_at: Option<String>,
}

impl ModelResult {
    pub fn finding(&self) -> Finding {
        match self.label.as_deref().map(|l| l.trim().to_lowercase()) {
            Some(l) if l == "neumonía" || l == "neumonia" || l == "pneumonia" => {
                Finding::Pneumonia
            }
            Some(l) if l == "normal" => Finding::Normal,
            _ => Finding::Indeterminate,
        }
    }

    fn is_empty(&self) -> bool {
        self.pneumonia_probability.is_none() && self.label.is_none() && self.processed_at.is_none()
    }
}

/// Doctor's recorded decision on a prediagnostic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorReview {
    pub approved: Option<bool>,
    pub comment: Option<String>,
    pub reviewer: Option<String>,
    pub reviewed_at: Option<String>,
}

impl DoctorReview {
    fn is_empty(&self) -> bool {
        self.approved.is_none()
            && self.comment.is_none()
            && self.reviewer.is_none()
            && self.reviewed_at.is_none()
    }
}

/// UI-ready case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseRecord {
    pub id: String,
    pub patient_id: Option<String>,
    pub patient_name: Option<String>,
    pub patient_email: Option<String>,
    pub uploaded_at: String,
    pub status: CaseStatus,
    /// Status text exactly as the backend sent it.
    pub raw_status: Option<String>,
    pub image_url: Option<String>,
    pub assigned_doctor: Option<String>,
    /// Urgency the backend set explicitly, if any.
    #[serde(default)]
    pub reported_urgency: Option<Urgency>,
    pub model_result: Option<ModelResult>,
    pub review: Option<DoctorReview>,
}

impl CaseRecord {
    pub fn pneumonia_probability(&self) -> Option<f64> {
        self.model_result
            .as_ref()
            .and_then(|m| m.pneumonia_probability)
    }

    pub fn urgency(&self) -> Urgency {
        Urgency::resolve(self.reported_urgency, self.pneumonia_probability())
    }
}

/// Model output as any backend version sent it.
#[derive(Debug, Clone, Default)]
pub struct RawModelResult {
    pub probability: Option<f64>,
    pub label: Option<String>,
    pub processed_at: Option<String>,
}

impl RawModelResult {
    fn from_fields(fields: Fields<'_>) -> Self {
        Self {
            probability: fields.number(&["probNeumonia", "probability", "prob_neumonia"]),
            label: fields.string(&["etiqueta", "label"]),
            processed_at: fields.string(&["fechaProcesamiento", "processedAt", "processedDate"]),
        }
    }
}

/// Doctor review as any backend version sent it.
#[derive(Debug, Clone, Default)]
pub struct RawReview {
    pub approved: Option<bool>,
    pub comment: Option<String>,
    pub reviewer: Option<String>,
    pub reviewed_at: Option<String>,
}

impl RawReview {
    fn from_fields(fields: Fields<'_>) -> Self {
        Self {
            approved: fields.approval(&["aprobacion", "approved", "approval"]),
            comment: fields.string(&["comentario", "comment"]),
            reviewer: fields.string(&["doctorNombre", "doctor", "reviewer"]),
            reviewed_at: fields.string(&["fechaRevision", "reviewedAt"]),
        }
    }
}

/// A case in whatever dialect the backend used.
///
/// Each field lists the names it may travel under; the first one holding
/// a usable value wins, so redundant keys (`id` next to
/// `prediagnostic_id`) are harmless. Values of an unexpected type are
/// treated as absent.
#[derive(Debug, Clone, Default)]
pub struct RawCase {
    pub id: Option<String>,
    pub patient_id: Option<String>,
    pub patient_name: Option<String>,
    pub patient_email: Option<String>,
    pub uploaded_at: Option<String>,
    pub status: Option<String>,
    pub image_url: Option<String>,
    pub assigned_doctor: Option<String>,
    pub urgency: Option<Urgency>,
    pub model_result: Option<RawModelResult>,
    pub ai_confidence: Option<f64>,
    pub ai_diagnosis: Option<String>,
    pub processed_date: Option<String>,
    pub review: Option<RawReview>,
    pub doctor_report: Option<String>,
    pub doctor_name: Option<String>,
    pub validated_date: Option<String>,
}

impl RawCase {
    /// Read every known field out of a JSON object. Never fails.
    pub fn from_object(object: &Map<String, Value>) -> Self {
        let fields = Fields(object);
        Self {
            id: fields.string(&["id", "radiografia_id", "prediagnostic_id", "caseId"]),
            patient_id: fields.string(&["pacienteId", "patientId", "paciente_id"]),
            patient_name: fields.string(&["pacienteNombre", "patientName"]),
            patient_email: fields.string(&["pacienteEmail", "patientEmail"]),
            uploaded_at: fields.string(&["fechaSubida", "caseDate", "uploadDate", "fecha_subida"]),
            status: fields.string(&["estado", "currentStatus", "status"]),
            image_url: fields.string(&["urlRadiografia", "urlrad", "imageUrl"]),
            assigned_doctor: fields.string(&["doctorAsignado", "assignedDoctor"]),
            urgency: fields.urgency(&["urgencia", "urgency"]),
            model_result: fields
                .object(&["resultados", "resultadosModelo", "modelResult"])
                .map(RawModelResult::from_fields),
            ai_confidence: fields.number(&["aiConfidence"]),
            ai_diagnosis: fields.string(&["aiDiagnosis", "resultado_preliminar"]),
            processed_date: fields.string(&["processedDate"]),
            review: fields
                .object(&["diagnostico", "diagnostic", "review"])
                .map(RawReview::from_fields),
            doctor_report: fields.string(&["doctorReport"]),
            doctor_name: fields.string(&["doctorName"]),
            validated_date: fields.string(&["validatedDate"]),
        }
    }

    /// Map onto the fixed record shape. Never fails.
    pub fn normalize(self) -> CaseRecord {
        let nested = self.model_result.unwrap_or_default();
        let probability = nested
            .probability
            .or(self.ai_confidence)
            .and_then(|p| checked_probability(p, self.id.as_deref()));
        let model_result = ModelResult {
            pneumonia_probability: probability,
            label: nested.label.or(self.ai_diagnosis),
            processed_at: nested.processed_at.or(self.processed_date),
        };

        let nested = self.review.unwrap_or_default();
        let review = DoctorReview {
            approved: nested.approved,
            comment: nested.comment.or(self.doctor_report),
            reviewer: nested.reviewer.or(self.doctor_name),
            reviewed_at: nested.reviewed_at.or(self.validated_date),
        };

        CaseRecord {
            id: self.id.unwrap_or_default(),
            patient_id: self.patient_id,
            patient_name: self.patient_name,
            patient_email: self.patient_email,
            uploaded_at: self.uploaded_at.unwrap_or_default(),
            status: CaseStatus::normalize(self.status.as_deref().unwrap_or_default()),
            raw_status: self.status,
            image_url: self.image_url,
            assigned_doctor: self.assigned_doctor,
            reported_urgency: self.urgency,
            model_result: (!model_result.is_empty()).then_some(model_result),
            review: (!review.is_empty()).then_some(review),
        }
    }
}

impl<'de> Deserialize<'de> for RawCase {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Object(object) => Ok(Self::from_object(&object)),
            _ => Err(de::Error::custom("case must be a JSON object")),
        }
    }
}

/// Name-resolving view over one JSON object.
#[derive(Clone, Copy)]
struct Fields<'a>(&'a Map<String, Value>);

impl<'a> Fields<'a> {
    /// First value among `keys` that `convert` accepts.
    fn first<T>(&self, keys: &[&str], convert: impl Fn(&'a Value) -> Option<T>) -> Option<T> {
        keys.iter()
            .filter_map(|key| self.0.get(*key))
            .find_map(convert)
    }

    fn string(&self, keys: &[&str]) -> Option<String> {
        self.first(keys, id_to_string)
    }

    fn number(&self, keys: &[&str]) -> Option<f64> {
        self.first(keys, |value| match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
    }

    fn approval(&self, keys: &[&str]) -> Option<bool> {
        self.first(keys, |value| match value {
            Value::Bool(b) => Some(*b),
            Value::String(s) => match s.trim().to_lowercase().as_str() {
                "si" | "sí" | "yes" | "true" | "approved" | "aprobado" => Some(true),
                "no" | "false" | "rejected" | "rechazado" => Some(false),
                _ => None,
            },
            _ => None,
        })
    }

    fn urgency(&self, keys: &[&str]) -> Option<Urgency> {
        self.first(keys, |value| value.as_str().and_then(Urgency::from_label))
    }

    fn object(&self, keys: &[&str]) -> Option<Fields<'a>> {
        self.first(keys, |value| value.as_object().map(Fields))
    }
}

fn checked_probability(p: f64, case_id: Option<&str>) -> Option<f64> {
    if p.is_finite() && (0.0..=1.0).contains(&p) {
        Some(p)
    } else {
        warn!(case_id = ?case_id, probability = p, "dropping out-of-range pneumonia probability");
        None
    }
}

/// Normalize a list payload.
///
/// Anything but an array yields an empty list; elements that are not
/// objects are skipped.
pub fn normalize_cases(value: &Value) -> Vec<CaseRecord> {
    let Some(items) = value.as_array() else {
        if !value.is_null() {
            warn!("case list is not an array; treating as empty");
        }
        return Vec::new();
    };

    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let case = normalize_case(item);
            if case.is_none() {
                warn!(index, "skipping case entry");
            }
            case
        })
        .collect()
}

/// Normalize a single case object.
pub fn normalize_case(value: &Value) -> Option<CaseRecord> {
    value
        .as_object()
        .map(|object| RawCase::from_object(object).normalize())
}

/// Render a backend timestamp as `DD/MM/YYYY HH:MM`, or return it untouched.
pub fn format_timestamp(raw: &str) -> String {
    const OUT: &str = "%d/%m/%Y %H:%M";
    let trimmed = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return dt.format(OUT).to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format(OUT).to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return dt.format(OUT).to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return dt.format(OUT).to_string();
        }
    }
    raw.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_normalization() {
        assert_eq!(CaseStatus::normalize("Validado").label(), "validado");
        assert_eq!(CaseStatus::normalize("Procesado").label(), "procesado");
        assert_eq!(CaseStatus::normalize("PROCESSED").label(), "procesado");
        assert_eq!(CaseStatus::normalize("validated by doctor").label(), "validado");
        assert_eq!(CaseStatus::normalize("pendiente").label(), "subido");
        assert_eq!(CaseStatus::normalize("").label(), "subido");
    }

    #[test]
    fn test_status_valid_wins_over_proces() {
        assert_eq!(
            CaseStatus::normalize("procesado y validado"),
            CaseStatus::Validated
        );
    }

    #[test]
    fn test_normalize_graphql_case() {
        let value = json!({
            "id": "rad-7",
            "pacienteId": "P001",
            "pacienteNombre": "Juan Pérez",
            "pacienteEmail": "juan@example.com",
            "fechaSubida": "2024-01-15",
            "estado": "Validado",
            "urlRadiografia": "https://img.example/rad-7.png",
            "resultados": {
                "probNeumonia": 0.91,
                "etiqueta": "Neumonía",
                "fechaProcesamiento": "2024-01-15T10:00:00Z"
            },
            "doctorAsignado": "Dra. Ruiz"
        });

        let case = normalize_case(&value).unwrap();
        assert_eq!(case.id, "rad-7");
        assert_eq!(case.status.label(), "validado");
        assert_eq!(case.raw_status.as_deref(), Some("Validado"));
        assert_eq!(case.uploaded_at, "2024-01-15");
        assert_eq!(case.assigned_doctor.as_deref(), Some("Dra. Ruiz"));
        let model = case.model_result.as_ref().unwrap();
        assert_eq!(model.pneumonia_probability, Some(0.91));
        assert_eq!(model.finding(), Finding::Pneumonia);
        assert_eq!(case.urgency(), Urgency::Urgent);
        assert!(case.review.is_none());
    }

    #[test]
    fn test_normalize_rest_case() {
        let value = json!({
            "id": "case-002",
            "patientId": "P002",
            "caseDate": "2025-01-14T14:20:00Z",
            "currentStatus": "procesado",
            "aiDiagnosis": "Normal",
            "aiConfidence": 0.25
        });

        let case = normalize_case(&value).unwrap();
        assert_eq!(case.patient_id.as_deref(), Some("P002"));
        assert_eq!(case.status, CaseStatus::Processed);
        let model = case.model_result.unwrap();
        assert_eq!(model.label.as_deref(), Some("Normal"));
        assert_eq!(model.finding(), Finding::Normal);
        assert_eq!(model.pneumonia_probability, Some(0.25));
    }

    #[test]
    fn test_normalize_prediagnostic_shape() {
        let value = json!({
            "prediagnostic_id": 42,
            "pacienteId": 7,
            "estado": "procesado",
            "urlrad": "https://img.example/42.png",
            "resultadosModelo": { "probNeumonia": "0.64", "etiqueta": "normal" },
            "fechaSubida": "2024-03-01T08:00:00Z"
        });

        let case = normalize_case(&value).unwrap();
        assert_eq!(case.id, "42");
        assert_eq!(case.patient_id.as_deref(), Some("7"));
        assert_eq!(case.image_url.as_deref(), Some("https://img.example/42.png"));
        assert_eq!(case.pneumonia_probability(), Some(0.64));
        assert_eq!(case.urgency(), Urgency::Routine);
    }

    #[test]
    fn test_missing_optional_fields_become_none() {
        let case = normalize_case(&json!({ "estado": "Validado", "fechaSubida": "2024-01-15" }))
            .unwrap();
        assert_eq!(case.status.label(), "validado");
        assert_eq!(case.id, "");
        assert!(case.patient_id.is_none());
        assert!(case.model_result.is_none());
        assert!(case.review.is_none());
    }

    #[test]
    fn test_wrongly_typed_fields_are_absent() {
        let case = normalize_case(&json!({
            "id": "x",
            "estado": ["not", "a", "string"],
            "resultados": "pending",
            "aiConfidence": { "value": 1 }
        }))
        .unwrap();
        assert_eq!(case.status, CaseStatus::Uploaded);
        assert!(case.raw_status.is_none());
        assert!(case.model_result.is_none());
    }

    #[test]
    fn test_out_of_range_probability_dropped() {
        let case = normalize_case(&json!({
            "id": "x",
            "resultados": { "probNeumonia": 85, "etiqueta": "Neumonía" }
        }))
        .unwrap();
        let model = case.model_result.unwrap();
        assert_eq!(model.pneumonia_probability, None);
        assert_eq!(model.label.as_deref(), Some("Neumonía"));
    }

    #[test]
    fn test_review_nested_and_flat() {
        let nested = normalize_case(&json!({
            "id": "a",
            "diagnostico": {
                "aprobacion": "Si",
                "comentario": "Consolidación en lóbulo inferior derecho",
                "doctorNombre": "Dr. Gómez",
                "fechaRevision": "2024-02-01T09:30:00Z"
            }
        }))
        .unwrap();
        let review = nested.review.unwrap();
        assert_eq!(review.approved, Some(true));
        assert_eq!(review.reviewer.as_deref(), Some("Dr. Gómez"));

        let flat = normalize_case(&json!({
            "id": "b",
            "doctorReport": "Sin hallazgos",
            "doctorName": "Dra. Ruiz",
            "validatedDate": "2024-02-02"
        }))
        .unwrap();
        let review = flat.review.unwrap();
        assert_eq!(review.approved, None);
        assert_eq!(review.comment.as_deref(), Some("Sin hallazgos"));
        assert_eq!(review.reviewed_at.as_deref(), Some("2024-02-02"));
    }

    #[test]
    fn test_normalize_cases_skips_non_objects() {
        let cases = normalize_cases(&json!([{ "id": "1" }, 5, null, { "id": "2" }]));
        let ids: Vec<_> = cases.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn test_normalize_cases_non_array_is_empty() {
        assert!(normalize_cases(&json!({ "id": "1" })).is_empty());
        assert!(normalize_cases(&Value::Null).is_empty());
    }

    #[test]
    fn test_redundant_keys_keep_the_record() {
        let cases = normalize_cases(&json!([
            { "id": "pd-1", "prediagnostic_id": "pd-1", "estado": "Validado" },
            { "id": "c-2", "status": "procesado", "currentStatus": "procesado" },
            { "id": "ok" }
        ]));

        let ids: Vec<_> = cases.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["pd-1", "c-2", "ok"]);
        assert_eq!(cases[0].status, CaseStatus::Validated);
        assert_eq!(cases[1].status, CaseStatus::Processed);
    }

    #[test]
    fn test_first_usable_name_wins() {
        // estado is listed first; a null or mistyped value falls through
        let case = normalize_case(&json!({
            "estado": null,
            "currentStatus": ["procesado"],
            "status": "Validado",
            "id": "",
            "radiografia_id": "rad-9"
        }))
        .unwrap();
        assert_eq!(case.status, CaseStatus::Validated);
        assert_eq!(case.id, "rad-9");

        let case = normalize_case(&json!({ "estado": "Procesado", "status": "Validado" })).unwrap();
        assert_eq!(case.status, CaseStatus::Processed);
    }

    #[test]
    fn test_raw_case_deserializes_with_redundant_keys() {
        let raw: RawCase = serde_json::from_value(json!({
            "caseId": "c-1",
            "id": "c-1",
            "resultados": { "probNeumonia": 0.4, "probability": 0.4 }
        }))
        .unwrap();
        assert_eq!(raw.id.as_deref(), Some("c-1"));
        assert_eq!(raw.model_result.unwrap().probability, Some(0.4));

        assert!(serde_json::from_value::<RawCase>(json!([1, 2])).is_err());
    }

    #[test]
    fn test_reported_urgency_wins_over_probability() {
        let case = normalize_case(&json!({ "id": "c", "aiConfidence": 0.5, "urgency": "urgent" }))
            .unwrap();
        assert_eq!(case.reported_urgency, Some(Urgency::Urgent));
        assert_eq!(case.urgency(), Urgency::Urgent);

        let case = normalize_case(&json!({ "id": "d", "aiConfidence": 0.9, "urgency": "routine" }))
            .unwrap();
        assert_eq!(case.urgency(), Urgency::Routine);

        // unknown labels fall back to the threshold
        let case = normalize_case(&json!({ "id": "e", "aiConfidence": 0.9, "urgency": "asap" }))
            .unwrap();
        assert!(case.reported_urgency.is_none());
        assert_eq!(case.urgency(), Urgency::Urgent);
    }

    #[test]
    fn test_processed_date_fills_processed_at() {
        let case = normalize_case(&json!({
            "id": "c",
            "aiDiagnosis": "Normal",
            "processedDate": "2025-01-14T15:00:00Z"
        }))
        .unwrap();
        let model = case.model_result.unwrap();
        assert_eq!(model.processed_at.as_deref(), Some("2025-01-14T15:00:00Z"));
    }

    #[test]
    fn test_status_serializes_as_label() {
        assert_eq!(
            serde_json::to_value(CaseStatus::Processed).unwrap(),
            json!("procesado")
        );
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp("2025-01-15T10:30:00Z"), "15/01/2025 10:30");
        assert_eq!(format_timestamp("2025-01-15T10:30:00.123"), "15/01/2025 10:30");
        assert_eq!(format_timestamp("2024-01-15"), "15/01/2024 00:00");
        assert_eq!(format_timestamp("ayer"), "ayer");
    }
}
