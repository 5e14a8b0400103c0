//! Demo cases shown when the backend cannot be reached.

use crate::case::{CaseRecord, CaseStatus, ModelResult};

/// Prefix of every placeholder case id.
pub const PLACEHOLDER_PREFIX: &str = "placeholder-";

/// Three fixed cases: two urgent, one routine.
pub fn placeholder_cases() -> Vec<CaseRecord> {
    vec![
        placeholder(
            "001",
            "P001",
            "Juan Pérez",
            "2025-01-15T10:30:00Z",
            "Neumonía",
            0.85,
        ),
        placeholder(
            "002",
            "P002",
            "María García",
            "2025-01-14T14:20:00Z",
            "Normal",
            0.25,
        ),
        placeholder(
            "003",
            "P003",
            "Carlos López",
            "2025-01-13T09:15:00Z",
            "Neumonía",
            0.72,
        ),
    ]
}

/// Whether a record came from [`placeholder_cases`].
pub fn is_placeholder(case: &CaseRecord) -> bool {
    case.id.starts_with(PLACEHOLDER_PREFIX)
}

fn placeholder(
    suffix: &str,
    patient_id: &str,
    patient_name: &str,
    uploaded_at: &str,
    label: &str,
    probability: f64,
) -> CaseRecord {
    CaseRecord {
        id: format!("{PLACEHOLDER_PREFIX}{suffix}"),
        patient_id: Some(patient_id.to_string()),
        patient_name: Some(patient_name.to_string()),
        patient_email: None,
        uploaded_at: uploaded_at.to_string(),
        status: CaseStatus::Processed,
        raw_status: Some("procesado".to_string()),
        image_url: None,
        assigned_doctor: None,
        reported_urgency: None,
        model_result: Some(ModelResult {
            pneumonia_probability: Some(probability),
            label: Some(label.to_string()),
            processed_at: None,
        }),
        review: None,
    }
}
