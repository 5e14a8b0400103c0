//! Single-case prediagnostic view.

use serde::{Deserialize, Serialize};

use crate::case::{CaseRecord, CaseStatus, ModelResult, Urgency};

/// Automated pre-review of one radiograph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreDiagnostic {
    pub id: String,
    pub patient_id: Option<String>,
    pub status: CaseStatus,
    pub image_url: Option<String>,
    pub uploaded_at: String,
    #[serde(default)]
    pub reported_urgency: Option<Urgency>,
    pub model_result: Option<ModelResult>,
}

impl PreDiagnostic {
    pub fn urgency(&self) -> Urgency {
        Urgency::resolve(
            self.reported_urgency,
            self.model_result
                .as_ref()
                .and_then(|m| m.pneumonia_probability),
        )
    }
}

impl From<CaseRecord> for PreDiagnostic {
    fn from(case: CaseRecord) -> Self {
        Self {
            id: case.id,
            patient_id: case.patient_id,
            status: case.status,
            image_url: case.image_url,
            uploaded_at: case.uploaded_at,
            reported_urgency: case.reported_urgency,
            model_result: case.model_result,
        }
    }
}
