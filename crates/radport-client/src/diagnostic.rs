//! Doctor review submission.

use serde::{Deserialize, Serialize};

/// Minimum comment length after trimming.
pub const MIN_COMMENT_CHARS: usize = 10;

/// Maximum comment length.
pub const MAX_COMMENT_CHARS: usize = 1000;

/// Whether the doctor agrees with the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Approval {
    #[serde(rename = "Si")]
    Approve,
    #[serde(rename = "No")]
    Reject,
}

impl Approval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approve => "Si",
            Self::Reject => "No",
        }
    }
}

/// The review form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticPayload {
    #[serde(rename = "aprobacion")]
    pub approval: Approval,

    #[serde(rename = "comentario")]
    pub comment: String,
}

impl DiagnosticPayload {
    pub fn new(approval: Approval, comment: impl Into<String>) -> Self {
        Self {
            approval,
            comment: comment.into(),
        }
    }

    /// All problems with the form; empty when it may be sent.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.comment.trim().chars().count() < MIN_COMMENT_CHARS {
            errors.push(format!(
                "The medical comment must be at least {MIN_COMMENT_CHARS} characters"
            ));
        }
        if self.comment.chars().count() > MAX_COMMENT_CHARS {
            errors.push(format!(
                "The medical comment cannot exceed {MAX_COMMENT_CHARS} characters"
            ));
        }
        errors
    }
}

/// Backend acknowledgement of a submitted review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticReceipt {
    pub success: bool,
    pub message: String,
}

impl Default for DiagnosticReceipt {
    fn default() -> Self {
        Self {
            success: true,
            message: "Diagnostic submitted".to_string(),
        }
    }
}

/// Wire form of `createDiagnostic`; both fields may be missing.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct RawReceipt {
    #[serde(default)]
    pub success: Option<bool>,

    #[serde(default)]
    pub message: Option<String>,
}

impl RawReceipt {
    pub(crate) fn into_receipt(self) -> DiagnosticReceipt {
        let default = DiagnosticReceipt::default();
        DiagnosticReceipt {
            success: self.success.unwrap_or(default.success),
            message: self
                .message
                .filter(|m| !m.is_empty())
                .unwrap_or(default.message),
        }
    }
}
