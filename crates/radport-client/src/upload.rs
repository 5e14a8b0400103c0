//! Radiograph upload payloads.

use std::path::Path;

use crate::error::{PortalError, PortalResult};

/// Largest accepted image, in bytes.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// An image ready to be sent.
#[derive(Debug, Clone)]
pub struct RadiographUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl RadiographUpload {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Read an image from disk. The content type is guessed from the
    /// extension unless given.
    pub async fn from_path(path: &Path, content_type: Option<&str>) -> PortalResult<Self> {
        let bytes = tokio::fs::read(path).await.map_err(|e| PortalError::Config {
            message: format!("failed to read {}: {}", path.display(), e),
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "radiograph".to_string());
        let content_type = content_type
            .map(String::from)
            .unwrap_or_else(|| guess_content_type(path).to_string());

        Ok(Self::new(file_name, content_type, bytes))
    }

    /// All problems with the upload; empty when it may be sent.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if !self.content_type.starts_with("image/") {
            errors.push(format!(
                "Only image files can be uploaded (got {})",
                self.content_type
            ));
        }
        if self.bytes.is_empty() {
            errors.push("The selected file is empty".to_string());
        }
        if self.bytes.len() > MAX_UPLOAD_BYTES {
            errors.push(format!(
                "The image size exceeds the limit ({:.2} MB > 10 MB)",
                self.bytes.len() as f64 / 1024.0 / 1024.0
            ));
        }
        errors
    }
}

fn guess_content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "webp" => "image/webp",
        "tif" | "tiff" => "image/tiff",
        "dcm" => "application/dicom",
        _ => "application/octet-stream",
    }
}
