//! Pure helpers (no HTTP, no status logic).

use std::fmt;

use tracing::debug;

/// Longest error body kept in [`crate::PortalError::Http`].
pub(crate) const MAX_ERROR_BODY_CHARS: usize = 2000;

/// Cut an error body down to [`MAX_ERROR_BODY_CHARS`] characters.
pub(crate) fn truncate_body(body: &str) -> String {
    if body.chars().count() <= MAX_ERROR_BODY_CHARS {
        body.to_string()
    } else {
        let mut cut: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
        cut.push('…');
        cut
    }
}

/// Body for [`crate::PortalError::Http`]; empty when the body could not be read.
pub(crate) fn error_body<E: fmt::Display>(status: u16, read: Result<String, E>) -> String {
    match read {
        Ok(body) => truncate_body(&body),
        Err(e) => {
            debug!(status, error = %e, "failed to read error response body");
            String::new()
        }
    }
}

/// Whether a GraphQL error is the backend's "patient has no radiographs" signal.
///
/// Matches `sin radiografias` ignoring case and accents.
pub(crate) fn is_no_radiographs_error(message: &str) -> bool {
    fold_accents(&message.to_lowercase()).contains("sin radiografias")
}

fn fold_accents(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            'á' | 'à' | 'ä' => 'a',
            'é' | 'è' | 'ë' => 'e',
            'í' | 'ì' | 'ï' => 'i',
            'ó' | 'ò' | 'ö' => 'o',
            'ú' | 'ù' | 'ü' => 'u',
            other => other,
        })
        .collect()
}
