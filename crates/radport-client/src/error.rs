//! Error types for the portal client.

/// Portal errors.
///
/// Every variant renders to a message a UI can show as-is via
/// [`PortalError::user_message`].
#[derive(Debug, thiserror::Error)]
pub enum PortalError {
    /// The request never produced a response (DNS, connect, timeout, body read).
    #[error("network error: {message}")]
    Network { message: String },

    /// The backend answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The response carried a GraphQL `errors` array.
    #[error("GraphQL error: {message}")]
    GraphQl { message: String },

    /// The response body could not be interpreted.
    #[error("invalid response: {message}")]
    InvalidResponse { message: String },

    /// The operation needs a bearer token and the session has none.
    #[error("not authenticated")]
    Unauthenticated,

    /// Input rejected locally before any request was sent.
    #[error("validation failed: {}", errors.join("; "))]
    Validation { errors: Vec<String> },

    /// Configuration error.
    #[error("configuration error: {message}")]
    Config { message: String },
}

impl PortalError {
    /// Message suitable for an error panel.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network { .. } => {
                "Could not reach the server. Check your connection and try again.".to_string()
            }
            Self::Http { status: 401, .. } | Self::Http { status: 403, .. } => {
                "Your session has expired. Please sign in again.".to_string()
            }
            Self::Http { status, body } if body.trim().is_empty() => {
                format!("The server returned an error (HTTP {status}).")
            }
            Self::Http { status, body } => {
                format!("The server returned an error (HTTP {status}): {}", body.trim())
            }
            Self::GraphQl { message } => message.clone(),
            Self::InvalidResponse { .. } => {
                "The server sent a response that could not be read.".to_string()
            }
            Self::Unauthenticated => "Not authenticated. Please sign in again.".to_string(),
            Self::Validation { errors } => errors.join("\n"),
            Self::Config { message } => format!("Configuration problem: {message}"),
        }
    }

    /// Exit code for CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Validation { .. } => 1,
            Self::Config { .. } => 2,

            // Auth issues
            Self::Unauthenticated => 3,
            Self::Http { status: 401, .. } | Self::Http { status: 403, .. } => 3,

            // Backend answered, but not with what we asked for
            Self::Http { .. } => 4,
            Self::GraphQl { .. } => 4,
            Self::InvalidResponse { .. } => 4,

            Self::Network { .. } => 5,
        }
    }

    /// Whether a manual retry has a reasonable chance of succeeding.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network { .. } => true,
            Self::Http { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for PortalError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network {
            message: err.to_string(),
        }
    }
}

/// Result type for portal operations.
pub type PortalResult<T> = Result<T, PortalError>;
