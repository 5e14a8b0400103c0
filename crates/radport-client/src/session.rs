//! Explicit authentication context.
//!
//! The portal front end kept the bearer token and the user role in two
//! cookies (`auth-token`, `user-role`). Here they travel as a [`Session`]
//! value handed to every client call instead of being read from ambient
//! state.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Cookie carrying the bearer token.
pub const TOKEN_COOKIE: &str = "auth-token";

/// Cookie carrying the user role.
pub const ROLE_COOKIE: &str = "user-role";

/// Portal user role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "paciente")]
    Patient,
    #[serde(rename = "doctor")]
    Doctor,
}

impl Role {
    /// Wire label used by the backend and the role cookie.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Patient => "paciente",
            Self::Doctor => "doctor",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "paciente" | "patient" => Ok(Self::Patient),
            "doctor" => Ok(Self::Doctor),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Authentication state for one user.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Session {
    token: Option<String>,
    role: Option<Role>,
}

impl Session {
    /// Session without credentials.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Session from explicit parts. Empty tokens count as absent.
    pub fn new(token: Option<String>, role: Option<Role>) -> Self {
        Self {
            token: token.filter(|t| !t.is_empty()),
            role,
        }
    }

    /// Parse a `Cookie:` header value (`a=1; b=2`).
    pub fn from_cookie_header(header: &str) -> Self {
        let mut token = None;
        let mut role = None;

        for pair in header.split(';') {
            let Some((name, value)) = pair.trim().split_once('=') else {
                continue;
            };
            match name.trim() {
                TOKEN_COOKIE => token = Some(value.trim().to_string()),
                ROLE_COOKIE => role = value.trim().parse().ok(),
                _ => {}
            }
        }

        Self::new(token, role)
    }

    /// Create from environment.
    ///
    /// Checks in order:
    /// 1. `RADPORT_COOKIE` - a cookie header as saved by `radport login`
    /// 2. `RADPORT_TOKEN` / `RADPORT_ROLE`
    pub fn from_env() -> Self {
        if let Ok(cookie) = std::env::var("RADPORT_COOKIE") {
            let session = Self::from_cookie_header(&cookie);
            if session.is_authenticated() {
                return session;
            }
        }

        let token = std::env::var("RADPORT_TOKEN").ok();
        let role = std::env::var("RADPORT_ROLE")
            .ok()
            .and_then(|r| r.parse().ok());
        Self::new(token, role)
    }

    /// Render the session back into a cookie header.
    pub fn to_cookie_header(&self) -> String {
        let mut parts = Vec::new();
        if let Some(token) = &self.token {
            parts.push(format!("{TOKEN_COOKIE}={token}"));
        }
        if let Some(role) = self.role {
            parts.push(format!("{ROLE_COOKIE}={role}"));
        }
        parts.join("; ")
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    /// `Authorization` header value, if a token is present.
    pub fn bearer(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {t}"))
    }

    /// Check if a token is present.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Fill in a token from configuration when the session has none.
    pub(crate) fn or_token(&self, fallback: Option<&str>) -> Session {
        match (&self.token, fallback) {
            (None, Some(t)) => Session::new(Some(t.to_string()), self.role),
            _ => self.clone(),
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("role", &self.role)
            .finish()
    }
}

/// The user a session belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Option<Role>,
}
