//! Configuration and wire types for the portal backend.

use serde::{Deserialize, Serialize};

use crate::session::Role;

/// Portal client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalConfig {
    /// Base URL of the backend (REST endpoints hang off it directly).
    #[serde(default = "default_portal_url")]
    pub url: String,

    /// Path of the GraphQL endpoint, relative to `url`.
    #[serde(default = "default_graphql_path")]
    pub graphql_path: String,

    /// Static bearer token, used when no session token is supplied.
    #[serde(default)]
    pub token: Option<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_portal_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_graphql_path() -> String {
    "/query".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            url: default_portal_url(),
            graphql_path: default_graphql_path(),
            token: None,
            timeout_secs: default_timeout(),
        }
    }
}

impl PortalConfig {
    /// Create config from environment variables.
    ///
    /// | Variable | Description |
    /// |----------|-------------|
    /// | `RADPORT_URL` | Backend base URL |
    /// | `RADPORT_GRAPHQL_PATH` | GraphQL endpoint path |
    /// | `RADPORT_TOKEN` | Bearer token |
    /// | `RADPORT_TIMEOUT` | Request timeout in seconds |
    pub fn from_env() -> Self {
        Self {
            url: std::env::var("RADPORT_URL").unwrap_or_else(|_| default_portal_url()),
            graphql_path: std::env::var("RADPORT_GRAPHQL_PATH")
                .unwrap_or_else(|_| default_graphql_path()),
            token: std::env::var("RADPORT_TOKEN")
                .ok()
                .filter(|t| !t.is_empty()),
            timeout_secs: std::env::var("RADPORT_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_timeout),
        }
    }

    /// Set the token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the base URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Base URL without trailing slash.
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    /// Full URL of the GraphQL endpoint.
    pub fn graphql_url(&self) -> String {
        let path = self.graphql_path.trim_start_matches('/');
        format!("{}/{}", self.base_url(), path)
    }
}

/// Body of a GraphQL POST.
#[derive(Debug, Clone, Serialize)]
pub struct GraphQlRequest<'a> {
    pub query: &'a str,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<serde_json::Value>,
}

/// Body of `POST /auth`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub correo: &'a str,
    pub contrasena: &'a str,
}

/// Response of `POST /auth`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct LoginResponse {
    pub token: String,

    #[serde(default)]
    pub id: Option<serde_json::Value>,

    #[serde(default)]
    pub nombre: Option<serde_json::Value>,

    #[serde(default)]
    pub rol: Option<String>,
}

/// Response of `GET /validation`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ValidationResponse {
    #[serde(rename = "UserID", default)]
    pub user_id: Option<serde_json::Value>,

    #[serde(rename = "Name", default)]
    pub name: Option<String>,

    #[serde(rename = "Email", default)]
    pub email: Option<String>,

    #[serde(rename = "Role", default)]
    pub role: Option<String>,
}

/// New account submitted to `POST /register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
    #[serde(rename = "nombre_completo")]
    pub full_name: String,

    #[serde(rename = "edad")]
    pub age: u32,

    #[serde(rename = "rol")]
    pub role: Role,

    #[serde(rename = "identificacion")]
    pub identification: String,

    #[serde(rename = "correo")]
    pub email: String,

    #[serde(rename = "contrasena")]
    pub password: String,

    /// Consent to personal data processing; the backend refuses accounts without it.
    #[serde(rename = "acepta_tratamiento_datos")]
    pub accepts_data_processing: bool,
}

impl Registration {
    /// Collect every local problem with the form.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.full_name.trim().is_empty() {
            errors.push("Full name is required".to_string());
        }
        if !self.email.contains('@') {
            errors.push("A valid email address is required".to_string());
        }
        if self.password.is_empty() {
            errors.push("Password is required".to_string());
        }
        if !self.accepts_data_processing {
            errors.push("Data processing consent is required to register".to_string());
        }
        errors
    }
}

/// Stringify an identifier the backend may send as a number or a string.
pub(crate) fn id_to_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_config_from_env_defaults() {
        std::env::remove_var("RADPORT_URL");
        std::env::remove_var("RADPORT_GRAPHQL_PATH");
        std::env::remove_var("RADPORT_TOKEN");
        std::env::remove_var("RADPORT_TIMEOUT");

        let config = PortalConfig::from_env();
        assert_eq!(config.url, "http://localhost:8080");
        assert_eq!(config.graphql_url(), "http://localhost:8080/query");
        assert!(config.token.is_none());
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    #[serial]
    fn test_config_from_env_overrides() {
        std::env::set_var("RADPORT_URL", "https://portal.example/api/");
        std::env::set_var("RADPORT_TOKEN", "");
        std::env::set_var("RADPORT_TIMEOUT", "not-a-number");

        let config = PortalConfig::from_env();
        assert_eq!(config.graphql_url(), "https://portal.example/api/query");
        assert!(config.token.is_none(), "empty token counts as absent");
        assert_eq!(config.timeout_secs, 30);

        std::env::remove_var("RADPORT_URL");
        std::env::remove_var("RADPORT_TOKEN");
        std::env::remove_var("RADPORT_TIMEOUT");
    }

    #[test]
    fn test_config_builder() {
        let config = PortalConfig::default()
            .with_url("http://backend:9000")
            .with_token("jwt")
            .with_timeout_secs(5);

        assert_eq!(config.base_url(), "http://backend:9000");
        assert_eq!(config.token, Some("jwt".to_string()));
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn test_graphql_request_omits_missing_variables() {
        let body = serde_json::to_value(GraphQlRequest {
            query: "{ ping }",
            variables: None,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "query": "{ ping }" }));
    }

    #[test]
    fn test_registration_wire_names() {
        let registration = Registration {
            full_name: "Ana Torres".into(),
            age: 34,
            role: Role::Patient,
            identification: "1020304050".into(),
            email: "ana@example.com".into(),
            password: "secret".into(),
            accepts_data_processing: true,
        };
        assert!(registration.validate().is_empty());

        let json = serde_json::to_value(&registration).unwrap();
        assert_eq!(json["nombre_completo"], "Ana Torres");
        assert_eq!(json["rol"], "paciente");
        assert_eq!(json["acepta_tratamiento_datos"], true);
    }

    #[test]
    fn test_registration_requires_consent() {
        let registration = Registration {
            full_name: "Ana".into(),
            age: 34,
            role: Role::Patient,
            identification: "1".into(),
            email: "ana@example.com".into(),
            password: "x".into(),
            accepts_data_processing: false,
        };
        let errors = registration.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("consent"));
    }

    #[test]
    fn test_id_to_string() {
        assert_eq!(id_to_string(&serde_json::json!(3)), Some("3".into()));
        assert_eq!(id_to_string(&serde_json::json!("abc")), Some("abc".into()));
        assert_eq!(id_to_string(&serde_json::json!("")), None);
        assert_eq!(id_to_string(&serde_json::Value::Null), None);
    }
}
