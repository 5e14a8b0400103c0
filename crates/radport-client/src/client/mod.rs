//! Portal client: the case-data operations.
//!
//! Public API: no status code knowledge. All HTTP/status mapping in http.rs.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::case::{normalize_case, normalize_cases, CaseRecord};
use crate::diagnostic::{DiagnosticPayload, DiagnosticReceipt, RawReceipt};
use crate::envelope::{first_error_message, ResponseShape};
use crate::error::{PortalError, PortalResult};
use crate::prediagnostic::PreDiagnostic;
use crate::queries;
use crate::session::{Session, UserProfile};
use crate::types::{
    id_to_string, LoginRequest, LoginResponse, PortalConfig, Registration, ValidationResponse,
};
use crate::upload::RadiographUpload;
use crate::view::{CaseFeed, CaseSource};

mod helpers;
mod http;

use helpers::is_no_radiographs_error;
use http::HttpBackend;

pub(crate) const USER_AGENT_VALUE: &str = concat!("radport-client/", env!("CARGO_PKG_VERSION"));

/// REST listing of cases awaiting review.
const PENDING_CASES_PATH: &str = "/businesslogic/cases";

/// Client for the portal backend.
#[derive(Debug, Clone)]
pub struct PortalClient {
    http: HttpBackend,
}

impl PortalClient {
    pub fn new(config: PortalConfig) -> PortalResult<Self> {
        url::Url::parse(&config.url).map_err(|e| PortalError::Config {
            message: format!("invalid backend URL {:?}: {}", config.url, e),
        })?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(default_headers)
            .build()
            .map_err(|e| PortalError::Network {
                message: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            http: HttpBackend { client, config },
        })
    }

    pub fn from_env() -> PortalResult<Self> {
        Self::new(PortalConfig::from_env())
    }

    /// Run any GraphQL document and get the classified response back.
    pub async fn query(
        &self,
        session: &Session,
        document: &str,
        variables: Option<Value>,
    ) -> PortalResult<ResponseShape> {
        self.http.post_graphql(session, document, variables).await
    }

    /// Cases visible to the session's user.
    ///
    /// The list may arrive under `data` or at the top level; a missing
    /// field, or the backend reporting that the patient has no radiographs,
    /// yields an empty list.
    pub async fn list_cases(&self, session: &Session) -> PortalResult<Vec<CaseRecord>> {
        self.require_token(session)?;
        debug!("listing cases");

        let shape = self
            .http
            .post_graphql(session, queries::GET_CASES, None)
            .await?;

        let field = match shape.into_field(queries::GET_CASES_FIELD) {
            Ok(field) => field,
            Err(PortalError::GraphQl { message }) if is_no_radiographs_error(&message) => {
                debug!(message = %message, "backend reports no radiographs");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        let cases = field.as_ref().map(normalize_cases).unwrap_or_default();
        info!(count = cases.len(), "cases fetched");
        Ok(cases)
    }

    /// Cases awaiting review, from the REST listing.
    pub async fn list_pending_cases(&self, session: &Session) -> PortalResult<Vec<CaseRecord>> {
        debug!("listing pending cases");
        let body = self.http.get_json(session, PENDING_CASES_PATH).await?;

        let cases = match body {
            Value::Array(_) => normalize_cases(&body),
            other => {
                let shape = ResponseShape::parse(other)?;
                if let ResponseShape::Errors(errors) = &shape {
                    return Err(PortalError::GraphQl {
                        message: first_error_message(errors),
                    });
                }
                shape
                    .field("cases")
                    .or_else(|| shape.field(queries::GET_CASES_FIELD))
                    .map(normalize_cases)
                    .unwrap_or_default()
            }
        };

        info!(count = cases.len(), "pending cases fetched");
        Ok(cases)
    }

    /// One prediagnostic; `None` when the backend has nothing for the id.
    pub async fn get_prediagnostic(
        &self,
        session: &Session,
        id: &str,
    ) -> PortalResult<Option<PreDiagnostic>> {
        debug!(id = %id, "fetching prediagnostic");

        let shape = self
            .http
            .post_graphql(session, queries::GET_PREDIAGNOSTIC, Some(json!({ "id": id })))
            .await?;

        Ok(shape
            .into_field(queries::GET_PREDIAGNOSTIC_FIELD)?
            .as_ref()
            .and_then(normalize_case)
            .map(PreDiagnostic::from))
    }

    /// Submit a doctor's review. Invalid forms are rejected without a request.
    pub async fn create_diagnostic(
        &self,
        session: &Session,
        prediagnostic_id: &str,
        payload: &DiagnosticPayload,
    ) -> PortalResult<DiagnosticReceipt> {
        let errors = payload.validate();
        if !errors.is_empty() {
            return Err(PortalError::Validation { errors });
        }

        info!(
            prediagnostic_id = %prediagnostic_id,
            approval = payload.approval.as_str(),
            "submitting diagnostic"
        );

        let variables = json!({
            "id_prediagnostico": prediagnostic_id,
            "input": payload,
        });
        let shape = self
            .http
            .post_graphql(session, queries::CREATE_DIAGNOSTIC, Some(variables))
            .await?;

        let receipt = match shape.into_field(queries::CREATE_DIAGNOSTIC_FIELD)? {
            Some(value) => serde_json::from_value::<RawReceipt>(value)
                .unwrap_or_default()
                .into_receipt(),
            None => DiagnosticReceipt::default(),
        };
        Ok(receipt)
    }

    /// Upload a radiograph for the session's patient.
    ///
    /// Returns whether the backend acknowledged the upload.
    pub async fn upload_radiograph(
        &self,
        session: &Session,
        upload: RadiographUpload,
    ) -> PortalResult<bool> {
        self.require_token(session)?;
        let errors = upload.validate();
        if !errors.is_empty() {
            return Err(PortalError::Validation { errors });
        }

        info!(
            file = %upload.file_name,
            size = upload.bytes.len(),
            "uploading radiograph"
        );

        let operations = json!({
            "query": queries::UPLOAD_IMAGE,
            "variables": { "file": null },
        });
        let map = json!({ "0": ["variables.file"] });

        let file = reqwest::multipart::Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str(&upload.content_type)
            .map_err(|e| PortalError::Validation {
                errors: vec![format!("invalid content type: {}", e)],
            })?;
        let form = reqwest::multipart::Form::new()
            .text("operations", operations.to_string())
            .text("map", map.to_string())
            .part("0", file);

        let shape = self.http.post_graphql_multipart(session, form).await?;
        let accepted = match shape.into_field(queries::UPLOAD_IMAGE_FIELD)? {
            Some(Value::Bool(b)) => b,
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Object(_)) => true,
            _ => false,
        };
        Ok(accepted)
    }

    /// Exchange credentials for a session.
    pub async fn login(&self, email: &str, password: &str) -> PortalResult<(Session, UserProfile)> {
        debug!(email = %email, "logging in");

        let body = self
            .http
            .post_json(
                &Session::anonymous(),
                "/auth",
                &LoginRequest {
                    correo: email,
                    contrasena: password,
                },
            )
            .await?;
        let response: LoginResponse =
            serde_json::from_value(body).map_err(|e| PortalError::InvalidResponse {
                message: format!("failed to parse login response: {}", e),
            })?;

        let role = response.rol.as_deref().and_then(|r| r.parse().ok());
        let session = Session::new(Some(response.token), role);
        if !session.is_authenticated() {
            return Err(PortalError::InvalidResponse {
                message: "login response carried an empty token".to_string(),
            });
        }

        let profile = UserProfile {
            id: response.id.as_ref().and_then(id_to_string).unwrap_or_default(),
            name: response
                .nombre
                .as_ref()
                .and_then(id_to_string)
                .unwrap_or_default(),
            email: email.to_string(),
            role,
        };
        info!(user = %profile.id, role = ?role, "logged in");
        Ok((session, profile))
    }

    /// Who the session's token belongs to.
    pub async fn current_user(&self, session: &Session) -> PortalResult<UserProfile> {
        self.require_token(session)?;

        let body = self.http.get_json(session, "/validation").await?;
        let response: ValidationResponse =
            serde_json::from_value(body).map_err(|e| PortalError::InvalidResponse {
                message: format!("failed to parse validation response: {}", e),
            })?;

        Ok(UserProfile {
            id: response
                .user_id
                .as_ref()
                .and_then(id_to_string)
                .unwrap_or_default(),
            name: response.name.unwrap_or_default(),
            email: response.email.unwrap_or_default(),
            role: response.role.as_deref().and_then(|r| r.parse().ok()),
        })
    }

    /// Create an account.
    pub async fn register(&self, registration: &Registration) -> PortalResult<UserProfile> {
        let errors = registration.validate();
        if !errors.is_empty() {
            return Err(PortalError::Validation { errors });
        }

        info!(email = %registration.email, role = %registration.role, "registering account");
        let body = self
            .http
            .post_json(&Session::anonymous(), "/register", registration)
            .await?;

        let field = |name: &str| body.get(name).and_then(id_to_string);
        Ok(UserProfile {
            id: field("id").unwrap_or_default(),
            name: field("nombre_completo").unwrap_or_else(|| registration.full_name.clone()),
            email: field("correo").unwrap_or_else(|| registration.email.clone()),
            role: body
                .get("rol")
                .and_then(Value::as_str)
                .and_then(|r| r.parse().ok())
                .or(Some(registration.role)),
        })
    }

    /// [`PortalClient::list_cases`], with placeholder cases standing in on failure.
    pub async fn fetch_cases_or_placeholder(&self, session: &Session) -> CaseFeed {
        CaseFeed::from_result(self.list_cases(session).await)
    }

    pub fn base_url(&self) -> &str {
        self.http.config.base_url()
    }

    pub fn graphql_url(&self) -> String {
        self.http.config.graphql_url()
    }

    fn require_token(&self, session: &Session) -> PortalResult<()> {
        if session.is_authenticated() || self.http.config.token.is_some() {
            Ok(())
        } else {
            Err(PortalError::Unauthenticated)
        }
    }
}

#[async_trait]
impl CaseSource for PortalClient {
    async fn fetch_cases(&self, session: &Session) -> PortalResult<Vec<CaseRecord>> {
        self.list_cases(session).await
    }
}
