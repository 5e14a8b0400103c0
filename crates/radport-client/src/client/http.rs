//! HTTP layer: request building, bearer auth, status mapping, body decoding.
//!
//! This is the ONLY place that looks at status codes. client/mod.rs works
//! with decoded values and [`ResponseShape`]s.

use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::envelope::{first_error_message, ResponseShape};
use crate::error::{PortalError, PortalResult};
use crate::session::Session;
use crate::types::{GraphQlRequest, PortalConfig};

use super::helpers::{error_body, truncate_body};

/// HTTP backend for making requests (holds reqwest client and config).
#[derive(Debug, Clone)]
pub(crate) struct HttpBackend {
    pub(crate) client: reqwest::Client,
    pub(crate) config: PortalConfig,
}

impl HttpBackend {
    /// POST a GraphQL document and classify the response.
    pub(crate) async fn post_graphql(
        &self,
        session: &Session,
        query: &str,
        variables: Option<Value>,
    ) -> PortalResult<ResponseShape> {
        let url = self.config.graphql_url();
        debug!(url = %url, has_variables = variables.is_some(), "sending GraphQL request");

        let request = self
            .client
            .post(&url)
            .json(&GraphQlRequest { query, variables });
        let response = self.send(request, session).await?;
        let body = read_json(response).await?;
        classify(body)
    }

    /// POST a GraphQL multipart request (file uploads).
    pub(crate) async fn post_graphql_multipart(
        &self,
        session: &Session,
        form: reqwest::multipart::Form,
    ) -> PortalResult<ResponseShape> {
        let url = self.config.graphql_url();
        debug!(url = %url, "sending GraphQL multipart request");

        let request = self.client.post(&url).multipart(form);
        let response = self.send(request, session).await?;
        let body = read_json(response).await?;
        classify(body)
    }

    /// GET a REST endpoint relative to the base URL.
    pub(crate) async fn get_json(&self, session: &Session, path: &str) -> PortalResult<Value> {
        let url = self.rest_url(path);
        debug!(url = %url, "sending GET request");

        let response = self.send(self.client.get(&url), session).await?;
        read_json(response).await
    }

    /// POST a JSON body to a REST endpoint relative to the base URL.
    pub(crate) async fn post_json<B: Serialize + ?Sized>(
        &self,
        session: &Session,
        path: &str,
        body: &B,
    ) -> PortalResult<Value> {
        let url = self.rest_url(path);
        debug!(url = %url, "sending POST request");

        let response = self
            .send(self.client.post(&url).json(body), session)
            .await?;
        read_json(response).await
    }

    fn rest_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url(),
            path.trim_start_matches('/')
        )
    }

    /// Send once. No retry: a failed request is reported, not repeated.
    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        session: &Session,
    ) -> PortalResult<reqwest::Response> {
        let mut request = request.header(ACCEPT, "application/json");

        let session = session.or_token(self.config.token.as_deref());
        match session.bearer() {
            Some(bearer) => request = request.header(AUTHORIZATION, bearer),
            None => debug!("no bearer token; sending unauthenticated request"),
        }

        let response = request.send().await?;
        let status = response.status();
        debug!(status = status.as_u16(), "response received");

        if status.is_success() {
            return Ok(response);
        }

        let body = error_body(status.as_u16(), response.text().await);
        warn!(status = status.as_u16(), "backend returned an error status");
        Err(PortalError::Http {
            status: status.as_u16(),
            body,
        })
    }
}

async fn read_json(response: reqwest::Response) -> PortalResult<Value> {
    let text = response.text().await.map_err(|e| PortalError::Network {
        message: format!("failed to read response body: {}", e),
    })?;

    serde_json::from_str(&text).map_err(|e| PortalError::InvalidResponse {
        message: format!("response is not JSON: {} (body: {})", e, truncate_body(&text)),
    })
}

fn classify(body: Value) -> PortalResult<ResponseShape> {
    let shape = ResponseShape::parse(body)?;
    if let ResponseShape::Errors(errors) = &shape {
        warn!(
            count = errors.len(),
            first = %first_error_message(errors),
            "GraphQL response carried errors"
        );
    }
    Ok(shape)
}
