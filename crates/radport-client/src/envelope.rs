//! Typed view of the response shapes the backend has used.
//!
//! Depending on the integration point the payload arrives as
//! `{"data": {...}}`, as the bare object `{...}`, or as
//! `{"errors": [...]}`. [`ResponseShape::parse`] settles which one it is
//! once; callers then ask for fields without probing JSON by hand.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{PortalError, PortalResult};

/// One entry of a GraphQL `errors` array.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GraphQlError {
    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub path: Option<Vec<Value>>,

    #[serde(default)]
    pub extensions: Option<Value>,
}

/// A decoded response.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseShape {
    /// Non-empty `errors` array; wins over any partial `data`.
    Errors(Vec<GraphQlError>),

    /// Payload nested under `data`.
    Enveloped(Map<String, Value>),

    /// Payload at the top level.
    Bare(Map<String, Value>),

    /// `data` present but null (or not an object).
    Empty,
}

impl ResponseShape {
    /// Classify a decoded JSON body.
    pub fn parse(body: Value) -> PortalResult<Self> {
        let Value::Object(mut top) = body else {
            return Err(PortalError::InvalidResponse {
                message: format!("expected a JSON object, got {}", json_kind(&body)),
            });
        };

        if let Some(errors) = top.remove("errors") {
            let errors = match errors {
                Value::Array(items) => items
                    .into_iter()
                    .map(|item| match item {
                        Value::String(message) => GraphQlError {
                            message: Some(message),
                            ..Default::default()
                        },
                        other => serde_json::from_value(other).unwrap_or_default(),
                    })
                    .collect::<Vec<_>>(),
                Value::Null => Vec::new(),
                other => vec![GraphQlError {
                    message: other.as_str().map(String::from),
                    ..Default::default()
                }],
            };
            if !errors.is_empty() {
                return Ok(Self::Errors(errors));
            }
        }

        match top.remove("data") {
            Some(Value::Object(data)) => Ok(Self::Enveloped(data)),
            Some(_) => Ok(Self::Empty),
            None => Ok(Self::Bare(top)),
        }
    }

    /// Look up a payload field; `None` for errors, empty payloads and missing fields.
    pub fn field(&self, name: &str) -> Option<&Value> {
        match self {
            Self::Enveloped(map) | Self::Bare(map) => map.get(name).filter(|v| !v.is_null()),
            Self::Errors(_) | Self::Empty => None,
        }
    }

    /// Take a payload field out, turning GraphQL errors into [`PortalError::GraphQl`].
    pub fn into_field(self, name: &str) -> PortalResult<Option<Value>> {
        match self {
            Self::Errors(errors) => Err(PortalError::GraphQl {
                message: first_error_message(&errors),
            }),
            Self::Enveloped(mut map) | Self::Bare(mut map) => {
                Ok(map.remove(name).filter(|v| !v.is_null()))
            }
            Self::Empty => Ok(None),
        }
    }

    /// Whether the payload arrived under `data`.
    pub fn is_enveloped(&self) -> bool {
        matches!(self, Self::Enveloped(_))
    }
}

pub(crate) fn first_error_message(errors: &[GraphQlError]) -> String {
    errors
        .first()
        .and_then(|e| e.message.clone())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| "unknown GraphQL error".to_string())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
