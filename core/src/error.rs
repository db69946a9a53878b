//! Error types for the REST client.
//!
//! # Design
//! A 404 is not an error here: `ApiRequest::get` reports it as `Ok(None)`.
//! Every other failure that involves the remote service is normalized into a
//! single `ServiceError`, which keeps whatever diagnostics could be recovered
//! from the response. Gathering those diagnostics never fails; a body that is
//! not JSON simply leaves the parsed fields empty.
//!
//! Parser failures on a 2xx response are a different category and stay in
//! their own type, so `ApiError` keeps the two apart at the call site.

use serde_json::Value;
use thiserror::Error;

use crate::http::HttpResponse;

/// A failure reported by a `Transport`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// No response was received: DNS failure, refused connection, timeout.
    #[error("{message}")]
    Connection { message: String },

    /// The server answered with a non-success status.
    #[error("{message}")]
    Status {
        message: String,
        response: HttpResponse,
    },
}

impl TransportError {
    /// Wrap a non-success response, describing it as `HTTP <code> <reason>`.
    pub fn from_status(response: HttpResponse) -> Self {
        let message = match ureq::http::StatusCode::from_u16(response.status)
            .ok()
            .and_then(|s| s.canonical_reason())
        {
            Some(reason) => format!("HTTP {} {reason}", response.status),
            None => format!("HTTP {}", response.status),
        };
        TransportError::Status { message, response }
    }

    pub fn response(&self) -> Option<&HttpResponse> {
        match self {
            TransportError::Connection { .. } => None,
            TransportError::Status { response, .. } => Some(response),
        }
    }
}

/// The normalized description of a failed call.
///
/// Built once from a `TransportError` and immutable afterwards.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{message}")]
pub struct ServiceError {
    message: String,
    status_code: Option<u16>,
    raw_body: Option<String>,
    parsed_body: Option<Value>,
    title: Option<String>,
    detail: Option<String>,
}

impl ServiceError {
    /// The transport or HTTP failure description.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Present only when an HTTP response was received.
    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    /// The unparsed response body, present whenever a response was received.
    pub fn raw_body(&self) -> Option<&str> {
        self.raw_body.as_deref()
    }

    /// The body as JSON, when it parsed to something non-empty.
    pub fn parsed_body(&self) -> Option<&Value> {
        self.parsed_body.as_ref()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }
}

impl From<TransportError> for ServiceError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Connection { message } => ServiceError {
                message,
                status_code: None,
                raw_body: None,
                parsed_body: None,
                title: None,
                detail: None,
            },
            TransportError::Status { message, response } => {
                let raw_body = response.body_text();
                let parsed_body = parse_diagnostics(&raw_body);
                let title = string_field(parsed_body.as_ref(), "title");
                let detail = string_field(parsed_body.as_ref(), "detail");
                ServiceError {
                    message,
                    status_code: Some(response.status),
                    raw_body: Some(raw_body),
                    parsed_body,
                    title,
                    detail,
                }
            }
        }
    }
}

/// Best-effort JSON parse of an error body. Unparsable and empty bodies
/// yield `None`.
fn parse_diagnostics(raw: &str) -> Option<Value> {
    let value: Value = serde_json::from_str(raw).ok()?;
    let empty = match &value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(s) => s.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    };
    (!empty).then_some(value)
}

/// Lift a string-valued field out of a JSON object. Non-objects and
/// non-string values yield `None`.
fn string_field(body: Option<&Value>, name: &str) -> Option<String> {
    body?.as_object()?.get(name)?.as_str().map(str::to_string)
}

/// Errors returned by `ApiRequest::get`.
#[derive(Debug, Error)]
pub enum ApiError<E> {
    /// The call failed at the transport or HTTP level.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// A 2xx response did not match what the parser expected.
    #[error("response parsing failed: {0}")]
    Parse(#[source] E),
}

impl<E> ApiError<E> {
    pub fn as_service(&self) -> Option<&ServiceError> {
        match self {
            ApiError::Service(err) => Some(err),
            ApiError::Parse(_) => None,
        }
    }
}
