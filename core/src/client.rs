//! Single-endpoint GET client.
//!
//! # Design
//! `ApiRequest` holds an endpoint, its default headers, a transport and a
//! parser, none of which change after construction. A call is split into
//! `build_get`, which produces a fresh `HttpRequest`, and `parse_get`, which
//! interprets the transport outcome; `get` simply chains the two around the
//! transport. Keeping the halves separate lets callers drive their own I/O
//! and keeps the status handling testable without a network.

use tracing::debug;

use crate::error::{ApiError, ServiceError, TransportError};
use crate::http::{HttpRequest, HttpResponse};
use crate::parser::{JsonParser, ResponseParser};
use crate::transport::Transport;

/// Sent as `User-Agent` on every request.
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"));

/// Client bound to one REST endpoint.
///
/// Safe to share between threads whenever the transport and parser are.
#[derive(Debug, Clone)]
pub struct ApiRequest<T, P = JsonParser> {
    endpoint: String,
    default_headers: Vec<(String, String)>,
    transport: T,
    parser: P,
}

impl<T: Transport> ApiRequest<T, JsonParser> {
    pub fn new(endpoint: &str, transport: T) -> Self {
        Self::with_parser(endpoint, transport, JsonParser)
    }
}

impl<T: Transport, P: ResponseParser> ApiRequest<T, P> {
    pub fn with_parser(endpoint: &str, transport: T, parser: P) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            default_headers: vec![
                ("Content-Type".to_string(), "application/json".to_string()),
                ("User-Agent".to_string(), USER_AGENT.to_string()),
            ],
            transport,
            parser,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn default_headers(&self) -> &[(String, String)] {
        &self.default_headers
    }

    /// Issue the GET and interpret the outcome.
    ///
    /// Returns `Ok(None)` for a 404, the parsed body for a 2xx, and
    /// `ApiError::Service` for every other failure.
    pub fn get(
        &self,
        params: &[(&str, &str)],
        headers: &[(&str, &str)],
    ) -> Result<Option<P::Output>, ApiError<P::Error>> {
        let request = self.build_get(params, headers);
        debug!(
            endpoint = %self.endpoint,
            params = request.query.len(),
            headers = request.headers.len(),
            "dispatching GET"
        );
        let outcome = self.transport.perform_get(&request);
        self.parse_get(outcome)
    }

    /// Build the request for one call. `params` become the whole query
    /// string; `headers` override defaults with the same name (ignoring
    /// case) and are otherwise appended in order.
    pub fn build_get(&self, params: &[(&str, &str)], headers: &[(&str, &str)]) -> HttpRequest {
        let mut merged = self.default_headers.clone();
        for (name, value) in headers {
            match merged.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(name)) {
                Some(slot) => *slot = (name.to_string(), value.to_string()),
                None => merged.push((name.to_string(), value.to_string())),
            }
        }

        HttpRequest {
            path: self.endpoint.clone(),
            query: params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            headers: merged,
        }
    }

    /// Interpret a transport outcome: 2xx goes to the parser, 404 becomes
    /// `None`, anything else is normalized into a `ServiceError`.
    pub fn parse_get(
        &self,
        outcome: Result<HttpResponse, TransportError>,
    ) -> Result<Option<P::Output>, ApiError<P::Error>> {
        let response = match check_status(outcome)? {
            Some(response) => response,
            None => return Ok(None),
        };
        self.parser
            .parse_response(&response)
            .map(Some)
            .map_err(ApiError::Parse)
    }
}

/// Split a transport outcome into a 2xx response, a 404 (`None`) or a
/// normalized failure.
fn check_status(
    outcome: Result<HttpResponse, TransportError>,
) -> Result<Option<HttpResponse>, ServiceError> {
    match outcome {
        Ok(response) if response.is_success() => Ok(Some(response)),
        Ok(response) if response.is_not_found() => Ok(None),
        Ok(response) => Err(TransportError::from_status(response).into()),
        Err(TransportError::Status { response, .. }) if response.is_not_found() => Ok(None),
        Err(err) => Err(err.into()),
    }
}
