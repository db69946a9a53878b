//! The network seam.
//!
//! # Design
//! `ApiRequest` never performs I/O itself; it hands an `HttpRequest` to a
//! `Transport` and interprets whatever comes back. A transport may return a
//! non-2xx status either as a plain `HttpResponse` or as
//! `TransportError::Status`, and `ApiRequest` treats both the same way.
//! `TransportError::Connection` is reserved for failures where no response
//! exists at all.
//!
//! `UreqTransport` is the blocking implementation shipped with the crate.

use std::sync::Arc;

use tracing::debug;

use crate::config::TransportConfig;
use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse};

/// Performs a single GET round-trip.
pub trait Transport {
    fn perform_get(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn perform_get(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).perform_get(request)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn perform_get(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).perform_get(request)
    }
}

/// Blocking transport backed by a `ureq` agent.
///
/// The agent is configured with `http_status_as_error(false)` so 4xx/5xx
/// responses come back as data and only connection-level problems become
/// `TransportError::Connection`. Once a status line has arrived the status
/// is never lost: a body that cannot be read in full yields
/// `TransportError::Status` with an empty body.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
    base_url: Option<String>,
    body_limit: u64,
}

impl UreqTransport {
    pub fn new(config: TransportConfig) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(config.timeout)
            .build()
            .new_agent();
        Self {
            agent,
            base_url: config.base_url,
            body_limit: config.body_limit,
        }
    }

    /// Resolve `path` against the configured base URL. Absolute URLs pass
    /// through untouched.
    pub fn url_for(&self, path: &str) -> String {
        match &self.base_url {
            Some(base) if !path.contains("://") => {
                format!(
                    "{}/{}",
                    base.trim_end_matches('/'),
                    path.trim_start_matches('/')
                )
            }
            _ => path.to_string(),
        }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(TransportConfig::default())
    }
}

impl Transport for UreqTransport {
    fn perform_get(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = self.url_for(&request.path);

        let mut builder = self.agent.get(&url);
        for (key, value) in &request.query {
            builder = builder.query(key, value);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        let mut response = builder.call().map_err(|e| {
            debug!(%url, error = %e, "request failed");
            TransportError::Connection {
                message: e.to_string(),
            }
        })?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = match response
            .body_mut()
            .with_config()
            .limit(self.body_limit)
            .read_to_vec()
        {
            Ok(body) => body,
            Err(e) => {
                debug!(%url, status, error = %e, "response body unreadable");
                return Err(TransportError::Status {
                    message: format!("HTTP {status}: failed to read response body: {e}"),
                    response: HttpResponse {
                        status,
                        headers,
                        body: Vec::new(),
                    },
                });
            }
        };

        debug!(%url, status, bytes = body.len(), "received response");
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_BODY_LIMIT;

    #[test]
    fn body_limit_comes_from_config() {
        let transport = UreqTransport::new(TransportConfig::new().body_limit(1024));
        assert_eq!(transport.body_limit, 1024);
        assert_eq!(UreqTransport::default().body_limit, DEFAULT_BODY_LIMIT);
    }

    #[test]
    fn url_for_without_base_is_identity() {
        let transport = UreqTransport::default();
        assert_eq!(transport.url_for("/breaches"), "/breaches");
    }

    #[test]
    fn url_for_joins_relative_paths() {
        let transport = UreqTransport::new(TransportConfig::new().base_url("http://localhost:3000/"));
        assert_eq!(transport.url_for("/breaches"), "http://localhost:3000/breaches");
        assert_eq!(transport.url_for("breaches"), "http://localhost:3000/breaches");
    }

    #[test]
    fn url_for_keeps_absolute_urls() {
        let transport = UreqTransport::new(TransportConfig::new().base_url("http://localhost:3000"));
        assert_eq!(
            transport.url_for("https://api.example.com/breaches"),
            "https://api.example.com/breaches"
        );
    }
}
