//! Blocking client for a single REST endpoint.
//!
//! # Overview
//! `ApiRequest` issues GET requests against one endpoint through an injected
//! `Transport`, hands successful responses to a `ResponseParser`, and turns
//! every other outcome into either `None` (404) or a `ServiceError` carrying
//! whatever diagnostics the remote service returned.
//!
//! # Design
//! - `ApiRequest` is immutable after construction and carries no per-call
//!   state, so one instance can serve many callers.
//! - The transport and parser are traits; `UreqTransport` and `JsonParser`
//!   are the defaults.
//! - Error bodies are parsed best-effort. `title` and `detail` fields of a
//!   problem-details object are lifted onto the error; anything else just
//!   stays in the raw body.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod parser;
pub mod transport;

pub use client::{ApiRequest, USER_AGENT};
pub use config::{ConfigError, TransportConfig};
pub use error::{ApiError, ServiceError, TransportError};
pub use http::{HttpRequest, HttpResponse};
pub use parser::{JsonParser, RawBody, ResponseParser, TypedJsonParser};
pub use transport::{Transport, UreqTransport};
