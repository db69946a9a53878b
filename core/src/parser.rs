//! Strategies for turning a successful response into a value.

use std::convert::Infallible;
use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::http::HttpResponse;

/// Converts a 2xx `HttpResponse` into a domain value.
///
/// Errors are the parser's own; `ApiRequest` passes them through unchanged
/// as `ApiError::Parse`.
pub trait ResponseParser {
    type Output;
    type Error;

    fn parse_response(&self, response: &HttpResponse) -> Result<Self::Output, Self::Error>;
}

/// Default parser: decodes the body into a generic JSON value.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonParser;

impl ResponseParser for JsonParser {
    type Output = Value;
    type Error = serde_json::Error;

    fn parse_response(&self, response: &HttpResponse) -> Result<Value, serde_json::Error> {
        serde_json::from_slice(&response.body)
    }
}

/// Decodes the body straight into `T`.
pub struct TypedJsonParser<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> TypedJsonParser<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for TypedJsonParser<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for TypedJsonParser<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for TypedJsonParser<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedJsonParser")
            .field("target", &std::any::type_name::<T>())
            .finish()
    }
}

impl<T: DeserializeOwned> ResponseParser for TypedJsonParser<T> {
    type Output = T;
    type Error = serde_json::Error;

    fn parse_response(&self, response: &HttpResponse) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&response.body)
    }
}

/// No parsing at all: the raw body bytes are the result.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawBody;

impl ResponseParser for RawBody {
    type Output = Vec<u8>;
    type Error = Infallible;

    fn parse_response(&self, response: &HttpResponse) -> Result<Vec<u8>, Infallible> {
        Ok(response.body.clone())
    }
}
