//! Verify outcome interpretation against JSON test vectors in `test-vectors/`.
//!
//! Each case describes a simulated transport outcome and what `parse_get`
//! must turn it into. Parsed bodies are compared as JSON values, not text.

use rest_core::{ApiRequest, HttpRequest, HttpResponse, Transport, TransportError};
use serde_json::Value;

/// Never called; vectors feed outcomes straight into `parse_get`.
struct NoTransport;

impl Transport for NoTransport {
    fn perform_get(&self, _request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        unreachable!("test vectors do not perform I/O")
    }
}

fn response(case: &Value) -> HttpResponse {
    HttpResponse {
        status: case["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: case["body"].as_str().unwrap().as_bytes().to_vec(),
    }
}

/// Build the simulated transport outcome from a vector's `outcome` object.
fn outcome(case: &Value) -> Result<HttpResponse, TransportError> {
    match case["kind"].as_str().unwrap() {
        "connection" => Err(TransportError::Connection {
            message: case["message"].as_str().unwrap().to_string(),
        }),
        "response" => Ok(response(case)),
        "status_error" => Err(TransportError::Status {
            message: case["message"].as_str().unwrap().to_string(),
            response: response(case),
        }),
        other => panic!("unknown outcome kind: {other}"),
    }
}

fn opt_str(value: &Value) -> Option<&str> {
    value.as_str()
}

#[test]
fn error_test_vectors() {
    let raw = include_str!("../../test-vectors/errors.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let api = ApiRequest::new("/breaches", NoTransport);
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let expected = &case["expected"];
        let result = api.parse_get(outcome(&case["outcome"]));

        match expected["kind"].as_str().unwrap() {
            "absent" => {
                assert!(matches!(result, Ok(None)), "{name}: expected absence, got {result:?}");
            }
            "parsed" => {
                let value = result.unwrap_or_else(|e| panic!("{name}: unexpected error {e}"));
                assert_eq!(value.as_ref(), Some(&expected["value"]), "{name}: parsed value");
            }
            "service_error" => {
                let err = result.expect_err(name);
                let service = err.as_service().unwrap_or_else(|| panic!("{name}: not a service error"));
                assert_eq!(service.message(), expected["message"].as_str().unwrap(), "{name}: message");
                assert_eq!(
                    service.status_code(),
                    expected["status_code"].as_u64().map(|s| s as u16),
                    "{name}: status_code"
                );
                assert_eq!(service.raw_body(), opt_str(&expected["raw_body"]), "{name}: raw_body");
                let parsed = match &expected["parsed_body"] {
                    Value::Null => None,
                    other => Some(other),
                };
                assert_eq!(service.parsed_body(), parsed, "{name}: parsed_body");
                assert_eq!(service.title(), opt_str(&expected["title"]), "{name}: title");
                assert_eq!(service.detail(), opt_str(&expected["detail"]), "{name}: detail");
            }
            other => panic!("{name}: unknown expectation kind {other}"),
        }
    }
}
