//! Request executor
//!
//! Performs exactly one HTTP request per invocation and converts every
//! transport-level failure or non-success status into a [`CallError`].
//! No retries, no executor-enforced timeouts, no backpressure; callers
//! wanting transport timeouts configure their own `reqwest::Client` and
//! pass it to [`RequestExecutor::with_client`].

use opcall_core::{CallError, Method};
use reqwest::Client;
use serde_json::Value;

/// Executor wrapping a shared `reqwest::Client`
pub struct RequestExecutor {
    client: Client,
}

impl RequestExecutor {
    /// Create an executor with a default client
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Create an executor with a caller-configured client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Perform one request and classify the outcome
    ///
    /// - Transport failure (connect, DNS, transport timeout, body read) ->
    ///   `CallError` with a generic message and the underlying error as cause
    /// - Non-2xx status -> `CallError` with `status_code` set and the
    ///   response body parsed best-effort into the cause
    /// - 2xx -> parsed JSON body; an empty body yields `Value::Null`
    ///
    /// # Errors
    ///
    /// Never panics; every failure is returned as a `CallError`.
    pub async fn execute(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
    ) -> Result<Value, CallError> {
        let mut request = self.client.request(wire_method(method), url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(url, error = %err, "transport failure");
                return Err(transport_error(&err));
            }
        };

        let status = response.status();
        let text = match response.text().await {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(url, error = %err, "failed to read response body");
                return Err(transport_error(&err));
            }
        };

        if status.is_success() {
            parse_success_body(&text)
        } else {
            tracing::debug!(url, status = status.as_u16(), "non-success status");
            Err(status_error(status.as_u16(), &text))
        }
    }
}

impl Default for RequestExecutor {
    fn default() -> Self {
        Self::new()
    }
}

fn wire_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

fn transport_error(err: &reqwest::Error) -> CallError {
    CallError::new("request failed before a response was received")
        .with_cause(Value::String(err.to_string()))
}

fn parse_success_body(text: &str) -> Result<Value, CallError> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(text).map_err(|err| {
        CallError::new("failed to parse response body as JSON")
            .with_cause(Value::String(err.to_string()))
    })
}

/// Build the error for a non-success status, attaching the body as cause
/// when there is one. Body parsing here is best-effort and non-fatal: a
/// JSON body becomes a JSON cause, any other non-empty body becomes a
/// string cause, an empty body attaches no cause.
fn status_error(status: u16, body: &str) -> CallError {
    let error =
        CallError::new(format!("server returned non-success status {status}")).with_status(status);
    if body.trim().is_empty() {
        return error;
    }
    let cause =
        serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()));
    error.with_cause(cause)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_success_body_empty_is_null() {
        assert_eq!(parse_success_body("").unwrap(), Value::Null);
        assert_eq!(parse_success_body("  \n").unwrap(), Value::Null);
    }

    #[test]
    fn test_parse_success_body_json() {
        assert_eq!(parse_success_body("[1,2]").unwrap(), json!([1, 2]));
    }

    #[test]
    fn test_parse_success_body_malformed() {
        let err = parse_success_body("not json").unwrap_err();
        assert_eq!(err.message, "failed to parse response body as JSON");
        assert!(err.status_code.is_none());
        assert!(err.cause.is_some());
    }

    #[test]
    fn test_status_error_with_json_body() {
        let err = status_error(404, r#"{"error":"not found"}"#);
        assert_eq!(err.status_code, Some(404));
        assert_eq!(err.cause, Some(json!({"error": "not found"})));
        assert!(err.message.contains("404"));
    }

    #[test]
    fn test_status_error_with_plain_body() {
        let err = status_error(500, "oops");
        assert_eq!(err.cause, Some(Value::String("oops".to_string())));
    }

    #[test]
    fn test_status_error_with_empty_body() {
        let err = status_error(404, "");
        assert_eq!(err.status_code, Some(404));
        assert!(err.cause.is_none());
    }

    #[test]
    fn test_wire_method_mapping() {
        assert_eq!(wire_method(Method::Get), reqwest::Method::GET);
        assert_eq!(wire_method(Method::Patch), reqwest::Method::PATCH);
    }
}
