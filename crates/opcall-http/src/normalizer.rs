//! Response normalizer
//!
//! Takes the executor's outcome and the operation's optional output
//! transform and assembles the final uniform [`CallResult`]. The transform
//! runs only on the success path; a transform failure is caught and
//! reported as an error result, never an uncaught fault.

use opcall_core::{CallError, CallResult, Transform};
use serde_json::Value;

/// Shape the executor's outcome into the final call result
pub fn normalize(outcome: Result<Value, CallError>, output_transform: Option<&Transform>) -> CallResult {
    match outcome {
        Ok(data) => match output_transform {
            Some(transform) => match transform(data) {
                Ok(shaped) => CallResult::ok(shaped),
                Err(err) => {
                    tracing::debug!(error = %err, "response transform failed");
                    CallResult::err(
                        CallError::new("response transform failed")
                            .with_cause(Value::String(err.message)),
                    )
                }
            },
            None => CallResult::ok(data),
        },
        Err(error) => CallResult::err(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opcall_core::{transform_fn, TransformError};
    use serde_json::json;

    #[test]
    fn test_success_without_transform() {
        let result = normalize(Ok(json!({"id": 1})), None);
        assert_eq!(result.data(), Some(&json!({"id": 1})));
        assert!(result.error().is_none());
    }

    #[test]
    fn test_success_with_transform() {
        let transform = transform_fn(|value| Ok(json!({"wrapped": value})));
        let result = normalize(Ok(json!(7)), Some(&transform));
        assert_eq!(result.data(), Some(&json!({"wrapped": 7})));
    }

    #[test]
    fn test_identity_transform_preserves_body() {
        let identity = transform_fn(Ok);
        let wire = json!([{"id": 1, "title": "Buy milk", "completed": false}]);
        let result = normalize(Ok(wire.clone()), Some(&identity));
        assert_eq!(result.data(), Some(&wire));
    }

    #[test]
    fn test_transform_failure_becomes_error_result() {
        let failing = transform_fn(|_| Err(TransformError::new("bad shape")));
        let result = normalize(Ok(json!(1)), Some(&failing));
        assert!(result.is_err());
        let error = result.error().unwrap();
        assert_eq!(error.message, "response transform failed");
        assert_eq!(error.cause, Some(json!("bad shape")));
        assert!(error.status_code.is_none());
    }

    #[test]
    fn test_error_passes_through_untransformed() {
        let transform = transform_fn(|_| {
            panic!("output transform must not run on the error path")
        });
        let error = CallError::new("server returned non-success status 404").with_status(404);
        let result = normalize(Err(error.clone()), Some(&transform));
        assert_eq!(result.error(), Some(&error));
        assert!(result.data().is_none());
    }
}
