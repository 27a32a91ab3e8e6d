//! Client facade tying the registry, executor, and normalizer together

use crate::executor::RequestExecutor;
use crate::normalizer::normalize;
use opcall_core::{CallArgs, CallError, CallResult, EndpointRegistry};
use serde_json::Value;
use std::sync::Arc;

/// Client for invoking registered operations by name
///
/// Every failure class (unknown operation, bad arguments, transform
/// failure, transport failure, non-success status) is converted into an
/// error [`CallResult`]; nothing escapes [`OpClient::call`] as a panic or
/// an `Err`. Concurrent calls share nothing mutable, so a single client
/// can be used from any number of tasks.
///
/// # Example
///
/// ```ignore
/// use opcall_core::{CallArgs, EndpointRegistry, Method};
/// use opcall_http::OpClient;
/// use std::sync::Arc;
///
/// let registry = EndpointRegistry::builder("https://api.example.com")
///     .operation("getUserTodos", Method::Get, "users/{userId}/todos")?
///     .build()?;
/// let client = OpClient::new(Arc::new(registry));
///
/// let args = CallArgs::new().with("userId", "1");
/// let result = client.call("getUserTodos", None, &args).await;
/// match result.into_result() {
///     Ok(todos) => println!("{todos}"),
///     Err(error) => eprintln!("{error}"),
/// }
/// ```
pub struct OpClient {
    registry: Arc<EndpointRegistry>,
    executor: RequestExecutor,
}

impl OpClient {
    /// Create a client with a default executor
    pub fn new(registry: Arc<EndpointRegistry>) -> Self {
        Self {
            registry,
            executor: RequestExecutor::new(),
        }
    }

    /// Create a client with a caller-configured executor
    pub fn with_executor(registry: Arc<EndpointRegistry>, executor: RequestExecutor) -> Self {
        Self { registry, executor }
    }

    /// The registry this client resolves against
    pub fn registry(&self) -> &EndpointRegistry {
        &self.registry
    }

    /// Invoke an operation by name
    ///
    /// Resolution and the input transform run before any network activity;
    /// a failure in either short-circuits without a request being sent.
    /// Exactly one request is attempted otherwise.
    pub async fn call(&self, operation: &str, payload: Option<Value>, args: &CallArgs) -> CallResult {
        let resolved = match self.registry.resolve(operation, args) {
            Ok(resolved) => resolved,
            Err(err) => {
                tracing::debug!(operation, error = %err, "resolution failed");
                return CallResult::err(CallError::from(err));
            }
        };

        let body = match (payload, resolved.input_transform.as_ref()) {
            (Some(payload), Some(transform)) => match transform(payload) {
                Ok(shaped) => Some(shaped),
                Err(err) => {
                    tracing::debug!(operation, error = %err, "request transform failed");
                    return CallResult::err(
                        CallError::new("request transform failed")
                            .with_cause(Value::String(err.message)),
                    );
                }
            },
            (payload, _) => payload,
        };

        tracing::debug!(operation, method = %resolved.method, url = %resolved.url, "dispatching");
        let outcome = self
            .executor
            .execute(resolved.method, &resolved.url, body.as_ref())
            .await;
        normalize(outcome, resolved.output_transform.as_ref())
    }
}
