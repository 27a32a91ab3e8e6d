//! Core types for operation-keyed calls
//!
//! This module contains the data model shared by the registry and the HTTP
//! layer: HTTP methods, interpolation arguments, payload transforms,
//! operation descriptors, and the uniform call result.

use crate::error::{CallError, TransformError};
use crate::template::{TemplateError, UrlTemplate};
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

/// HTTP methods supported by operation descriptors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    /// The canonical wire name, e.g. `GET`
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Error returned when parsing an unsupported HTTP method name
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unsupported method '{0}'. Expected GET, POST, PATCH, or DELETE")]
pub struct UnsupportedMethod(pub String);

impl FromStr for Method {
    type Err = UnsupportedMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PATCH" => Ok(Method::Patch),
            "DELETE" => Ok(Method::Delete),
            _ => Err(UnsupportedMethod(s.to_string())),
        }
    }
}

/// Interpolation arguments for a single call
///
/// Keys map to `{name}` placeholders in the operation's URL template.
///
/// # Example
///
/// ```rust
/// use opcall_core::CallArgs;
///
/// let args = CallArgs::new().with("userId", "1");
/// assert_eq!(args.get("userId"), Some("1"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallArgs(BTreeMap<String, String>);

impl CallArgs {
    /// Create an empty argument set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an argument, builder style
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert an argument
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Look up an argument by key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Argument keys in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CallArgs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// A payload transform held by an operation descriptor
///
/// Transforms are pure functions reshaping a JSON payload between the
/// caller's preferred shape and the wire shape. Failures are reported as
/// [`TransformError`] and never propagate as panics.
pub type Transform = Arc<dyn Fn(Value) -> Result<Value, TransformError> + Send + Sync>;

/// Wrap a closure as a [`Transform`]
///
/// # Example
///
/// ```rust
/// use opcall_core::transform_fn;
/// use serde_json::json;
///
/// let double = transform_fn(|value| Ok(json!(value.as_i64().unwrap_or(0) * 2)));
/// assert_eq!(double(json!(21)).unwrap(), json!(42));
/// ```
pub fn transform_fn<F>(f: F) -> Transform
where
    F: Fn(Value) -> Result<Value, TransformError> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// A registered operation: logical name plus its wire-level connection
/// parameters and optional payload transforms
///
/// Descriptors are immutable once registered; the registry clones them
/// (cheaply, transforms are `Arc`s) into [`ResolvedCall`]s at call time.
///
/// [`ResolvedCall`]: crate::registry::ResolvedCall
#[derive(Clone)]
pub struct OperationDescriptor {
    pub name: String,
    pub template: UrlTemplate,
    pub method: Method,
    pub input_transform: Option<Transform>,
    pub output_transform: Option<Transform>,
}

impl OperationDescriptor {
    /// Create a descriptor from a name, method, and template string
    ///
    /// # Errors
    ///
    /// Returns `TemplateError` if the template string is malformed.
    pub fn new(
        name: impl Into<String>,
        method: Method,
        template: &str,
    ) -> Result<Self, TemplateError> {
        Ok(Self {
            name: name.into(),
            template: UrlTemplate::parse(template)?,
            method,
            input_transform: None,
            output_transform: None,
        })
    }

    /// Attach a transform applied to the caller payload before serialization
    pub fn with_input_transform(mut self, transform: Transform) -> Self {
        self.input_transform = Some(transform);
        self
    }

    /// Attach a transform applied to successful response payloads
    pub fn with_output_transform(mut self, transform: Transform) -> Self {
        self.output_transform = Some(transform);
        self
    }
}

impl fmt::Debug for OperationDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationDescriptor")
            .field("name", &self.name)
            .field("template", &self.template.as_str())
            .field("method", &self.method)
            .field("input_transform", &self.input_transform.is_some())
            .field("output_transform", &self.output_transform.is_some())
            .finish()
    }
}

/// The uniform terminal result of a call
///
/// Exactly one of `data`/`error` is present on any result. The invariant is
/// enforced by construction and checked again when deserializing.
///
/// # Example
///
/// ```rust
/// use opcall_core::CallResult;
/// use serde_json::json;
///
/// let result = CallResult::ok(json!({"id": 1}));
/// assert!(result.is_ok());
/// assert_eq!(result.data(), Some(&json!({"id": 1})));
/// assert!(result.error().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<CallError>,
}

impl CallResult {
    /// Create a successful result
    pub fn ok(data: Value) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }

    /// Create an error result
    pub fn err(error: impl Into<CallError>) -> Self {
        Self {
            data: None,
            error: Some(error.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.data.is_some()
    }

    pub fn is_err(&self) -> bool {
        self.error.is_some()
    }

    /// The success payload, if this is a success result
    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    /// The structured error, if this is an error result
    pub fn error(&self) -> Option<&CallError> {
        self.error.as_ref()
    }

    /// Convert into a `Result` for callers who prefer `?`-style handling
    pub fn into_result(self) -> Result<Value, CallError> {
        match (self.data, self.error) {
            (Some(data), None) => Ok(data),
            (None, Some(error)) => Err(error),
            // Unreachable by construction
            _ => Err(CallError::new("malformed call result")),
        }
    }
}

impl From<Result<Value, CallError>> for CallResult {
    fn from(result: Result<Value, CallError>) -> Self {
        match result {
            Ok(data) => CallResult::ok(data),
            Err(error) => CallResult::err(error),
        }
    }
}

impl<'de> Deserialize<'de> for CallResult {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(deny_unknown_fields)]
        struct Raw {
            #[serde(default, deserialize_with = "null_is_present")]
            data: Option<Value>,
            #[serde(default)]
            error: Option<CallError>,
        }

        // A JSON `null` data field still counts as present: an empty-body
        // success serializes as {"data":null}.
        fn null_is_present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
        where
            D: Deserializer<'de>,
        {
            Value::deserialize(deserializer).map(Some)
        }

        let raw = Raw::deserialize(deserializer)?;
        match (raw.data, raw.error) {
            (Some(data), None) => Ok(CallResult::ok(data)),
            (None, Some(error)) => Ok(CallResult::err(error)),
            (Some(_), Some(_)) => Err(D::Error::custom(
                "call result has both `data` and `error` set",
            )),
            (None, None) => Err(D::Error::custom(
                "call result has neither `data` nor `error` set",
            )),
        }
    }
}
