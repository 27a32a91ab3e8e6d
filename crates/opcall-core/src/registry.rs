//! Endpoint registry
//!
//! The registry maps logical operation names to URL templates, HTTP methods,
//! and optional payload transforms. It is built once at process start and
//! never mutated afterwards, so it can be shared freely between tasks.

use crate::template::TemplateError;
use crate::types::{CallArgs, Method, OperationDescriptor, Transform};
use std::collections::HashMap;
use std::fmt::{self, Formatter};
use thiserror::Error;

/// Errors that can occur while building or resolving against a registry
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Unknown operation '{0}'")]
    UnknownOperation(String),

    #[error("Empty operation name")]
    EmptyOperationName,

    #[error("Duplicate operation '{0}'")]
    DuplicateOperation(String),

    #[error("Empty base URL")]
    EmptyBaseUrl,

    #[error("Invalid template for operation '{operation}': {source}")]
    Template {
        operation: String,
        #[source]
        source: TemplateError,
    },

    #[error("Bad arguments for operation '{operation}': {source}")]
    Arguments {
        operation: String,
        #[source]
        source: TemplateError,
    },
}

/// An operation resolved against the registry: fully interpolated URL plus
/// the descriptor's method and transforms
#[derive(Clone)]
pub struct ResolvedCall {
    pub operation: String,
    pub url: String,
    pub method: Method,
    pub input_transform: Option<Transform>,
    pub output_transform: Option<Transform>,
}

impl fmt::Debug for ResolvedCall {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedCall")
            .field("operation", &self.operation)
            .field("url", &self.url)
            .field("method", &self.method)
            .field("input_transform", &self.input_transform.is_some())
            .field("output_transform", &self.output_transform.is_some())
            .finish()
    }
}

/// Immutable table of registered operations
///
/// # Example
///
/// ```rust
/// use opcall_core::{CallArgs, EndpointRegistry, Method};
///
/// let registry = EndpointRegistry::builder("https://api.example.com")
///     .operation("getUserTodos", Method::Get, "users/{userId}/todos")
///     .unwrap()
///     .build()
///     .unwrap();
///
/// let args = CallArgs::new().with("userId", "1");
/// let resolved = registry.resolve("getUserTodos", &args).unwrap();
/// assert_eq!(resolved.url, "https://api.example.com/users/1/todos");
/// ```
#[derive(Debug)]
pub struct EndpointRegistry {
    base_url: String,
    operations: HashMap<String, OperationDescriptor>,
}

impl EndpointRegistry {
    /// Start building a registry rooted at the given base URL
    ///
    /// A trailing slash on the base URL is tolerated and normalized away.
    pub fn builder(base_url: impl Into<String>) -> RegistryBuilder {
        RegistryBuilder {
            base_url: base_url.into(),
            operations: HashMap::new(),
        }
    }

    /// The base URL all operation templates are joined to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Look up a descriptor by operation name
    pub fn get(&self, name: &str) -> Option<&OperationDescriptor> {
        self.operations.get(name)
    }

    /// Registered operation names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.operations.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Resolve an operation name and arguments into a fully interpolated call
    ///
    /// Pure lookup and string construction; no side effects. A failure here
    /// short-circuits the call before any network activity.
    ///
    /// # Errors
    ///
    /// Returns `UnknownOperation` for an unregistered name, or `Arguments`
    /// when the supplied arguments do not match the template's placeholders.
    pub fn resolve(&self, name: &str, args: &CallArgs) -> Result<ResolvedCall, RegistryError> {
        let descriptor = self
            .operations
            .get(name)
            .ok_or_else(|| RegistryError::UnknownOperation(name.to_string()))?;

        let path = descriptor
            .template
            .render(args)
            .map_err(|source| RegistryError::Arguments {
                operation: name.to_string(),
                source,
            })?;

        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));

        Ok(ResolvedCall {
            operation: descriptor.name.clone(),
            url,
            method: descriptor.method,
            input_transform: descriptor.input_transform.clone(),
            output_transform: descriptor.output_transform.clone(),
        })
    }
}

/// Builder validating descriptors as they are registered
#[derive(Debug)]
pub struct RegistryBuilder {
    base_url: String,
    operations: HashMap<String, OperationDescriptor>,
}

impl RegistryBuilder {
    /// Register a prepared descriptor
    ///
    /// # Errors
    ///
    /// Returns an error for an empty or duplicate operation name.
    pub fn register(mut self, descriptor: OperationDescriptor) -> Result<Self, RegistryError> {
        if descriptor.name.is_empty() {
            return Err(RegistryError::EmptyOperationName);
        }
        if self.operations.contains_key(&descriptor.name) {
            return Err(RegistryError::DuplicateOperation(descriptor.name));
        }
        self.operations.insert(descriptor.name.clone(), descriptor);
        Ok(self)
    }

    /// Register an operation from its name, method, and template string
    ///
    /// # Errors
    ///
    /// Returns an error for an empty/duplicate name or a malformed template.
    pub fn operation(
        self,
        name: impl Into<String>,
        method: Method,
        template: &str,
    ) -> Result<Self, RegistryError> {
        let name = name.into();
        let descriptor =
            OperationDescriptor::new(name.clone(), method, template).map_err(|source| {
                RegistryError::Template {
                    operation: name,
                    source,
                }
            })?;
        self.register(descriptor)
    }

    /// Finish building the registry
    ///
    /// # Errors
    ///
    /// Returns `EmptyBaseUrl` if the base URL is empty.
    pub fn build(self) -> Result<EndpointRegistry, RegistryError> {
        if self.base_url.is_empty() {
            return Err(RegistryError::EmptyBaseUrl);
        }
        Ok(EndpointRegistry {
            base_url: self.base_url.trim_end_matches('/').to_string(),
            operations: self.operations,
        })
    }
}
