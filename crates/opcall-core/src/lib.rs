//! # opcall Core
//!
//! Core types for operation-keyed HTTP calls: an immutable endpoint
//! registry, URL templates, payload transforms, and the uniform
//! `{data, error}` call result every invocation returns.
//!
//! This crate provides:
//! - Type definitions for operations, arguments, and call results
//! - URL template parsing and interpolation
//! - A validating registry builder and JSON manifest loader
//!
//! The HTTP executor and client facade live in `opcall-http`; this crate
//! does no I/O.
//!
//! ## Example
//!
//! ```rust
//! use opcall_core::{CallArgs, EndpointRegistry, Method};
//!
//! let registry = EndpointRegistry::builder("https://api.example.com")
//!     .operation("getUserTodos", Method::Get, "users/{userId}/todos")
//!     .unwrap()
//!     .build()
//!     .unwrap();
//!
//! let args = CallArgs::new().with("userId", "1");
//! let resolved = registry.resolve("getUserTodos", &args).unwrap();
//! assert_eq!(resolved.url, "https://api.example.com/users/1/todos");
//! ```

pub mod error;
pub mod manifest;
pub mod registry;
pub mod template;
pub mod types;

// Re-exports for convenience
pub use error::{CallError, TransformError};
pub use manifest::{ManifestError, OperationEntry, RegistryManifest};
pub use registry::{EndpointRegistry, RegistryBuilder, RegistryError, ResolvedCall};
pub use template::{TemplateError, UrlTemplate, MAX_TEMPLATE_LENGTH};
pub use types::{
    transform_fn, CallArgs, CallResult, Method, OperationDescriptor, Transform, UnsupportedMethod,
};
